// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    config::AppState,
    middleware::auth::AuthenticatedOrganization,
    models::catalog::OrganizationStats,
};

// GET /api/stats
// Os cards do painel: recursos por status e pedidos recebidos/enviados.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores da ONG da sessão", body = OrganizationStats),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    AuthenticatedOrganization(organization, _): AuthenticatedOrganization,
) -> impl IntoResponse {
    Json(app_state.dashboard_service.get_summary(organization.id).await)
}
