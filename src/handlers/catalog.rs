// src/handlers/catalog.rs

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::AppState,
    middleware::auth::AuthenticatedOrganization,
    models::catalog::CatalogSnapshot,
};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    #[serde(flatten)]
    pub snapshot: CatalogSnapshot,
    pub loading: bool,
    // Última falha de leitura; o snapshot é o último válido
    pub error: Option<String>,
}

// GET /api/catalog
#[utoipa::path(
    get,
    path = "/api/catalog",
    tag = "Catalog",
    responses(
        (status = 200, description = "As cinco coleções em memória", body = CatalogResponse),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_catalog(
    State(app_state): State<AppState>,
    _session: AuthenticatedOrganization,
) -> impl IntoResponse {
    let state = app_state.catalog.state().await;
    Json(CatalogResponse {
        snapshot: state.snapshot.as_ref().clone(),
        loading: state.loading,
        error: state.error,
    })
}
