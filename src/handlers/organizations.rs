// src/handlers/organizations.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedOrganization, i18n::Locale},
    models::organization::Organization,
};

// GET /api/organizations
#[utoipa::path(
    get,
    path = "/api/organizations",
    tag = "Organizations",
    responses(
        (status = 200, description = "Todas as ONGs cadastradas", body = Vec<Organization>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_organizations(
    State(app_state): State<AppState>,
    locale: Locale,
    _session: AuthenticatedOrganization,
) -> Result<impl IntoResponse, ApiError> {
    let organizations = app_state
        .gateway
        .list_organizations()
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(organizations)))
}

// GET /api/organizations/{id}
#[utoipa::path(
    get,
    path = "/api/organizations/{id}",
    tag = "Organizations",
    params(("id" = Uuid, Path, description = "ID da ONG")),
    responses(
        (status = 200, description = "A ONG", body = Organization),
        (status = 404, description = "ONG não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_organization(
    State(app_state): State<AppState>,
    locale: Locale,
    _session: AuthenticatedOrganization,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let organization = app_state
        .gateway
        .organization_by_id(id)
        .await
        .and_then(|found| found.ok_or(AppError::OrganizationNotFound))
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(organization)))
}
