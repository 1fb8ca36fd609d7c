// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedOrganization, i18n::Locale},
    models::{
        auth::{LoginPayload, RegisterNgoPayload, Session},
        organization::Organization,
    },
};

// POST /api/auth/register
// A ONG nasce PENDING e não recebe token: precisa ser verificada antes de operar.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterNgoPayload,
    responses(
        (status = 201, description = "ONG cadastrada, aguardando verificação", body = Organization),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterNgoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, app_state.i18n_store))?;

    let organization = app_state
        .catalog
        .register_ngo(payload.organization, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    tracing::info!("🐾 Nova ONG cadastrada: {} ({})", organization.name, organization.id);
    Ok((StatusCode::CREATED, Json(organization)))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sessão aberta", body = Session),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, app_state.i18n_store))?;

    let session = app_state
        .gateway
        .login(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(session)))
}

// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Token revogado"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    AuthenticatedOrganization(organization, token): AuthenticatedOrganization,
) -> StatusCode {
    // Melhor esforço: o cliente descarta o token de qualquer forma
    if let Err(e) = app_state.gateway.logout(&token).await {
        tracing::warn!("Falha no logout de {}: {}", organization.id, e);
    }
    StatusCode::NO_CONTENT
}

// GET /api/auth/me
// Funciona também para ONGs pendentes (a tela de "aguardando aprovação").
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "A ONG da sessão", body = Organization),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedOrganization(organization, _): AuthenticatedOrganization) -> impl IntoResponse {
    Json(organization)
}
