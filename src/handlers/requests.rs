// src/handlers/requests.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::{AuthenticatedOrganization, VerifiedOrganization},
        i18n::Locale,
    },
    models::{
        catalog::RequestDetail,
        request::{RequestStatus, ResourceRequest},
        resource::ResourceKind,
    },
};

// O doador não vem do cliente: é o dono do recurso
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestPayload {
    pub resource_id: Uuid,
    pub resource_kind: ResourceKind,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecisionPayload {
    pub status: RequestStatus,
}

// POST /api/requests
#[utoipa::path(
    post,
    path = "/api/requests",
    tag = "Requests",
    request_body = CreateRequestPayload,
    responses(
        (status = 201, description = "Pedido criado como PENDING", body = ResourceRequest),
        (status = 404, description = "Recurso não encontrado"),
        (status = 409, description = "Recurso indisponível, próprio ou já pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_request(
    State(app_state): State<AppState>,
    locale: Locale,
    VerifiedOrganization(organization): VerifiedOrganization,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .donation_service
        .request_resource(&organization, payload.resource_kind, payload.resource_id)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(request)))
}

// GET /api/requests/received
#[utoipa::path(
    get,
    path = "/api/requests/received",
    tag = "Requests",
    responses(
        (status = 200, description = "Pedidos feitos aos recursos da ONG", body = Vec<RequestDetail>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_received(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedOrganization(organization, _): AuthenticatedOrganization,
) -> Result<impl IntoResponse, ApiError> {
    let requests = app_state
        .donation_service
        .received_requests(&organization)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(requests)))
}

// GET /api/requests/sent
#[utoipa::path(
    get,
    path = "/api/requests/sent",
    tag = "Requests",
    responses(
        (status = 200, description = "Pedidos feitos pela ONG", body = Vec<RequestDetail>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_sent(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedOrganization(organization, _): AuthenticatedOrganization,
) -> Result<impl IntoResponse, ApiError> {
    let requests = app_state
        .donation_service
        .sent_requests(&organization)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(requests)))
}

// PATCH /api/requests/{id}
// { "status": "APPROVED" | "REJECTED" }
#[utoipa::path(
    patch,
    path = "/api/requests/{id}",
    tag = "Requests",
    request_body = DecisionPayload,
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido decidido", body = ResourceRequest),
        (status = 403, description = "Só o doador decide"),
        (status = 409, description = "Pedido já decidido")
    ),
    security(("api_jwt" = []))
)]
pub async fn decide_request(
    State(app_state): State<AppState>,
    locale: Locale,
    VerifiedOrganization(organization): VerifiedOrganization,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .donation_service
        .decide(&organization, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(request)))
}
