// src/handlers/resources.rs

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
    gateway::SharedGateway,
    middleware::{
        auth::{AuthenticatedOrganization, VerifiedOrganization},
        i18n::Locale,
    },
    models::resource::{submitted_status, Resource, ResourceDraft, ResourceKind, ResourceStatus},
};

// O tipo vem na rota como texto: "medicines", "rations" ou "articles"
fn parse_kind(raw: &str) -> Result<ResourceKind, AppError> {
    raw.parse::<ResourceKind>().map_err(AppError::BadRequest)
}

fn parse_draft(
    kind: ResourceKind,
    body: serde_json::Value,
) -> Result<(ResourceDraft, Option<ResourceStatus>), AppError> {
    let status = submitted_status(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let draft = ResourceDraft::from_json(kind, body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok((draft, status))
}

async fn list_kind(gateway: &SharedGateway, kind: ResourceKind) -> Result<Vec<Resource>, AppError> {
    Ok(match kind {
        ResourceKind::Medicines => gateway
            .list_medicines()
            .await?
            .into_iter()
            .map(Resource::Medicine)
            .collect(),
        ResourceKind::Rations => gateway
            .list_rations()
            .await?
            .into_iter()
            .map(Resource::Ration)
            .collect(),
        ResourceKind::Articles => gateway
            .list_articles()
            .await?
            .into_iter()
            .map(Resource::Article)
            .collect(),
    })
}

// GET /api/resources/{kind}
#[utoipa::path(
    get,
    path = "/api/resources/{kind}",
    tag = "Resources",
    params(("kind" = ResourceKind, Path, description = "medicines, rations ou articles")),
    responses(
        (status = 200, description = "Recursos do tipo, de todas as ONGs", body = Vec<Resource>),
        (status = 400, description = "Tipo desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_resources(
    State(app_state): State<AppState>,
    locale: Locale,
    _session: AuthenticatedOrganization,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let resources = async {
        let kind = parse_kind(&kind)?;
        list_kind(&app_state.gateway, kind).await
    }
    .await
    .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resources)))
}

// GET /api/resources/{kind}/{id}
#[utoipa::path(
    get,
    path = "/api/resources/{kind}/{id}",
    tag = "Resources",
    params(
        ("kind" = ResourceKind, Path, description = "medicines, rations ou articles"),
        ("id" = Uuid, Path, description = "ID do recurso")
    ),
    responses(
        (status = 200, description = "O recurso", body = Resource),
        (status = 404, description = "Recurso não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_resource(
    State(app_state): State<AppState>,
    locale: Locale,
    _session: AuthenticatedOrganization,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = async {
        let kind = parse_kind(&kind)?;
        app_state
            .gateway
            .resource(kind, id)
            .await?
            .ok_or(AppError::ResourceNotFound)
    }
    .await
    .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resource)))
}

// POST /api/resources/{kind}
#[utoipa::path(
    post,
    path = "/api/resources/{kind}",
    tag = "Resources",
    params(("kind" = ResourceKind, Path, description = "medicines, rations ou articles")),
    request_body = ResourceDraft,
    responses(
        (status = 201, description = "Recurso publicado como AVAILABLE", body = Resource),
        (status = 400, description = "Formulário inválido"),
        (status = 403, description = "ONG ainda não verificada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_resource(
    State(app_state): State<AppState>,
    locale: Locale,
    VerifiedOrganization(organization): VerifiedOrganization,
    Path(kind): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = async {
        let kind = parse_kind(&kind)?;
        let (draft, status) = parse_draft(kind, body)?;
        app_state
            .donation_service
            .publish(&organization, draft, status)
            .await
    }
    .await
    .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(resource)))
}

// PUT /api/resources/{kind}/{id}
// Substitui os campos do formulário. O status não é editável.
#[utoipa::path(
    put,
    path = "/api/resources/{kind}/{id}",
    tag = "Resources",
    params(
        ("kind" = ResourceKind, Path, description = "medicines, rations ou articles"),
        ("id" = Uuid, Path, description = "ID do recurso")
    ),
    request_body = ResourceDraft,
    responses(
        (status = 200, description = "Recurso atualizado", body = Resource),
        (status = 403, description = "Recurso de outra ONG"),
        (status = 409, description = "Status não pode ser alterado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_resource(
    State(app_state): State<AppState>,
    locale: Locale,
    VerifiedOrganization(organization): VerifiedOrganization,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = async {
        let kind = parse_kind(&kind)?;
        let (draft, status) = parse_draft(kind, body)?;
        app_state
            .donation_service
            .edit(&organization, kind, id, draft, status)
            .await
    }
    .await
    .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resource)))
}

// GET /api/inventory
// O "meu estoque": recursos da própria ONG, de qualquer status.
#[utoipa::path(
    get,
    path = "/api/inventory",
    tag = "Resources",
    responses(
        (status = 200, description = "Recursos da própria ONG, de qualquer status", body = Vec<Resource>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_inventory(
    State(app_state): State<AppState>,
    AuthenticatedOrganization(organization, _): AuthenticatedOrganization,
) -> impl IntoResponse {
    Json(app_state.catalog.inventory(organization.id).await)
}
