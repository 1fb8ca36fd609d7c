// src/handlers/donations.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::VerifiedOrganization, i18n::Locale},
    models::catalog::DonationBoard,
    services::board::{BoardFilter, CategoryFilter},
};

// ?q=&category=&state=&urgent=
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DonationQuery {
    /// Busca no nome (ou marca) sem diferenciar maiúsculas
    pub q: Option<String>,
    /// "medicines", "rations" ou uma categoria de artigo
    pub category: Option<String>,
    /// UF da ONG doadora
    pub state: Option<String>,
    pub urgent: Option<bool>,
}

// Campo vazio na query é o mesmo que ausente
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl DonationQuery {
    pub fn into_filter(self) -> Result<BoardFilter, AppError> {
        let category = non_empty(self.category)
            .map(|raw| raw.parse::<CategoryFilter>())
            .transpose()
            .map_err(AppError::BadRequest)?;

        Ok(BoardFilter {
            query: non_empty(self.q).unwrap_or_default(),
            category,
            state: non_empty(self.state),
            urgent_only: self.urgent.unwrap_or(false),
        })
    }
}

// GET /api/donations
#[utoipa::path(
    get,
    path = "/api/donations",
    tag = "Donations",
    params(DonationQuery),
    responses(
        (status = 200, description = "Doações disponíveis de outras ONGs", body = DonationBoard),
        (status = 400, description = "Filtro inválido"),
        (status = 403, description = "ONG ainda não verificada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_donation_board(
    State(app_state): State<AppState>,
    locale: Locale,
    VerifiedOrganization(organization): VerifiedOrganization,
    Query(query): Query<DonationQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let board = async {
        let filter = query.into_filter()?;
        app_state.donation_service.board(&organization, &filter).await
    }
    .await
    .map_err(|e| e.to_api_error(&locale, app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(board)))
}
