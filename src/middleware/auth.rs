// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::{
        error::{ApiError, AppError},
        i18n::I18nStore,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::organization::Organization,
};

// O que o guard deixa nos extensions da requisição
#[derive(Debug, Clone)]
struct CurrentSession {
    organization: Organization,
    token: String,
}

// O middleware em si: Bearer -> ONG da sessão
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let reject = |e: AppError| e.to_api_error(&locale, app_state.i18n_store);

    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(|| reject(AppError::InvalidToken))?;
    let token = bearer.token().to_string();

    // Token expirado, revogado ou de ONG que não existe mais: tudo vira 401
    let organization = app_state
        .gateway
        .authenticated_user(&token)
        .await
        .map_err(reject)?
        .ok_or_else(|| reject(AppError::InvalidToken))?;

    request
        .extensions_mut()
        .insert(CurrentSession { organization, token });
    Ok(next.run(request).await)
}

// Extrator para obter a ONG autenticada (e o token) nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedOrganization(pub Organization, pub String);

impl<S> FromRequestParts<S> for AuthenticatedOrganization
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<CurrentSession>().cloned();
        match session {
            Some(CurrentSession { organization, token }) => {
                Ok(AuthenticatedOrganization(organization, token))
            }
            None => {
                let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();
                Err(AppError::InvalidToken.to_api_error(&locale, I18nStore::global()))
            }
        }
    }
}

// Só ONGs verificadas publicam, pedem, decidem e veem o mural
#[derive(Debug, Clone)]
pub struct VerifiedOrganization(pub Organization);

impl<S> FromRequestParts<S> for VerifiedOrganization
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedOrganization(organization, _) =
            AuthenticatedOrganization::from_request_parts(parts, state).await?;

        if !organization.is_verified() {
            let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();
            return Err(AppError::OrganizationNotVerified.to_api_error(&locale, I18nStore::global()));
        }
        Ok(VerifiedOrganization(organization))
    }
}
