use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    // Nunca diferencia "conta inexistente" de "senha errada"
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Organização não encontrada")]
    OrganizationNotFound,

    #[error("Recurso não encontrado")]
    ResourceNotFound,

    #[error("Pedido não encontrado")]
    RequestNotFound,

    #[error("Organização ainda não verificada")]
    OrganizationNotVerified,

    #[error("Apenas a ONG dona pode alterar este recurso")]
    NotResourceOwner,

    #[error("Apenas a ONG doadora pode decidir este pedido")]
    NotDonor,

    #[error("Uma ONG não pode solicitar o próprio recurso")]
    OwnResourceRequest,

    #[error("Recurso indisponível para doação")]
    ResourceUnavailable,

    #[error("Já existe um pedido pendente para este recurso")]
    DuplicateRequest,

    #[error("Pedido já foi decidido")]
    RequestAlreadyDecided,

    #[error("Decisão inválida")]
    InvalidDecision,

    #[error("O status do recurso é controlado pelos pedidos de doação")]
    ResourceStatusLocked,

    #[error("Armazenamento indisponível")]
    StoreUnavailable,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::OwnResourceRequest
            | AppError::InvalidDecision
            | AppError::ResourceStatusLocked => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::OrganizationNotVerified | AppError::NotResourceOwner | AppError::NotDonor => {
                StatusCode::FORBIDDEN
            }
            AppError::OrganizationNotFound
            | AppError::ResourceNotFound
            | AppError::RequestNotFound => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::ResourceUnavailable
            | AppError::DuplicateRequest
            | AppError::RequestAlreadyDecided => StatusCode::CONFLICT,
            AppError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave da mensagem no catálogo de traduções.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::BadRequest(_) => "bad_request",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::OrganizationNotFound => "organization_not_found",
            AppError::ResourceNotFound => "resource_not_found",
            AppError::RequestNotFound => "request_not_found",
            AppError::OrganizationNotVerified => "organization_not_verified",
            AppError::NotResourceOwner => "not_resource_owner",
            AppError::NotDonor => "not_donor",
            AppError::OwnResourceRequest => "own_resource_request",
            AppError::ResourceUnavailable => "resource_unavailable",
            AppError::DuplicateRequest => "duplicate_request",
            AppError::RequestAlreadyDecided => "request_already_decided",
            AppError::InvalidDecision => "invalid_decision",
            AppError::ResourceStatusLocked => "resource_status_locked",
            AppError::StoreUnavailable => "store_unavailable",
            _ => "internal",
        }
    }

    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga a mensagem detalhada; o cliente só vê a genérica.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(serde_json::Value::Object(details))
            }
            AppError::BadRequest(reason) => Some(json!({ "reason": reason })),
            _ => None,
        };

        ApiError {
            status,
            error: i18n.translate(&locale.0, self.message_key()).to_string(),
            details,
        }
    }
}

// Erro já pronto para a resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), I18nStore::global())
            .into_response()
    }
}
