// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::organization::{NewOrganization, Organization};

// Dados para registro de uma nova ONG
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterNgoPayload {
    #[validate(nested)]
    #[serde(flatten)]
    pub organization: NewOrganization,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    // Sem checagem de formato: qualquer par errado vira InvalidCredentials
    #[validate(length(min = 1, message = "O e-mail é obrigatório."))]
    #[schema(example = "patasunidas@test.com")]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

/// Sessão aberta por um login bem-sucedido.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Session {
    pub token: String,
    pub organization: Organization,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // ID da organização
    pub jti: Uuid,  // ID do token, usado no logout
    pub exp: usize,
    pub iat: usize,
}
