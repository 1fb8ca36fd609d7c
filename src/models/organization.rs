// src/models/organization.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Situação cadastral da ONG. A transição Pending -> Verified/Rejected é feita
// por um processo administrativo fora desta aplicação.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "organization_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationStatus {
    Pending,
    Verified,
    Rejected,
}

// --- Organization (a ONG) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub name: String,
    /// CNPJ
    pub registration_number: String,
    pub city: String,
    pub state: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub status: OrganizationStatus,
    pub owner_account_id: Uuid,
}

impl Organization {
    pub fn is_verified(&self) -> bool {
        self.status == OrganizationStatus::Verified
    }
}

// Dados do formulário de cadastro (sem id, status, dono ou senha)
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOrganization {
    #[validate(length(min = 1, message = "O nome da ONG é obrigatório."))]
    #[schema(example = "Patas Unidas")]
    pub name: String,

    #[validate(length(min = 1, message = "O CNPJ é obrigatório."))]
    #[schema(example = "12.345.678/0001-90")]
    pub registration_number: String,

    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub city: String,

    #[validate(length(equal = 2, message = "O estado deve ser a sigla da UF (ex: SP)."))]
    #[schema(example = "SP")]
    pub state: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub contact_email: String,

    #[validate(length(min = 8, message = "O telefone de contato é obrigatório."))]
    pub contact_phone: String,
}

// Credencial guardada na tabela 'accounts'
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// E-mail de login comparado sem diferenciar maiúsculas e espaços nas pontas.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
