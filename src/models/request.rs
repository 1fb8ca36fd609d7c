// src/models/request.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::resource::ResourceKind;

// PENDING -> APPROVED | REJECTED, sem volta.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// A decisão do doador só é válida para um pedido pendente e só pode ser APPROVED ou REJECTED.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        self == RequestStatus::Pending && next.is_terminal()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequest {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub resource_id: Uuid,
    pub resource_kind: ResourceKind,
    pub donating_organization_id: Uuid,
    pub requesting_organization_id: Uuid,
    pub status: RequestStatus,
}

// O que o gateway recebe para criar um pedido
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewResourceRequest {
    pub resource_id: Uuid,
    pub resource_kind: ResourceKind,
    pub donating_organization_id: Uuid,
    pub requesting_organization_id: Uuid,
}
