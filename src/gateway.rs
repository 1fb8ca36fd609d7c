// src/gateway.rs
//
// A fronteira única entre a aplicação e o armazenamento. Tudo que lê ou altera
// dados passa por aqui; nada aqui conhece HTTP.

#[cfg(test)]
pub(crate) mod delayed;
pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::Session,
        organization::{NewOrganization, Organization},
        request::{NewResourceRequest, RequestStatus, ResourceRequest},
        resource::{Article, Medicine, Ration, Resource, ResourceDraft, ResourceKind},
    },
};

pub use memory::MemoryGateway;
pub use postgres::PgGateway;

pub type SharedGateway = Arc<dyn ApiGateway>;

#[async_trait]
pub trait ApiGateway: Send + Sync {
    // --- Autenticação ---

    async fn login(&self, email: &str, password: &str) -> Result<Session, AppError>;

    /// Sempre "funciona": token inválido ou já revogado é ignorado.
    async fn logout(&self, token: &str) -> Result<(), AppError>;

    /// `None` para token ausente, expirado, revogado ou de ONG inexistente.
    async fn authenticated_user(&self, token: &str) -> Result<Option<Organization>, AppError>;

    /// Cria a ONG como PENDING. Não abre sessão.
    async fn register_ngo(
        &self,
        profile: NewOrganization,
        password: &str,
    ) -> Result<Organization, AppError>;

    // --- Organizações ---

    async fn list_organizations(&self) -> Result<Vec<Organization>, AppError>;

    async fn organization_by_id(&self, id: Uuid) -> Result<Option<Organization>, AppError>;

    // --- Recursos ---

    async fn list_medicines(&self) -> Result<Vec<Medicine>, AppError>;

    async fn list_rations(&self) -> Result<Vec<Ration>, AppError>;

    async fn list_articles(&self) -> Result<Vec<Article>, AppError>;

    async fn resource(&self, kind: ResourceKind, id: Uuid) -> Result<Option<Resource>, AppError>;

    /// Gera id e data de criação; o recurso nasce AVAILABLE.
    async fn add_resource(
        &self,
        organization_id: Uuid,
        draft: ResourceDraft,
    ) -> Result<Resource, AppError>;

    /// Substitui os campos editáveis. O status é preservado.
    async fn update_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
        draft: ResourceDraft,
    ) -> Result<Resource, AppError>;

    // --- Pedidos de doação ---

    async fn list_resource_requests(&self) -> Result<Vec<ResourceRequest>, AppError>;

    /// Pedidos em que a ONG é a doadora.
    async fn requests_for_donor(&self, organization_id: Uuid)
        -> Result<Vec<ResourceRequest>, AppError>;

    /// Falha se o recurso não existir ou não pertencer à doadora, ou se alguma ONG não existir.
    /// Dono do recurso, recurso fora de AVAILABLE e pedido PENDING repetido da mesma ONG
    /// também falham, checados atomicamente com a gravação.
    async fn create_resource_request(
        &self,
        request: NewResourceRequest,
    ) -> Result<ResourceRequest, AppError>;

    /// Transição única e terminal. APPROVED também marca o recurso como DONATED,
    /// na mesma operação atômica.
    async fn update_resource_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<ResourceRequest, AppError>;
}
