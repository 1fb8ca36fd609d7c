// src/services/donation_service.rs
//
// As regras de quem pode fazer o quê: publicar, editar, pedir e decidir.
// Toda escrita passa pelo CatalogCache, que relê o catálogo depois.

use chrono::Local;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    gateway::SharedGateway,
    models::{
        catalog::{CatalogSnapshot, DonationBoard, RequestDetail},
        organization::Organization,
        request::{NewResourceRequest, RequestStatus, ResourceRequest},
        resource::{Resource, ResourceDraft, ResourceKind, ResourceStatus},
    },
    services::{
        board::{donation_board, BoardFilter},
        catalog::CatalogCache,
    },
};

#[derive(Clone)]
pub struct DonationService {
    gateway: SharedGateway,
    catalog: CatalogCache,
}

fn ensure_verified(actor: &Organization) -> Result<(), AppError> {
    if !actor.is_verified() {
        return Err(AppError::OrganizationNotVerified);
    }
    Ok(())
}

// O status só muda pela aprovação de um pedido
fn ensure_status_untouched(
    submitted: Option<ResourceStatus>,
    current: ResourceStatus,
) -> Result<(), AppError> {
    match submitted {
        Some(status) if status != current => Err(AppError::ResourceStatusLocked),
        _ => Ok(()),
    }
}

impl DonationService {
    pub fn new(gateway: SharedGateway, catalog: CatalogCache) -> Self {
        Self { gateway, catalog }
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    // --- PUBLICAR RECURSO ---
    pub async fn publish(
        &self,
        actor: &Organization,
        draft: ResourceDraft,
        submitted_status: Option<ResourceStatus>,
    ) -> Result<Resource, AppError> {
        ensure_verified(actor)?;
        draft.validate()?;
        ensure_status_untouched(submitted_status, ResourceStatus::Available)?;

        let resource = self.catalog.add_resource(actor.id, draft).await?;
        tracing::info!(
            "📦 {} publicou {} ({})",
            actor.name,
            resource.display_name(),
            resource.kind()
        );
        Ok(resource)
    }

    // --- EDITAR RECURSO ---
    pub async fn edit(
        &self,
        actor: &Organization,
        kind: ResourceKind,
        id: Uuid,
        draft: ResourceDraft,
        submitted_status: Option<ResourceStatus>,
    ) -> Result<Resource, AppError> {
        ensure_verified(actor)?;
        draft.validate()?;

        let current = self
            .gateway
            .resource(kind, id)
            .await?
            .ok_or(AppError::ResourceNotFound)?;
        if current.organization_id() != actor.id {
            return Err(AppError::NotResourceOwner);
        }
        ensure_status_untouched(submitted_status, current.status())?;

        self.catalog.update_resource(kind, id, draft).await
    }

    // --- PEDIR RECURSO ---
    pub async fn request_resource(
        &self,
        actor: &Organization,
        kind: ResourceKind,
        resource_id: Uuid,
    ) -> Result<ResourceRequest, AppError> {
        ensure_verified(actor)?;

        let resource = self
            .gateway
            .resource(kind, resource_id)
            .await?
            .ok_or(AppError::ResourceNotFound)?;

        // Próprio recurso, disponibilidade e pedido repetido são checados pelo
        // gateway no mesmo passo da gravação
        let request = self
            .catalog
            .create_request(NewResourceRequest {
                resource_id,
                resource_kind: kind,
                // O doador é sempre o dono do recurso
                donating_organization_id: resource.organization_id(),
                requesting_organization_id: actor.id,
            })
            .await?;

        tracing::info!("🙋 {} pediu {}", actor.name, resource.display_name());
        Ok(request)
    }

    // --- DECIDIR PEDIDO ---
    pub async fn decide(
        &self,
        actor: &Organization,
        request_id: Uuid,
        decision: RequestStatus,
    ) -> Result<ResourceRequest, AppError> {
        ensure_verified(actor)?;
        if !decision.is_terminal() {
            return Err(AppError::InvalidDecision);
        }

        let request = self
            .gateway
            .list_resource_requests()
            .await?
            .into_iter()
            .find(|r| r.id == request_id)
            .ok_or(AppError::RequestNotFound)?;
        if request.donating_organization_id != actor.id {
            return Err(AppError::NotDonor);
        }
        if !request.status.can_transition_to(decision) {
            return Err(AppError::RequestAlreadyDecided);
        }

        let decided = self.catalog.update_request_status(request_id, decision).await?;
        tracing::info!("✅ {} decidiu o pedido {}: {:?}", actor.name, decided.id, decided.status);
        Ok(decided)
    }

    // --- LEITURAS ---

    pub async fn board(
        &self,
        actor: &Organization,
        filter: &BoardFilter,
    ) -> Result<DonationBoard, AppError> {
        ensure_verified(actor)?;
        let snapshot = self.catalog.snapshot().await;
        Ok(donation_board(&snapshot, actor.id, filter, Local::now().date_naive()))
    }

    /// Pedidos em que a ONG é a doadora, com quem pediu.
    pub async fn received_requests(
        &self,
        actor: &Organization,
    ) -> Result<Vec<RequestDetail>, AppError> {
        let requests = self.gateway.requests_for_donor(actor.id).await?;
        let snapshot = self.catalog.snapshot().await;
        Ok(requests
            .into_iter()
            .map(|r| detail(&snapshot, r.requesting_organization_id, r))
            .collect())
    }

    /// Pedidos feitos pela ONG, com quem doa.
    pub async fn sent_requests(&self, actor: &Organization) -> Result<Vec<RequestDetail>, AppError> {
        let requests = self.gateway.list_resource_requests().await?;
        let snapshot = self.catalog.snapshot().await;
        Ok(requests
            .into_iter()
            .filter(|r| r.requesting_organization_id == actor.id)
            .map(|r| detail(&snapshot, r.donating_organization_id, r))
            .collect())
    }
}

fn detail(snapshot: &CatalogSnapshot, counterpart_id: Uuid, request: ResourceRequest) -> RequestDetail {
    RequestDetail {
        resource: snapshot.resource(request.resource_kind, request.resource_id),
        counterpart: snapshot.organization(counterpart_id).cloned(),
        request,
    }
}
