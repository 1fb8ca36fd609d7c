// src/services/dashboard_service.rs

use uuid::Uuid;

use crate::{
    models::{
        catalog::{CatalogSnapshot, OrganizationStats},
        request::RequestStatus,
        resource::ResourceStatus,
    },
    services::catalog::CatalogCache,
};

#[derive(Clone)]
pub struct DashboardService {
    catalog: CatalogCache,
}

impl DashboardService {
    pub fn new(catalog: CatalogCache) -> Self {
        Self { catalog }
    }

    pub async fn get_summary(&self, organization_id: Uuid) -> OrganizationStats {
        let snapshot = self.catalog.snapshot().await;
        organization_stats(&snapshot, organization_id)
    }
}

/// Os números do painel da ONG, calculados sobre o snapshot.
pub fn organization_stats(snapshot: &CatalogSnapshot, organization_id: Uuid) -> OrganizationStats {
    let mut stats = OrganizationStats::default();

    for resource in snapshot.resources().filter(|r| r.organization_id() == organization_id) {
        match resource.status() {
            ResourceStatus::Available => stats.resources_available += 1,
            ResourceStatus::Donated => stats.resources_donated += 1,
            ResourceStatus::Requested => {}
        }
    }

    for request in &snapshot.resource_requests {
        if request.donating_organization_id == organization_id {
            match request.status {
                RequestStatus::Pending => stats.requests_received_pending += 1,
                RequestStatus::Approved => stats.requests_received_approved += 1,
                RequestStatus::Rejected => stats.requests_received_rejected += 1,
            }
        } else if request.requesting_organization_id == organization_id
            && request.status == RequestStatus::Pending
        {
            stats.requests_sent_pending += 1;
        }
    }

    stats
}
