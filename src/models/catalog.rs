// src/models/catalog.rs

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    organization::Organization,
    request::ResourceRequest,
    resource::{Article, Medicine, Ration, Resource, ResourceKind},
};

// ---
// 1. Snapshot completo (as cinco coleções, sempre atualizadas juntas)
// ---
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub organizations: Vec<Organization>,
    pub medicines: Vec<Medicine>,
    pub rations: Vec<Ration>,
    pub articles: Vec<Article>,
    pub resource_requests: Vec<ResourceRequest>,
}

impl CatalogSnapshot {
    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
            && self.medicines.is_empty()
            && self.rations.is_empty()
            && self.articles.is_empty()
            && self.resource_requests.is_empty()
    }

    pub fn organization(&self, id: Uuid) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.id == id)
    }

    /// Todos os recursos: medicamentos, depois rações, depois artigos.
    pub fn resources(&self) -> impl Iterator<Item = Resource> + '_ {
        self.medicines
            .iter()
            .cloned()
            .map(Resource::Medicine)
            .chain(self.rations.iter().cloned().map(Resource::Ration))
            .chain(self.articles.iter().cloned().map(Resource::Article))
    }

    pub fn resource(&self, kind: ResourceKind, id: Uuid) -> Option<Resource> {
        match kind {
            ResourceKind::Medicines => self
                .medicines
                .iter()
                .find(|m| m.base.id == id)
                .cloned()
                .map(Resource::Medicine),
            ResourceKind::Rations => self
                .rations
                .iter()
                .find(|r| r.base.id == id)
                .cloned()
                .map(Resource::Ration),
            ResourceKind::Articles => self
                .articles
                .iter()
                .find(|a| a.base.id == id)
                .cloned()
                .map(Resource::Article),
        }
    }

    pub fn request(&self, id: Uuid) -> Option<&ResourceRequest> {
        self.resource_requests.iter().find(|r| r.id == id)
    }
}

// ---
// 2. Mural de doações
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationItem {
    pub resource: Resource,
    pub organization: Organization,
    pub urgent: bool,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationBoard {
    pub items: Vec<DonationItem>,
    /// UFs presentes entre as doações elegíveis, em ordem alfabética (para o filtro)
    pub states: Vec<String>,
}

// ---
// 3. Resumo da ONG (os cards do painel)
// ---
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationStats {
    pub resources_available: usize,
    pub resources_donated: usize,
    pub requests_received_pending: usize,
    pub requests_received_approved: usize,
    pub requests_received_rejected: usize,
    pub requests_sent_pending: usize,
}

// ---
// 4. Fila de pedidos: o pedido com o recurso e a outra ONG já resolvidos
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetail {
    #[serde(flatten)]
    pub request: ResourceRequest,
    pub resource: Option<Resource>,
    /// Quem pediu (nos recebidos) ou quem doa (nos enviados)
    pub counterpart: Option<Organization>,
}
