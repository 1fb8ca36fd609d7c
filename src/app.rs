// src/app.rs
//
// O contexto de um cliente: sessão e catálogo com início e fim explícitos,
// em vez de estado global. Quem renderiza recebe este contexto.

use crate::{
    common::error::AppError,
    gateway::SharedGateway,
    models::organization::{NewOrganization, Organization},
    services::{catalog::CatalogCache, donation_service::DonationService, session::SessionManager},
};

#[derive(Clone)]
pub struct PetConnect {
    pub session: SessionManager,
    pub catalog: CatalogCache,
    pub donations: DonationService,
}

impl PetConnect {
    pub fn new(gateway: SharedGateway) -> Self {
        let catalog = CatalogCache::new(gateway.clone());
        Self {
            session: SessionManager::new(gateway.clone()),
            donations: DonationService::new(gateway, catalog.clone()),
            catalog,
        }
    }

    /// Início do processo: verifica o token guardado e, havendo sessão,
    /// carrega o catálogo.
    pub async fn start(&self, stored_token: Option<String>) -> Option<Organization> {
        let organization = self.session.restore(stored_token).await;
        self.sync_catalog(organization.is_some()).await;
        organization
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Organization, AppError> {
        let result = self.session.login(email, password).await;
        self.sync_catalog(result.is_ok()).await;
        result
    }

    pub async fn logout(&self) {
        self.session.logout().await;
        self.catalog.clear().await;
    }

    pub async fn register(
        &self,
        profile: NewOrganization,
        password: &str,
    ) -> Result<Organization, AppError> {
        self.session.register(profile, password).await
    }

    /// Usuário atual, relido do armazenamento (ex.: depois da verificação).
    pub async fn current_user(&self) -> Result<Option<Organization>, AppError> {
        self.session.refresh_user().await
    }

    // Sessão aberta -> catálogo carregado; sem sessão -> vazio
    async fn sync_catalog(&self, signed_in: bool) {
        if !signed_in {
            self.catalog.clear().await;
            return;
        }
        if let Err(e) = self.catalog.load().await {
            tracing::warn!("Catálogo indisponível após o login: {}", e);
        }
    }
}
