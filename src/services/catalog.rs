// src/services/catalog.rs
//
// Cache do catálogo: as cinco coleções lidas juntas e trocadas de uma vez.
// Toda mutação bem-sucedida é seguida de uma releitura completa.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    gateway::SharedGateway,
    models::{
        catalog::CatalogSnapshot,
        organization::{NewOrganization, Organization},
        request::{NewResourceRequest, RequestStatus, ResourceRequest},
        resource::{Resource, ResourceDraft, ResourceKind},
    },
};

/// Fotografia do estado do cache para quem renderiza.
#[derive(Debug, Clone)]
pub struct CatalogState {
    pub snapshot: Arc<CatalogSnapshot>,
    pub loading: bool,
    pub error: Option<String>,
    pub active: bool,
}

#[derive(Default)]
struct Inner {
    snapshot: Arc<CatalogSnapshot>,
    loading: bool,
    error: Option<String>,
    active: bool,
    // Muda a cada load/clear; leituras de uma época anterior são descartadas
    epoch: u64,
    // Ordem de início das leituras; só publica se for mais nova que a publicada
    next_ticket: u64,
    published_ticket: u64,
}

#[derive(Clone)]
pub struct CatalogCache {
    gateway: SharedGateway,
    inner: Arc<RwLock<Inner>>,
}

impl CatalogCache {
    pub fn new(gateway: SharedGateway) -> Self {
        Self {
            gateway,
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Sessão estabelecida: ativa o cache e faz a primeira leitura.
    pub async fn load(&self) -> Result<Arc<CatalogSnapshot>, AppError> {
        {
            let mut inner = self.inner.write().await;
            inner.active = true;
            inner.epoch += 1;
        }
        self.refresh().await
    }

    /// Sessão encerrada: volta ao snapshot vazio, sem erro e sem carregamento.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.active = false;
        inner.epoch += 1;
        inner.snapshot = Arc::default();
        inner.loading = false;
        inner.error = None;
    }

    /// Relê as cinco coleções em paralelo. Em caso de falha o snapshot anterior
    /// é mantido e o erro fica registrado no estado.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, AppError> {
        let (epoch, ticket) = {
            let mut inner = self.inner.write().await;
            if !inner.active {
                inner.snapshot = Arc::default();
                inner.loading = false;
                inner.error = None;
                return Ok(inner.snapshot.clone());
            }
            inner.loading = true;
            inner.next_ticket += 1;
            (inner.epoch, inner.next_ticket)
        };

        let result = self.fetch_all().await;

        let mut inner = self.inner.write().await;
        if inner.epoch != epoch {
            tracing::debug!("Leitura do catálogo descartada: sessão mudou durante a busca");
            return Ok(inner.snapshot.clone());
        }
        if ticket == inner.next_ticket {
            inner.loading = false;
        }

        match result {
            Ok(snapshot) => {
                if ticket > inner.published_ticket {
                    inner.snapshot = Arc::new(snapshot);
                    inner.published_ticket = ticket;
                    inner.error = None;
                }
                Ok(inner.snapshot.clone())
            }
            // Uma leitura mais nova já publicou: a falha desta não vale mais
            Err(e) if ticket < inner.published_ticket => {
                tracing::debug!("Falha de leitura antiga ignorada: {}", e);
                Ok(inner.snapshot.clone())
            }
            Err(e) => {
                tracing::warn!("Falha ao atualizar o catálogo: {}", e);
                inner.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn fetch_all(&self) -> Result<CatalogSnapshot, AppError> {
        let (organizations, medicines, rations, articles, resource_requests) = tokio::try_join!(
            self.gateway.list_organizations(),
            self.gateway.list_medicines(),
            self.gateway.list_rations(),
            self.gateway.list_articles(),
            self.gateway.list_resource_requests(),
        )?;

        Ok(CatalogSnapshot {
            organizations,
            medicines,
            rations,
            articles,
            resource_requests,
        })
    }

    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.inner.read().await.snapshot.clone()
    }

    pub async fn state(&self) -> CatalogState {
        let inner = self.inner.read().await;
        CatalogState {
            snapshot: inner.snapshot.clone(),
            loading: inner.loading,
            error: inner.error.clone(),
            active: inner.active,
        }
    }

    /// Recursos da própria ONG, nos três tipos.
    pub async fn inventory(&self, organization_id: Uuid) -> Vec<Resource> {
        self.snapshot()
            .await
            .resources()
            .filter(|r| r.organization_id() == organization_id)
            .collect()
    }

    // --- Mutações: gateway primeiro, releitura só se deu certo ---

    pub async fn register_ngo(
        &self,
        profile: NewOrganization,
        password: &str,
    ) -> Result<Organization, AppError> {
        let organization = self.gateway.register_ngo(profile, password).await?;
        self.refresh_after_mutation().await;
        Ok(organization)
    }

    pub async fn add_resource(
        &self,
        organization_id: Uuid,
        draft: ResourceDraft,
    ) -> Result<Resource, AppError> {
        let resource = self.gateway.add_resource(organization_id, draft).await?;
        self.refresh_after_mutation().await;
        Ok(resource)
    }

    pub async fn update_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
        draft: ResourceDraft,
    ) -> Result<Resource, AppError> {
        let resource = self.gateway.update_resource(kind, id, draft).await?;
        self.refresh_after_mutation().await;
        Ok(resource)
    }

    pub async fn create_request(
        &self,
        request: NewResourceRequest,
    ) -> Result<ResourceRequest, AppError> {
        let created = self.gateway.create_resource_request(request).await?;
        self.refresh_after_mutation().await;
        Ok(created)
    }

    pub async fn update_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<ResourceRequest, AppError> {
        let updated = self.gateway.update_resource_request_status(id, status).await?;
        self.refresh_after_mutation().await;
        Ok(updated)
    }

    // A mutação já foi gravada; falha na releitura fica só no estado do cache
    async fn refresh_after_mutation(&self) {
        if self.refresh().await.is_err() {
            tracing::debug!("Catálogo mantido com o último snapshot válido");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{delayed::DelayedGateway, ApiGateway, MemoryGateway};
    use crate::models::resource::{ArticleCategory, ArticleCondition, ArticleDraft, ResourceStatus};
    use crate::services::auth::AuthService;
    use chrono::Duration;
    use tokio::task::JoinHandle;

    async fn seeded() -> (CatalogCache, MemoryGateway) {
        let gw = MemoryGateway::new(AuthService::new("teste".into(), Duration::hours(1), 4));
        gw.seed_demo().await.unwrap();
        (CatalogCache::new(Arc::new(gw.clone())), gw)
    }

    async fn slow() -> (CatalogCache, DelayedGateway) {
        let (_, gw) = seeded().await;
        let gw = DelayedGateway::new(gw);
        (CatalogCache::new(Arc::new(gw.clone())), gw)
    }

    async fn pause(ms: u64) {
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }

    fn refresh_in_background(cache: &CatalogCache) -> JoinHandle<Result<Arc<CatalogSnapshot>, AppError>> {
        let cache = cache.clone();
        tokio::spawn(async move { cache.refresh().await })
    }

    fn brinquedo() -> ResourceDraft {
        ResourceDraft::Article(ArticleDraft {
            name: "Bolinha de borracha".into(),
            category: ArticleCategory::Others,
            quantity: 10,
            condition: ArticleCondition::New,
            size_specification: None,
            notes: None,
            photo_base64: None,
        })
    }

    #[tokio::test]
    async fn inactive_cache_reports_empty_without_error() {
        let (cache, _) = seeded().await;
        let snapshot = cache.refresh().await.unwrap();
        assert!(snapshot.is_empty());

        let state = cache.state().await;
        assert!(!state.active && !state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn load_reads_all_collections_and_clear_drops_them() {
        let (cache, _) = seeded().await;
        let snapshot = cache.load().await.unwrap();
        assert_eq!(snapshot.organizations.len(), 3);
        assert_eq!(snapshot.medicines.len(), 1);
        assert_eq!(snapshot.rations.len(), 1);
        assert_eq!(snapshot.articles.len(), 1);
        assert_eq!(snapshot.resource_requests.len(), 1);

        cache.clear().await;
        let state = cache.state().await;
        assert!(state.snapshot.is_empty());
        assert!(!state.loading && !state.active && state.error.is_none());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_last_good_snapshot() {
        let (cache, gw) = seeded().await;
        cache.load().await.unwrap();

        gw.set_offline(true);
        let err = cache.refresh().await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable));

        let state = cache.state().await;
        assert_eq!(state.snapshot.organizations.len(), 3);
        assert!(state.error.is_some());
        assert!(!state.loading);

        // a próxima leitura boa limpa o erro
        gw.set_offline(false);
        cache.refresh().await.unwrap();
        assert!(cache.state().await.error.is_none());
    }

    #[tokio::test]
    async fn successful_mutation_refreshes_and_failed_one_does_not() {
        let (cache, gw) = seeded().await;
        let snapshot = cache.load().await.unwrap();
        let owner = snapshot.organizations[0].id;

        let created = cache.add_resource(owner, brinquedo()).await.unwrap();
        assert!(cache.snapshot().await.resource(ResourceKind::Articles, created.id()).is_some());

        // gravação por fora do cache: só aparece na próxima releitura
        let hidden = gw.add_resource(owner, brinquedo()).await.unwrap();
        let err = cache
            .update_resource(ResourceKind::Articles, Uuid::new_v4(), brinquedo())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound));
        assert!(cache.snapshot().await.resource(ResourceKind::Articles, hidden.id()).is_none());
    }

    #[tokio::test]
    async fn approval_through_cache_shows_donated_resource() {
        let (cache, _) = seeded().await;
        let snapshot = cache.load().await.unwrap();
        let pending = snapshot.resource_requests[0].clone();

        cache
            .update_request_status(pending.id, RequestStatus::Approved)
            .await
            .unwrap();

        let after = cache.snapshot().await;
        assert_eq!(after.request(pending.id).map(|r| r.status), Some(RequestStatus::Approved));
        let resource = after.resource(pending.resource_kind, pending.resource_id).unwrap();
        assert_eq!(resource.status(), ResourceStatus::Donated);
    }

    #[tokio::test]
    async fn inventory_lists_only_own_resources() {
        let (cache, _) = seeded().await;
        let snapshot = cache.load().await.unwrap();
        let patas = snapshot
            .organizations
            .iter()
            .find(|o| o.name == "Patas Unidas")
            .unwrap()
            .id;

        let inventory = cache.inventory(patas).await;
        let kinds: Vec<_> = inventory.iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, vec![ResourceKind::Medicines, ResourceKind::Rations]);
    }

    #[tokio::test]
    async fn clear_during_refresh_leaves_cache_empty() {
        let (cache, gw) = slow().await;
        cache.load().await.unwrap();

        gw.set_delay_ms(50);
        let in_flight = refresh_in_background(&cache);
        pause(10).await;
        cache.clear().await;

        let landed = in_flight.await.unwrap().unwrap();
        assert!(landed.is_empty());
        let state = cache.state().await;
        assert!(state.snapshot.is_empty());
        assert!(!state.active && !state.loading && state.error.is_none());
    }

    #[tokio::test]
    async fn older_refresh_does_not_overwrite_newer_snapshot() {
        let (cache, gw) = slow().await;
        let snapshot = cache.load().await.unwrap();
        let owner = snapshot.organizations[0].id;

        // a leitura antiga ainda não vê o brinquedo
        gw.set_delay_ms(50);
        let older = refresh_in_background(&cache);
        pause(10).await;

        gw.set_delay_ms(0);
        let created = gw.inner.add_resource(owner, brinquedo()).await.unwrap();
        let newer = cache.refresh().await.unwrap();
        assert!(newer.resource(ResourceKind::Articles, created.id()).is_some());

        let landed = older.await.unwrap().unwrap();
        assert!(landed.resource(ResourceKind::Articles, created.id()).is_some());
        assert!(cache.snapshot().await.resource(ResourceKind::Articles, created.id()).is_some());
        assert!(!cache.state().await.loading);
    }

    #[tokio::test]
    async fn older_failure_after_newer_success_is_not_an_error() {
        let (cache, gw) = slow().await;
        cache.load().await.unwrap();

        gw.set_delay_ms(50);
        gw.set_failing(true);
        let older = refresh_in_background(&cache);
        pause(10).await;

        gw.set_delay_ms(0);
        gw.set_failing(false);
        cache.refresh().await.unwrap();

        assert!(older.await.unwrap().is_ok());
        let state = cache.state().await;
        assert!(state.error.is_none());
        assert!(!state.loading);
        assert_eq!(state.snapshot.organizations.len(), 3);
    }
}
