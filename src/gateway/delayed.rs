// src/gateway/delayed.rs
//
// Gateway de teste: repassa tudo ao MemoryGateway, mas as leituras demoram a
// "voltar da rede". Serve para montar corridas entre chamadas concorrentes.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    gateway::{ApiGateway, MemoryGateway},
    models::{
        auth::Session,
        organization::{NewOrganization, Organization},
        request::{NewResourceRequest, RequestStatus, ResourceRequest},
        resource::{Article, Medicine, Ration, Resource, ResourceDraft, ResourceKind},
    },
};

#[derive(Clone)]
pub struct DelayedGateway {
    pub inner: MemoryGateway,
    delay_ms: Arc<AtomicU64>,
    failing: Arc<AtomicBool>,
}

impl DelayedGateway {
    pub fn new(inner: MemoryGateway) -> Self {
        Self {
            inner,
            delay_ms: Arc::new(AtomicU64::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Vale para as leituras iniciadas daqui em diante.
    pub fn set_delay_ms(&self, ms: u64) {
        self.delay_ms.store(ms, Ordering::SeqCst);
    }

    /// Leituras iniciadas daqui em diante falham depois do atraso.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    // Lê já, responde depois. Atraso e falha são os do início da chamada.
    async fn read<T: Send>(
        &self,
        call: impl Future<Output = Result<T, AppError>> + Send,
    ) -> Result<T, AppError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        let failing = self.failing.load(Ordering::SeqCst);
        let result = call.await;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if failing {
            return Err(AppError::StoreUnavailable);
        }
        result
    }
}

#[async_trait]
impl ApiGateway for DelayedGateway {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        self.inner.login(email, password).await
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.inner.logout(token).await
    }

    async fn authenticated_user(&self, token: &str) -> Result<Option<Organization>, AppError> {
        self.inner.authenticated_user(token).await
    }

    async fn register_ngo(
        &self,
        profile: NewOrganization,
        password: &str,
    ) -> Result<Organization, AppError> {
        self.inner.register_ngo(profile, password).await
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, AppError> {
        self.read(self.inner.list_organizations()).await
    }

    async fn organization_by_id(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        self.read(self.inner.organization_by_id(id)).await
    }

    async fn list_medicines(&self) -> Result<Vec<Medicine>, AppError> {
        self.read(self.inner.list_medicines()).await
    }

    async fn list_rations(&self) -> Result<Vec<Ration>, AppError> {
        self.read(self.inner.list_rations()).await
    }

    async fn list_articles(&self) -> Result<Vec<Article>, AppError> {
        self.read(self.inner.list_articles()).await
    }

    async fn resource(&self, kind: ResourceKind, id: Uuid) -> Result<Option<Resource>, AppError> {
        self.read(self.inner.resource(kind, id)).await
    }

    async fn add_resource(
        &self,
        organization_id: Uuid,
        draft: ResourceDraft,
    ) -> Result<Resource, AppError> {
        self.inner.add_resource(organization_id, draft).await
    }

    async fn update_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
        draft: ResourceDraft,
    ) -> Result<Resource, AppError> {
        self.inner.update_resource(kind, id, draft).await
    }

    async fn list_resource_requests(&self) -> Result<Vec<ResourceRequest>, AppError> {
        self.read(self.inner.list_resource_requests()).await
    }

    async fn requests_for_donor(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<ResourceRequest>, AppError> {
        self.read(self.inner.requests_for_donor(organization_id)).await
    }

    async fn create_resource_request(
        &self,
        request: NewResourceRequest,
    ) -> Result<ResourceRequest, AppError> {
        self.inner.create_resource_request(request).await
    }

    async fn update_resource_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<ResourceRequest, AppError> {
        self.inner.update_resource_request_status(id, status).await
    }
}
