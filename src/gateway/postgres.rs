// src/gateway/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrganizationRepository, RequestRepository, ResourceRepository, SessionRepository},
    gateway::ApiGateway,
    models::{
        auth::Session,
        organization::{normalize_email, NewOrganization, Organization},
        request::{NewResourceRequest, RequestStatus, ResourceRequest},
        resource::{Article, Medicine, Ration, Resource, ResourceDraft, ResourceKind},
    },
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
    auth: AuthService,
    organization_repo: OrganizationRepository,
    resource_repo: ResourceRepository,
    request_repo: RequestRepository,
    session_repo: SessionRepository,
}

impl PgGateway {
    pub fn new(pool: PgPool, auth: AuthService) -> Self {
        Self {
            organization_repo: OrganizationRepository::new(pool.clone()),
            resource_repo: ResourceRepository::new(pool.clone()),
            request_repo: RequestRepository::new(pool.clone()),
            session_repo: SessionRepository::new(pool.clone()),
            pool,
            auth,
        }
    }
}

#[async_trait]
impl ApiGateway for PgGateway {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let account = self
            .organization_repo
            .find_account_by_email(&normalize_email(email))
            .await?;

        // Sem conta, a verificação roda contra um hash descartável
        let hash = account.as_ref().map(|a| a.password_hash.as_str());
        if !self.auth.verify_login(password, hash).await? {
            return Err(AppError::InvalidCredentials);
        }
        let account = account.ok_or(AppError::InvalidCredentials)?;

        let organization = self
            .organization_repo
            .find_by_owner_account(account.id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let token = self.auth.create_token(organization.id)?;
        Ok(Session { token, organization })
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        let Ok(claims) = self.auth.decode_token(token) else {
            return Ok(());
        };
        let expires_at =
            DateTime::<Utc>::from_timestamp(claims.exp as i64, 0).unwrap_or_else(Utc::now);

        // Melhor esforço: se o banco falhar, o cliente descarta o token do mesmo jeito
        if let Err(e) = self.session_repo.revoke(claims.jti, expires_at).await {
            tracing::warn!("Falha ao revogar sessão {}: {}", claims.jti, e);
        }
        Ok(())
    }

    async fn authenticated_user(&self, token: &str) -> Result<Option<Organization>, AppError> {
        let Ok(claims) = self.auth.decode_token(token) else {
            return Ok(None);
        };
        if self.session_repo.is_revoked(claims.jti).await? {
            return Ok(None);
        }
        self.organization_repo.find_by_id(claims.sub).await
    }

    async fn register_ngo(
        &self,
        mut profile: NewOrganization,
        password: &str,
    ) -> Result<Organization, AppError> {
        profile.contact_email = normalize_email(&profile.contact_email);

        // 1. Hashing (fora da transação, não toca no banco)
        let password_hash = self.auth.hash_password(password).await?;

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        // 2. Credencial. E-mail repetido -> EmailAlreadyExists e rollback no drop
        let account = self
            .organization_repo
            .create_account(&mut *tx, &profile.contact_email, &password_hash)
            .await?;

        // 3. A ONG, ligada à credencial
        let organization = self
            .organization_repo
            .create_organization(&mut *tx, &profile, account.id)
            .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        Ok(organization)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, AppError> {
        self.organization_repo.list_all().await
    }

    async fn organization_by_id(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        self.organization_repo.find_by_id(id).await
    }

    async fn list_medicines(&self) -> Result<Vec<Medicine>, AppError> {
        self.resource_repo.list_medicines().await
    }

    async fn list_rations(&self) -> Result<Vec<Ration>, AppError> {
        self.resource_repo.list_rations().await
    }

    async fn list_articles(&self) -> Result<Vec<Article>, AppError> {
        self.resource_repo.list_articles().await
    }

    async fn resource(&self, kind: ResourceKind, id: Uuid) -> Result<Option<Resource>, AppError> {
        self.resource_repo.find(&self.pool, kind, id).await
    }

    async fn add_resource(
        &self,
        organization_id: Uuid,
        draft: ResourceDraft,
    ) -> Result<Resource, AppError> {
        if self.organization_repo.find_by_id(organization_id).await?.is_none() {
            return Err(AppError::OrganizationNotFound);
        }
        self.resource_repo.insert(&self.pool, organization_id, &draft).await
    }

    async fn update_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
        draft: ResourceDraft,
    ) -> Result<Resource, AppError> {
        if draft.kind() != kind {
            return Err(AppError::BadRequest(format!(
                "rascunho de {} enviado para {}",
                draft.kind(),
                kind
            )));
        }
        self.resource_repo
            .update(&self.pool, id, &draft)
            .await?
            .ok_or(AppError::ResourceNotFound)
    }

    async fn list_resource_requests(&self) -> Result<Vec<ResourceRequest>, AppError> {
        self.request_repo.list_all().await
    }

    async fn requests_for_donor(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<ResourceRequest>, AppError> {
        self.request_repo.list_for_donor(organization_id).await
    }

    async fn create_resource_request(
        &self,
        request: NewResourceRequest,
    ) -> Result<ResourceRequest, AppError> {
        if self
            .organization_repo
            .find_by_id(request.requesting_organization_id)
            .await?
            .is_none()
        {
            return Err(AppError::OrganizationNotFound);
        }

        // A linha do recurso fica travada: outro pedido ou uma aprovação
        // simultânea esperam o commit e releem o estado.
        let mut tx = self.pool.begin().await?;

        let resource = self
            .resource_repo
            .find_for_update(&mut *tx, request.resource_kind, request.resource_id)
            .await?
            .ok_or(AppError::ResourceNotFound)?;
        if resource.organization_id() != request.donating_organization_id {
            return Err(AppError::ResourceNotFound);
        }
        if request.requesting_organization_id == request.donating_organization_id {
            return Err(AppError::OwnResourceRequest);
        }
        if !resource.status().is_requestable() {
            return Err(AppError::ResourceUnavailable);
        }
        if self.request_repo.has_pending(&mut *tx, &request).await? {
            return Err(AppError::DuplicateRequest);
        }

        let created = self.request_repo.insert(&mut *tx, &request).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update_resource_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<ResourceRequest, AppError> {
        if !status.is_terminal() {
            return Err(AppError::InvalidDecision);
        }

        // Pedido e recurso mudam juntos ou não mudam
        let mut tx = self.pool.begin().await?;

        let current = self
            .request_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::RequestNotFound)?;
        if !current.status.can_transition_to(status) {
            return Err(AppError::RequestAlreadyDecided);
        }

        if status == RequestStatus::Approved {
            let donated = self
                .resource_repo
                .mark_donated(&mut *tx, current.resource_kind, current.resource_id)
                .await?;
            if !donated {
                let exists = self
                    .resource_repo
                    .find(&mut *tx, current.resource_kind, current.resource_id)
                    .await?
                    .is_some();
                return Err(if exists {
                    AppError::ResourceUnavailable
                } else {
                    AppError::ResourceNotFound
                });
            }
        }

        let decided = self
            .request_repo
            .decide(&mut *tx, id, status)
            .await?
            .ok_or(AppError::RequestAlreadyDecided)?;

        tx.commit().await?;
        Ok(decided)
    }
}
