// src/gateway/memory.rs
//
// Armazenamento em memória. Serve para rodar a API sem PostgreSQL (com os
// dados de demonstração) e para os testes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    gateway::ApiGateway,
    models::{
        auth::Session,
        organization::{normalize_email, Account, NewOrganization, Organization, OrganizationStatus},
        request::{NewResourceRequest, RequestStatus, ResourceRequest},
        resource::{
            Article, ArticleCategory, ArticleCondition, ArticleDraft, Medicine, MedicineDraft,
            Ration, RationDraft, Resource, ResourceBase, ResourceDraft, ResourceKind,
            ResourceStatus,
        },
    },
    services::auth::AuthService,
};

pub const DEMO_PASSWORD: &str = "password123";

#[derive(Default)]
struct MemoryStore {
    accounts: Vec<Account>,
    organizations: Vec<Organization>,
    medicines: Vec<Medicine>,
    rations: Vec<Ration>,
    articles: Vec<Article>,
    resource_requests: Vec<ResourceRequest>,
    // jti -> expiração do token
    revoked_tokens: HashMap<Uuid, DateTime<Utc>>,
}

impl MemoryStore {
    fn resource(&self, kind: ResourceKind, id: Uuid) -> Option<Resource> {
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

    fn insert_resource(&mut self, resource: Resource) {
        match resource {
            Resource::Medicine(m) => self.medicines.push(m),
            Resource::Ration(r) => self.rations.push(r),
            Resource::Article(a) => self.articles.push(a),
        }
    }

    // Troca o registro de mesmo tipo e id; devolve false se não existir.
    fn replace_resource(&mut self, resource: Resource) -> bool {
        let id = resource.id();
        match resource {
            Resource::Medicine(m) => match self.medicines.iter_mut().find(|x| x.base.id == id) {
                Some(slot) => {
                    *slot = m;
                    true
                }
                None => false,
            },
            Resource::Ration(r) => match self.rations.iter_mut().find(|x| x.base.id == id) {
                Some(slot) => {
                    *slot = r;
                    true
                }
                None => false,
            },
            Resource::Article(a) => match self.articles.iter_mut().find(|x| x.base.id == id) {
                Some(slot) => {
                    *slot = a;
                    true
                }
                None => false,
            },
        }
    }

    fn organization(&self, id: Uuid) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.id == id)
    }

    fn email_taken(&self, email: &str) -> bool {
        self.accounts.iter().any(|a| a.email == email)
            || self.organizations.iter().any(|o| o.contact_email == email)
    }
}

#[derive(Clone)]
pub struct MemoryGateway {
    store: Arc<RwLock<MemoryStore>>,
    auth: AuthService,
    offline: Arc<AtomicBool>,
}

impl MemoryGateway {
    pub fn new(auth: AuthService) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::default())),
            auth,
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simula queda do armazenamento: enquanto ligado, toda chamada falha.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable);
        }
        Ok(())
    }

    /// Processo administrativo de verificação (fora do fluxo da aplicação).
    pub async fn set_organization_status(
        &self,
        id: Uuid,
        status: OrganizationStatus,
    ) -> Result<Organization, AppError> {
        let mut store = self.store.write().await;
        let org = store
            .organizations
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(AppError::OrganizationNotFound)?;
        org.status = status;
        Ok(org.clone())
    }

    /// Base de demonstração: três ONGs (duas verificadas), um medicamento,
    /// uma ração, um artigo e um pedido pendente. Senha de todas: `password123`.
    pub async fn seed_demo(&self) -> Result<(), AppError> {
        let today = Local::now().date_naive();

        let cao = self
            .seed_organization("Cão Sem Fome", "11.111.111/0001-11", "São Paulo", "SP", "caosemfome@test.com", "11999999999")
            .await?;
        let patas = self
            .seed_organization("Patas Unidas", "22.222.222/0001-22", "Rio de Janeiro", "RJ", "patasunidas@test.com", "21999999999")
            .await?;
        let focinhos = self
            .seed_organization("Focinhos Carentes", "33.333.333/0001-33", "Belo Horizonte", "MG", "focinhos@test.com", "31999999999")
            .await?;
        self.set_organization_status(cao.id, OrganizationStatus::Verified).await?;
        self.set_organization_status(patas.id, OrganizationStatus::Verified).await?;
        tracing::debug!("ONG {} permanece pendente na base de demonstração", focinhos.name);

        self.add_resource(
            patas.id,
            ResourceDraft::Medicine(MedicineDraft {
                name: "Vermífugo Drontal".into(),
                active_ingredient: "Praziquantel".into(),
                quantity: "2 caixas".into(),
                expiration_date: today + Duration::days(60),
                notes: None,
                photo_base64: None,
            }),
        )
        .await?;
        self.add_resource(
            patas.id,
            ResourceDraft::Ration(RationDraft {
                brand: "Golden Power Training".into(),
                quantity_kg: Decimal::new(15, 0),
                expiration_date: today + Duration::days(200),
                notes: None,
                photo_base64: None,
            }),
        )
        .await?;
        let coleira = self
            .add_resource(
                cao.id,
                ResourceDraft::Article(ArticleDraft {
                    name: "Coleira Anti-pulgas".into(),
                    category: ArticleCategory::Accessories,
                    quantity: 5,
                    condition: ArticleCondition::New,
                    size_specification: Some("Tamanho M".into()),
                    notes: None,
                    photo_base64: None,
                }),
            )
            .await?;
        self.create_resource_request(NewResourceRequest {
            resource_id: coleira.id(),
            resource_kind: ResourceKind::Articles,
            donating_organization_id: cao.id,
            requesting_organization_id: patas.id,
        })
        .await?;

        tracing::info!("🌱 Base de demonstração carregada em memória.");
        Ok(())
    }

    async fn seed_organization(
        &self,
        name: &str,
        registration_number: &str,
        city: &str,
        state: &str,
        email: &str,
        phone: &str,
    ) -> Result<Organization, AppError> {
        self.register_ngo(
            NewOrganization {
                name: name.into(),
                registration_number: registration_number.into(),
                city: city.into(),
                state: state.into(),
                contact_email: email.into(),
                contact_phone: phone.into(),
            },
            DEMO_PASSWORD,
        )
        .await
    }
}

#[async_trait]
impl ApiGateway for MemoryGateway {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        self.ensure_online()?;
        let email = normalize_email(email);

        let account = {
            let store = self.store.read().await;
            store.accounts.iter().find(|a| a.email == email).cloned()
        };

        let hash = account.as_ref().map(|a| a.password_hash.as_str());
        if !self.auth.verify_login(password, hash).await? {
            return Err(AppError::InvalidCredentials);
        }
        let account = account.ok_or(AppError::InvalidCredentials)?;

        let organization = {
            let store = self.store.read().await;
            store
                .organizations
                .iter()
                .find(|o| o.owner_account_id == account.id)
                .cloned()
        }
        .ok_or(AppError::InvalidCredentials)?;

        let token = self.auth.create_token(organization.id)?;
        Ok(Session { token, organization })
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        if let Ok(claims) = self.auth.decode_token(token) {
            let expires_at =
                DateTime::<Utc>::from_timestamp(claims.exp as i64, 0).unwrap_or_else(Utc::now);
            let mut store = self.store.write().await;
            // Token expirado já é recusado pela validação do JWT
            let now = Utc::now();
            store.revoked_tokens.retain(|_, exp| *exp > now);
            store.revoked_tokens.insert(claims.jti, expires_at);
        }
        Ok(())
    }

    async fn authenticated_user(&self, token: &str) -> Result<Option<Organization>, AppError> {
        self.ensure_online()?;
        let Ok(claims) = self.auth.decode_token(token) else {
            return Ok(None);
        };
        let store = self.store.read().await;
        if store.revoked_tokens.contains_key(&claims.jti) {
            return Ok(None);
        }
        Ok(store.organization(claims.sub).cloned())
    }

    async fn register_ngo(
        &self,
        mut profile: NewOrganization,
        password: &str,
    ) -> Result<Organization, AppError> {
        self.ensure_online()?;
        profile.contact_email = normalize_email(&profile.contact_email);

        if self.store.read().await.email_taken(&profile.contact_email) {
            return Err(AppError::EmailAlreadyExists);
        }
        let password_hash = self.auth.hash_password(password).await?;

        let mut store = self.store.write().await;
        // De novo, agora com o lock de escrita: outro cadastro pode ter entrado durante o hash
        if store.email_taken(&profile.contact_email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email: profile.contact_email.clone(),
            password_hash,
            created_at: now,
        };
        let organization = Organization {
            id: Uuid::new_v4(),
            created_at: now,
            name: profile.name,
            registration_number: profile.registration_number,
            city: profile.city,
            state: profile.state,
            contact_email: profile.contact_email,
            contact_phone: profile.contact_phone,
            status: OrganizationStatus::Pending,
            owner_account_id: account.id,
        };
        store.accounts.push(account);
        store.organizations.push(organization.clone());
        Ok(organization)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, AppError> {
        self.ensure_online()?;
        Ok(self.store.read().await.organizations.clone())
    }

    async fn organization_by_id(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        self.ensure_online()?;
        Ok(self.store.read().await.organization(id).cloned())
    }

    async fn list_medicines(&self) -> Result<Vec<Medicine>, AppError> {
        self.ensure_online()?;
        Ok(self.store.read().await.medicines.clone())
    }

    async fn list_rations(&self) -> Result<Vec<Ration>, AppError> {
        self.ensure_online()?;
        Ok(self.store.read().await.rations.clone())
    }

    async fn list_articles(&self) -> Result<Vec<Article>, AppError> {
        self.ensure_online()?;
        Ok(self.store.read().await.articles.clone())
    }

    async fn resource(&self, kind: ResourceKind, id: Uuid) -> Result<Option<Resource>, AppError> {
        self.ensure_online()?;
        Ok(self.store.read().await.resource(kind, id))
    }

    async fn add_resource(
        &self,
        organization_id: Uuid,
        draft: ResourceDraft,
    ) -> Result<Resource, AppError> {
        self.ensure_online()?;
        let mut store = self.store.write().await;
        if store.organization(organization_id).is_none() {
            return Err(AppError::OrganizationNotFound);
        }

        let base = ResourceBase {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            organization_id,
            status: ResourceStatus::Available,
            photo_base64: None,
        };
        let resource = draft.into_resource(base);
        store.insert_resource(resource.clone());
        Ok(resource)
    }

    async fn update_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
        draft: ResourceDraft,
    ) -> Result<Resource, AppError> {
        self.ensure_online()?;
        if draft.kind() != kind {
            return Err(AppError::BadRequest(format!(
                "rascunho de {} enviado para {}",
                draft.kind(),
                kind
            )));
        }

        let mut store = self.store.write().await;
        let current = store.resource(kind, id).ok_or(AppError::ResourceNotFound)?;
        let updated = draft.into_resource(current.base().clone());
        store.replace_resource(updated.clone());
        Ok(updated)
    }

    async fn list_resource_requests(&self) -> Result<Vec<ResourceRequest>, AppError> {
        self.ensure_online()?;
        Ok(self.store.read().await.resource_requests.clone())
    }

    async fn requests_for_donor(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<ResourceRequest>, AppError> {
        self.ensure_online()?;
        Ok(self
            .store
            .read()
            .await
            .resource_requests
            .iter()
            .filter(|r| r.donating_organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn create_resource_request(
        &self,
        request: NewResourceRequest,
    ) -> Result<ResourceRequest, AppError> {
        self.ensure_online()?;
        let mut store = self.store.write().await;

        let resource = store
            .resource(request.resource_kind, request.resource_id)
            .ok_or(AppError::ResourceNotFound)?;
        if resource.organization_id() != request.donating_organization_id {
            return Err(AppError::ResourceNotFound);
        }
        if store.organization(request.donating_organization_id).is_none()
            || store.organization(request.requesting_organization_id).is_none()
        {
            return Err(AppError::OrganizationNotFound);
        }
        if request.requesting_organization_id == request.donating_organization_id {
            return Err(AppError::OwnResourceRequest);
        }
        if !resource.status().is_requestable() {
            return Err(AppError::ResourceUnavailable);
        }
        let duplicate = store.resource_requests.iter().any(|r| {
            r.resource_id == request.resource_id
                && r.resource_kind == request.resource_kind
                && r.requesting_organization_id == request.requesting_organization_id
                && r.status == RequestStatus::Pending
        });
        if duplicate {
            return Err(AppError::DuplicateRequest);
        }

        let created = ResourceRequest {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            resource_id: request.resource_id,
            resource_kind: request.resource_kind,
            donating_organization_id: request.donating_organization_id,
            requesting_organization_id: request.requesting_organization_id,
            status: RequestStatus::Pending,
        };
        store.resource_requests.push(created.clone());
        Ok(created)
    }

    async fn update_resource_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<ResourceRequest, AppError> {
        self.ensure_online()?;
        if !status.is_terminal() {
            return Err(AppError::InvalidDecision);
        }

        // Um único lock de escrita cobre o pedido e o recurso
        let mut store = self.store.write().await;
        let current = store
            .resource_requests
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(AppError::RequestNotFound)?;
        if !current.status.can_transition_to(status) {
            return Err(AppError::RequestAlreadyDecided);
        }

        if status == RequestStatus::Approved {
            let mut resource = store
                .resource(current.resource_kind, current.resource_id)
                .ok_or(AppError::ResourceNotFound)?;
            if !resource.status().is_requestable() {
                return Err(AppError::ResourceUnavailable);
            }
            resource.base_mut().status = ResourceStatus::Donated;
            store.replace_resource(resource);
        }

        let slot = store
            .resource_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::RequestNotFound)?;
        slot.status = status;
        Ok(slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> MemoryGateway {
        MemoryGateway::new(AuthService::new("teste".into(), Duration::hours(1), 4))
    }

    fn profile(email: &str) -> NewOrganization {
        NewOrganization {
            name: "Amigos de Quatro Patas".into(),
            registration_number: "44.444.444/0001-44".into(),
            city: "Curitiba".into(),
            state: "PR".into(),
            contact_email: email.into(),
            contact_phone: "41999999999".into(),
        }
    }

    fn coleira() -> ResourceDraft {
        ResourceDraft::Article(ArticleDraft {
            name: "Coleira Anti-pulgas".into(),
            category: ArticleCategory::Accessories,
            quantity: 5,
            condition: ArticleCondition::New,
            size_specification: Some("Tamanho M".into()),
            notes: None,
            photo_base64: None,
        })
    }

    #[tokio::test]
    async fn registration_creates_pending_organization_without_session() {
        let gw = gateway();
        let org = gw.register_ngo(profile("Nova@Test.com "), "segredo1").await.unwrap();

        assert_eq!(org.status, OrganizationStatus::Pending);
        assert_eq!(org.contact_email, "nova@test.com");
        assert_eq!(gw.list_organizations().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict_and_changes_nothing() {
        let gw = gateway();
        gw.register_ngo(profile("dup@test.com"), "segredo1").await.unwrap();
        let before = gw.list_organizations().await.unwrap();

        let err = gw.register_ngo(profile("DUP@test.com"), "outra-senha").await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists));
        assert_eq!(gw.list_organizations().await.unwrap(), before);
    }

    #[tokio::test]
    async fn login_does_not_reveal_which_part_was_wrong() {
        let gw = gateway();
        gw.register_ngo(profile("ong@test.com"), "segredo1").await.unwrap();

        let wrong_password = gw.login("ong@test.com", "errada").await.unwrap_err();
        let unknown_email = gw.login("ninguem@test.com", "segredo1").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let gw = gateway();
        let org = gw.register_ngo(profile("ong@test.com"), "segredo1").await.unwrap();
        let session = gw.login("ong@test.com", "segredo1").await.unwrap();
        assert_eq!(session.organization.id, org.id);

        let current = gw.authenticated_user(&session.token).await.unwrap();
        assert_eq!(current.map(|o| o.id), Some(org.id));

        gw.logout(&session.token).await.unwrap();
        assert!(gw.authenticated_user(&session.token).await.unwrap().is_none());
        // logout repetido ou com lixo também "funciona"
        gw.logout(&session.token).await.unwrap();
        gw.logout("lixo").await.unwrap();
    }

    #[tokio::test]
    async fn logout_prunes_expired_revocations() {
        let gw = gateway();
        gw.register_ngo(profile("ong@test.com"), "segredo1").await.unwrap();
        let stale = Uuid::new_v4();
        gw.store
            .write()
            .await
            .revoked_tokens
            .insert(stale, Utc::now() - Duration::minutes(5));

        let session = gw.login("ong@test.com", "segredo1").await.unwrap();
        gw.logout(&session.token).await.unwrap();

        let store = gw.store.read().await;
        assert!(!store.revoked_tokens.contains_key(&stale));
        assert_eq!(store.revoked_tokens.len(), 1);
    }

    #[tokio::test]
    async fn update_keeps_identity_and_status() {
        let gw = gateway();
        let org = gw.register_ngo(profile("ong@test.com"), "segredo1").await.unwrap();
        let created = gw.add_resource(org.id, coleira()).await.unwrap();
        assert_eq!(created.status(), ResourceStatus::Available);

        let ResourceDraft::Article(mut draft) = coleira() else { unreachable!() };
        draft.quantity = 3;
        let updated = gw
            .update_resource(ResourceKind::Articles, created.id(), ResourceDraft::Article(draft))
            .await
            .unwrap();
        assert_eq!(updated.id(), created.id());
        assert_eq!(updated.base().created_at, created.base().created_at);
        assert_eq!(updated.status(), ResourceStatus::Available);

        let missing = gw
            .update_resource(ResourceKind::Articles, Uuid::new_v4(), coleira())
            .await
            .unwrap_err();
        assert!(matches!(missing, AppError::ResourceNotFound));

        // o id existe, mas em outra coleção
        let wrong_kind = gw.resource(ResourceKind::Medicines, created.id()).await.unwrap();
        assert!(wrong_kind.is_none());
    }

    #[tokio::test]
    async fn approval_donates_resource_once_and_is_terminal() {
        let gw = gateway();
        let donor = gw.register_ngo(profile("doadora@test.com"), "segredo1").await.unwrap();
        let requester = gw.register_ngo(profile("pedinte@test.com"), "segredo1").await.unwrap();
        let third = gw.register_ngo(profile("terceira@test.com"), "segredo1").await.unwrap();
        let item = gw.add_resource(donor.id, coleira()).await.unwrap();

        let new_request = NewResourceRequest {
            resource_id: item.id(),
            resource_kind: ResourceKind::Articles,
            donating_organization_id: donor.id,
            requesting_organization_id: requester.id,
        };
        let first = gw.create_resource_request(new_request.clone()).await.unwrap();
        let second = gw
            .create_resource_request(NewResourceRequest {
                requesting_organization_id: third.id,
                ..new_request.clone()
            })
            .await
            .unwrap();
        assert_eq!(first.status, RequestStatus::Pending);

        let approved = gw
            .update_resource_request_status(first.id, RequestStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        let donated = gw.resource(ResourceKind::Articles, item.id()).await.unwrap().unwrap();
        assert_eq!(donated.status(), ResourceStatus::Donated);

        // estados terminais não mudam
        for next in [RequestStatus::Rejected, RequestStatus::Approved] {
            let err = gw.update_resource_request_status(first.id, next).await.unwrap_err();
            assert!(matches!(err, AppError::RequestAlreadyDecided));
        }

        // o mesmo item não pode ser doado duas vezes
        let err = gw
            .update_resource_request_status(second.id, RequestStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ResourceUnavailable));
        let still_pending = gw.requests_for_donor(donor.id).await.unwrap();
        assert!(still_pending.iter().any(|r| r.id == second.id && r.status == RequestStatus::Pending));

        // recurso doado não recebe pedidos novos
        let err = gw
            .create_resource_request(NewResourceRequest {
                requesting_organization_id: third.id,
                ..new_request
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ResourceUnavailable));
    }

    #[tokio::test]
    async fn request_rules_are_checked_with_the_write() {
        let gw = gateway();
        let donor = gw.register_ngo(profile("doadora@test.com"), "segredo1").await.unwrap();
        let requester = gw.register_ngo(profile("pedinte@test.com"), "segredo1").await.unwrap();
        let item = gw.add_resource(donor.id, coleira()).await.unwrap();
        let new_request = NewResourceRequest {
            resource_id: item.id(),
            resource_kind: ResourceKind::Articles,
            donating_organization_id: donor.id,
            requesting_organization_id: requester.id,
        };

        gw.create_resource_request(new_request.clone()).await.unwrap();
        let err = gw.create_resource_request(new_request.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateRequest));

        let err = gw
            .create_resource_request(NewResourceRequest {
                requesting_organization_id: donor.id,
                ..new_request
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::OwnResourceRequest));
        assert_eq!(gw.list_resource_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn request_must_point_at_a_resource_of_the_donor() {
        let gw = gateway();
        let donor = gw.register_ngo(profile("doadora@test.com"), "segredo1").await.unwrap();
        let other = gw.register_ngo(profile("outra@test.com"), "segredo1").await.unwrap();
        let item = gw.add_resource(donor.id, coleira()).await.unwrap();

        let err = gw
            .create_resource_request(NewResourceRequest {
                resource_id: item.id(),
                resource_kind: ResourceKind::Articles,
                donating_organization_id: other.id,
                requesting_organization_id: donor.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound));

        let err = gw
            .update_resource_request_status(Uuid::new_v4(), RequestStatus::Rejected)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RequestNotFound));
    }

    #[tokio::test]
    async fn offline_store_fails_every_read() {
        let gw = gateway();
        gw.set_offline(true);
        assert!(matches!(gw.list_medicines().await, Err(AppError::StoreUnavailable)));
        gw.set_offline(false);
        assert!(gw.list_medicines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn demo_seed_matches_the_published_fixtures() {
        let gw = gateway();
        gw.seed_demo().await.unwrap();

        assert_eq!(gw.list_organizations().await.unwrap().len(), 3);
        assert_eq!(gw.list_articles().await.unwrap()[0].name, "Coleira Anti-pulgas");
        let session = gw.login("caosemfome@test.com", DEMO_PASSWORD).await.unwrap();
        assert!(session.organization.is_verified());
        assert_eq!(gw.requests_for_donor(session.organization.id).await.unwrap().len(), 1);
    }
}
