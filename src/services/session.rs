// src/services/session.rs

use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use crate::{
    common::error::AppError,
    gateway::SharedGateway,
    models::organization::{NewOrganization, Organization},
};

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    organization: Option<Organization>,
}

/// Dono do "usuário atual" de um cliente. Criado no início do processo e
/// esvaziado no logout; quem precisa saber de mudanças usa `subscribe()`.
#[derive(Clone)]
pub struct SessionManager {
    gateway: SharedGateway,
    state: Arc<RwLock<SessionState>>,
    changes: Arc<watch::Sender<Option<Organization>>>,
}

impl SessionManager {
    pub fn new(gateway: SharedGateway) -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            gateway,
            state: Arc::new(RwLock::new(SessionState::default())),
            changes: Arc::new(changes),
        }
    }

    /// Verificação de sessão na inicialização, a partir de um token guardado.
    /// Falha do armazenamento também termina sem usuário.
    pub async fn restore(&self, token: Option<String>) -> Option<Organization> {
        let Some(token) = token else {
            self.publish(None, None).await;
            return None;
        };

        let organization = match self.gateway.authenticated_user(&token).await {
            Ok(organization) => organization,
            Err(e) => {
                tracing::warn!("Falha ao verificar a sessão salva: {}", e);
                None
            }
        };
        let token = organization.as_ref().map(|_| token);
        self.publish(token, organization.clone()).await;
        organization
    }

    /// Em caso de erro o usuário atual vira `None`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Organization, AppError> {
        match self.gateway.login(email, password).await {
            Ok(session) => {
                tracing::info!("🔑 Sessão aberta para {}", session.organization.name);
                self.publish(Some(session.token), Some(session.organization.clone()))
                    .await;
                Ok(session.organization)
            }
            Err(e) => {
                self.publish(None, None).await;
                Err(e)
            }
        }
    }

    pub async fn logout(&self) {
        let token = self.state.read().await.token.clone();
        if let Some(token) = token {
            if let Err(e) = self.gateway.logout(&token).await {
                tracing::warn!("Falha ao encerrar a sessão no servidor: {}", e);
            }
        }
        self.publish(None, None).await;
    }

    /// Cadastro não abre sessão: a ONG nasce pendente.
    pub async fn register(
        &self,
        profile: NewOrganization,
        password: &str,
    ) -> Result<Organization, AppError> {
        self.gateway.register_ngo(profile, password).await
    }

    /// Relê a ONG atual (ex.: depois que ela foi verificada).
    pub async fn refresh_user(&self) -> Result<Option<Organization>, AppError> {
        let Some(token) = self.token().await else {
            return Ok(None);
        };
        let organization = self.gateway.authenticated_user(&token).await?;
        let token = organization.as_ref().map(|_| token);
        self.publish(token, organization.clone()).await;
        Ok(organization)
    }

    pub async fn current(&self) -> Option<Organization> {
        self.state.read().await.organization.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Organization>> {
        self.changes.subscribe()
    }

    async fn publish(&self, token: Option<String>, organization: Option<Organization>) {
        {
            let mut state = self.state.write().await;
            state.token = token;
            state.organization = organization.clone();
        }
        // Só notifica quando o usuário muda de fato
        self.changes.send_if_modified(|current| {
            let changed = current.as_ref().map(|o| o.id) != organization.as_ref().map(|o| o.id);
            *current = organization;
            changed
        });
    }
}
