// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Claims};

// Senhas (bcrypt) e tokens de sessão (JWT). Não toca no banco: os gateways
// usam este serviço e cuidam da persistência.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
    // Hash de uma senha aleatória, usado quando o e-mail não existe
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(jwt_secret: String, token_ttl: Duration, bcrypt_cost: u32) -> Self {
        Self {
            jwt_secret,
            token_ttl,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    pub async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        let password_clone = password.to_owned();
        let password_hash_clone = password_hash.to_owned();

        // Executa a verificação em um thread separado
        let is_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        Ok(is_valid)
    }

    /// Verificação do login. Sem conta, a senha é conferida contra um hash
    /// descartável de mesmo custo e o resultado é sempre `false`: e-mail
    /// desconhecido e senha errada custam o mesmo tempo.
    pub async fn verify_login(
        &self,
        password: &str,
        password_hash: Option<&str>,
    ) -> Result<bool, AppError> {
        match password_hash {
            Some(password_hash) => self.verify_password(password, password_hash).await,
            None => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| async {
                        self.hash_password(&Uuid::new_v4().to_string()).await
                    })
                    .await?;
                self.verify_password(password, dummy).await?;
                Ok(false)
            }
        }
    }

    pub fn create_token(&self, organization_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: organization_id,
            jti: Uuid::new_v4(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// Token malformado, com assinatura errada ou expirado vira `InvalidToken`.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
    }
}
