// src/db/session_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;

// Tokens revogados pelo logout (os JWTs em si não guardam estado)
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn revoke(&self, token_id: Uuid, expires_at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO revoked_sessions (token_id, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (token_id) DO NOTHING
            "#,
        )
        .bind(token_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        // Limpeza oportunista: tokens expirados já são rejeitados pela validação do JWT
        sqlx::query("DELETE FROM revoked_sessions WHERE expires_at < now()")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn is_revoked(&self, token_id: Uuid) -> Result<bool, AppError> {
        let revoked: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM revoked_sessions WHERE token_id = $1)",
        )
        .bind(token_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(revoked)
    }
}
