// src/db/request_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::request::{NewResourceRequest, RequestStatus, ResourceRequest},
};

// Índice parcial: um pedido PENDING por (recurso, ONG solicitante)
fn map_duplicate_request(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::DuplicateRequest;
        }
    }
    e.into()
}

#[derive(Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<ResourceRequest>, AppError> {
        let requests = sqlx::query_as::<_, ResourceRequest>(
            "SELECT * FROM resource_requests ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn list_for_donor(&self, organization_id: Uuid) -> Result<Vec<ResourceRequest>, AppError> {
        let requests = sqlx::query_as::<_, ResourceRequest>(
            r#"
            SELECT * FROM resource_requests
            WHERE donating_organization_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Trava a linha até o fim da transação.
    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<ResourceRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, ResourceRequest>(
            "SELECT * FROM resource_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(request)
    }

    pub async fn has_pending<'e, E>(
        &self,
        executor: E,
        request: &NewResourceRequest,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM resource_requests
                WHERE resource_id = $1 AND resource_kind = $2
                  AND requesting_organization_id = $3 AND status = 'PENDING'
            )
            "#,
        )
        .bind(request.resource_id)
        .bind(request.resource_kind)
        .bind(request.requesting_organization_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        request: &NewResourceRequest,
    ) -> Result<ResourceRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, ResourceRequest>(
            r#"
            INSERT INTO resource_requests
                (resource_id, resource_kind, donating_organization_id, requesting_organization_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(request.resource_id)
        .bind(request.resource_kind)
        .bind(request.donating_organization_id)
        .bind(request.requesting_organization_id)
        .fetch_one(executor)
        .await
        .map_err(map_duplicate_request)?;
        Ok(created)
    }

    /// Só altera pedidos ainda PENDING; `None` caso contrário.
    pub async fn decide<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<Option<ResourceRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, ResourceRequest>(
            r#"
            UPDATE resource_requests SET status = $2
            WHERE id = $1 AND status = 'PENDING'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await?;
        Ok(updated)
    }
}
