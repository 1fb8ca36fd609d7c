// src/db/organization_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::organization::{Account, NewOrganization, Organization},
};

// Violação de unicidade (e-mail) vira um erro amigável
fn map_unique_email(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::EmailAlreadyExists;
        }
    }
    e.into()
}

// Tabelas 'accounts' (credenciais) e 'organizations' (as ONGs)
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, AppError> {
        let organization =
            sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(organization)
    }

    pub async fn find_by_owner_account(
        &self,
        account_id: Uuid,
    ) -> Result<Option<Organization>, AppError> {
        let organization = sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations WHERE owner_account_id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(organization)
    }

    pub async fn list_all(&self) -> Result<Vec<Organization>, AppError> {
        let organizations = sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(organizations)
    }

    // ---
    // Funções de "Escrita" (Transacionais)
    // ---

    pub async fn create_account<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (email, password_hash) VALUES ($1, $2) RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(map_unique_email)
    }

    /// A ONG sempre nasce PENDING (default da coluna).
    pub async fn create_organization<'e, E>(
        &self,
        executor: E,
        profile: &NewOrganization,
        owner_account_id: Uuid,
    ) -> Result<Organization, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations
                (name, registration_number, city, state, contact_email, contact_phone, owner_account_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.registration_number)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.contact_email)
        .bind(&profile.contact_phone)
        .bind(owner_account_id)
        .fetch_one(executor)
        .await
        .map_err(map_unique_email)
    }
}
