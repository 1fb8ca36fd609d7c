// src/db/resource_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::resource::{
        Article, ArticleDraft, Medicine, MedicineDraft, Ration, RationDraft, Resource,
        ResourceDraft, ResourceKind,
    },
};

// As três coleções de recursos: 'medicines', 'rations' e 'articles'.
// O nome da tabela coincide com o `ResourceKind`.
#[derive(Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---

    pub async fn list_medicines(&self) -> Result<Vec<Medicine>, AppError> {
        let medicines =
            sqlx::query_as::<_, Medicine>("SELECT * FROM medicines ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(medicines)
    }

    pub async fn list_rations(&self) -> Result<Vec<Ration>, AppError> {
        let rations = sqlx::query_as::<_, Ration>("SELECT * FROM rations ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rations)
    }

    pub async fn list_articles(&self) -> Result<Vec<Article>, AppError> {
        let articles =
            sqlx::query_as::<_, Article>("SELECT * FROM articles ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(articles)
    }

    pub async fn find<'e, E>(
        &self,
        executor: E,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<Option<Resource>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resource = match kind {
            ResourceKind::Medicines => {
                sqlx::query_as::<_, Medicine>("SELECT * FROM medicines WHERE id = $1")
                    .bind(id)
                    .fetch_optional(executor)
                    .await?
                    .map(Resource::Medicine)
            }
            ResourceKind::Rations => {
                sqlx::query_as::<_, Ration>("SELECT * FROM rations WHERE id = $1")
                    .bind(id)
                    .fetch_optional(executor)
                    .await?
                    .map(Resource::Ration)
            }
            ResourceKind::Articles => {
                sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE id = $1")
                    .bind(id)
                    .fetch_optional(executor)
                    .await?
                    .map(Resource::Article)
            }
        };
        Ok(resource)
    }

    /// Como `find`, mas trava a linha até o fim da transação. Pedidos e a
    /// aprovação do mesmo recurso passam a esperar um pelo outro.
    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<Option<Resource>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resource = match kind {
            ResourceKind::Medicines => {
                sqlx::query_as::<_, Medicine>("SELECT * FROM medicines WHERE id = $1 FOR UPDATE")
                    .bind(id)
                    .fetch_optional(executor)
                    .await?
                    .map(Resource::Medicine)
            }
            ResourceKind::Rations => {
                sqlx::query_as::<_, Ration>("SELECT * FROM rations WHERE id = $1 FOR UPDATE")
                    .bind(id)
                    .fetch_optional(executor)
                    .await?
                    .map(Resource::Ration)
            }
            ResourceKind::Articles => {
                sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE id = $1 FOR UPDATE")
                    .bind(id)
                    .fetch_optional(executor)
                    .await?
                    .map(Resource::Article)
            }
        };
        Ok(resource)
    }

    // ---
    // Funções de "Escrita"
    // ---

    /// Insere o recurso como AVAILABLE (default da coluna).
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        draft: &ResourceDraft,
    ) -> Result<Resource, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resource = match draft {
            ResourceDraft::Medicine(d) => Resource::Medicine(
                sqlx::query_as::<_, Medicine>(
                    r#"
                    INSERT INTO medicines
                        (organization_id, photo_base64, name, active_ingredient, quantity, expiration_date, notes)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING *
                    "#,
                )
                .bind(organization_id)
                .bind(&d.photo_base64)
                .bind(&d.name)
                .bind(&d.active_ingredient)
                .bind(&d.quantity)
                .bind(d.expiration_date)
                .bind(&d.notes)
                .fetch_one(executor)
                .await?,
            ),
            ResourceDraft::Ration(d) => Resource::Ration(
                sqlx::query_as::<_, Ration>(
                    r#"
                    INSERT INTO rations
                        (organization_id, photo_base64, brand, quantity_kg, expiration_date, notes)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING *
                    "#,
                )
                .bind(organization_id)
                .bind(&d.photo_base64)
                .bind(&d.brand)
                .bind(d.quantity_kg)
                .bind(d.expiration_date)
                .bind(&d.notes)
                .fetch_one(executor)
                .await?,
            ),
            ResourceDraft::Article(d) => Resource::Article(
                sqlx::query_as::<_, Article>(
                    r#"
                    INSERT INTO articles
                        (organization_id, photo_base64, name, category, quantity, condition, size_specification, notes)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    RETURNING *
                    "#,
                )
                .bind(organization_id)
                .bind(&d.photo_base64)
                .bind(&d.name)
                .bind(d.category)
                .bind(d.quantity)
                .bind(d.condition)
                .bind(&d.size_specification)
                .bind(&d.notes)
                .fetch_one(executor)
                .await?,
            ),
        };
        Ok(resource)
    }

    /// Atualiza os campos editáveis; status, dono e data de criação ficam intactos.
    /// `None` quando o id não existe na coleção.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        draft: &ResourceDraft,
    ) -> Result<Option<Resource>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resource = match draft {
            ResourceDraft::Medicine(d) => self
                .update_medicine(executor, id, d)
                .await?
                .map(Resource::Medicine),
            ResourceDraft::Ration(d) => self
                .update_ration(executor, id, d)
                .await?
                .map(Resource::Ration),
            ResourceDraft::Article(d) => self
                .update_article(executor, id, d)
                .await?
                .map(Resource::Article),
        };
        Ok(resource)
    }

    async fn update_medicine<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        d: &MedicineDraft,
    ) -> Result<Option<Medicine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let medicine = sqlx::query_as::<_, Medicine>(
            r#"
            UPDATE medicines SET
                photo_base64 = $2, name = $3, active_ingredient = $4,
                quantity = $5, expiration_date = $6, notes = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&d.photo_base64)
        .bind(&d.name)
        .bind(&d.active_ingredient)
        .bind(&d.quantity)
        .bind(d.expiration_date)
        .bind(&d.notes)
        .fetch_optional(executor)
        .await?;
        Ok(medicine)
    }

    async fn update_ration<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        d: &RationDraft,
    ) -> Result<Option<Ration>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ration = sqlx::query_as::<_, Ration>(
            r#"
            UPDATE rations SET
                photo_base64 = $2, brand = $3, quantity_kg = $4,
                expiration_date = $5, notes = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&d.photo_base64)
        .bind(&d.brand)
        .bind(d.quantity_kg)
        .bind(d.expiration_date)
        .bind(&d.notes)
        .fetch_optional(executor)
        .await?;
        Ok(ration)
    }

    async fn update_article<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        d: &ArticleDraft,
    ) -> Result<Option<Article>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles SET
                photo_base64 = $2, name = $3, category = $4, quantity = $5,
                condition = $6, size_specification = $7, notes = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&d.photo_base64)
        .bind(&d.name)
        .bind(d.category)
        .bind(d.quantity)
        .bind(d.condition)
        .bind(&d.size_specification)
        .bind(&d.notes)
        .fetch_optional(executor)
        .await?;
        Ok(article)
    }

    /// AVAILABLE -> DONATED. Devolve `false` se o recurso não estava disponível
    /// (ou não existe); quem chama decide qual erro é.
    pub async fn mark_donated<'e, E>(
        &self,
        executor: E,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // kind.as_str() é um nome de tabela fixo, nunca entrada do usuário
        let sql = format!(
            "UPDATE {} SET status = 'DONATED' WHERE id = $1 AND status = 'AVAILABLE'",
            kind.as_str()
        );
        let result = sqlx::query(&sql).bind(id).execute(executor).await?;
        Ok(result.rows_affected() == 1)
    }
}
