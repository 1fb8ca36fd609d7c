// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use sqlx::postgres::PgPoolOptions;

use crate::{
    common::i18n::I18nStore,
    gateway::{MemoryGateway, PgGateway, SharedGateway},
    services::{
        auth::AuthService, catalog::CatalogCache, dashboard_service::DashboardService,
        donation_service::DonationService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    // Sem banco: dados de demonstração em memória
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("STORE_BACKEND inválido: {other} (use postgres ou memory)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow!("{name} inválida ({raw}): {e}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend = parse_var("STORE_BACKEND", StoreBackend::Postgres)?;
        let database_url = env::var("DATABASE_URL").ok();
        if backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(anyhow!("DATABASE_URL deve ser definida"));
        }

        Ok(Self {
            backend,
            database_url,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", 168)?,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub gateway: SharedGateway,
    pub catalog: CatalogCache,
    pub donation_service: DonationService,
    pub dashboard_service: DashboardService,
    pub i18n_store: &'static I18nStore,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let auth_service = AuthService::new(
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.token_ttl_hours),
            config.bcrypt_cost,
        );

        let gateway: SharedGateway = match config.backend {
            StoreBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida")?;

                // Conecta ao banco de dados, usando '?' para propagar erros
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!().run(&db_pool).await?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(PgGateway::new(db_pool, auth_service))
            }
            StoreBackend::Memory => {
                let gateway = MemoryGateway::new(auth_service);
                gateway.seed_demo().await?;
                Arc::new(gateway)
            }
        };

        Ok(Self::with_gateway(gateway).await)
    }

    /// Monta o gráfico de dependências sobre um gateway qualquer. O cache do
    /// servidor fica sempre ativo; se a primeira leitura falhar, o erro fica
    /// registrado nele e a próxima mutação tenta de novo.
    pub async fn with_gateway(gateway: SharedGateway) -> Self {
        let catalog = CatalogCache::new(gateway.clone());
        if let Err(e) = catalog.load().await {
            tracing::warn!("Catálogo iniciado vazio: {}", e);
        }

        Self {
            donation_service: DonationService::new(gateway.clone(), catalog.clone()),
            dashboard_service: DashboardService::new(catalog.clone()),
            catalog,
            gateway,
            i18n_store: I18nStore::global(),
        }
    }
}
