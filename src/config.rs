// src/config.rs

use std::{env, fmt::Display, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{seed, DynStore, MemoryStore, PgStore},
    services::{
        auth::AuthService, cart_service::CartService, catalog_service::CatalogService,
        purchase_service::PurchaseService, settings_service::SettingsService,
        user_service::UserService,
    },
};

// Credenciais do admin inicial (só quando SEED_ADMIN_PASSWORD existe)
#[derive(Clone)]
pub struct SeedAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct Config {
    // Sem URL: store em memória
    pub database_url: Option<String>,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub bind_addr: String,
    pub bcrypt_cost: u32,
    pub db_max_connections: u32,
    pub seed_demo_data: bool,
    pub seed_admin: Option<SeedAdmin>,
    pub cors_origin: Option<String>,
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match get(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Valor inválido para {key}: {e}")),
        None => Ok(default),
    }
}

impl Config {
    /// Lê o `.env` (se existir) e as variáveis de ambiente.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let session_secret = get("SESSION_SECRET")
            .filter(|s| !s.is_empty())
            .context("SESSION_SECRET deve ser definido")?;

        let seed_admin = get("SEED_ADMIN_PASSWORD")
            .filter(|p| !p.is_empty())
            .map(|password| SeedAdmin {
                username: get("SEED_ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
                email: get("SEED_ADMIN_EMAIL").unwrap_or_else(|| "admin@sweetbite.com".to_string()),
                password,
            });

        let session_ttl_hours: i64 = parse_or(&get, "SESSION_TTL_HOURS", 168)?;
        if session_ttl_hours <= 0 {
            anyhow::bail!("SESSION_TTL_HOURS deve ser positivo");
        }

        Ok(Self {
            database_url: get("DATABASE_URL").filter(|u| !u.is_empty()),
            session_secret,
            session_ttl_hours,
            cookie_secure: parse_or(&get, "COOKIE_SECURE", false)?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            bcrypt_cost: parse_or(&get, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 5)?,
            seed_demo_data: parse_or(&get, "SEED_DEMO_DATA", true)?,
            seed_admin,
            cors_origin: get("CORS_ORIGIN").filter(|o| !o.is_empty()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: DynStore,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub cart_service: CartService,
    pub user_service: UserService,
    pub purchase_service: PurchaseService,
    pub settings_service: SettingsService,
}

impl AppState {
    /// Conecta (ou cai para memória), roda migrações e seeds.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store: DynStore = match &config.database_url {
            Some(database_url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;
                tracing::info!("Conexão com o banco de dados estabelecida");

                sqlx::migrate!()
                    .run(&pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("Migrações executadas");

                Arc::new(PgStore::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL não definida: usando store em memória (dados não persistem)");
                Arc::new(MemoryStore::new())
            }
        };

        let state = Self::with_store(store, config);
        state.seed().await?;
        Ok(state)
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_store(store: DynStore, config: Config) -> Self {
        let auth_service = AuthService::new(
            store.clone(),
            config.session_secret.clone(),
            config.session_ttl_hours,
            config.bcrypt_cost,
        );
        let settings_service = SettingsService::new(store.clone());

        Self {
            catalog_service: CatalogService::new(store.clone()),
            cart_service: CartService::new(store.clone(), settings_service.clone()),
            user_service: UserService::new(store.clone(), auth_service.clone()),
            purchase_service: PurchaseService::new(store.clone()),
            settings_service,
            auth_service,
            store,
            config: Arc::new(config),
        }
    }

    async fn seed(&self) -> anyhow::Result<()> {
        if self.config.seed_demo_data {
            seed::seed_demo_catalog(self.store.as_ref()).await?;
        }

        if let Some(admin) = &self.config.seed_admin {
            let password_hash = self.auth_service.hash_password(&admin.password).await?;
            seed::seed_admin(self.store.as_ref(), &admin.username, &admin.email, password_hash).await?;
        }
        Ok(())
    }
}
