use crate::auth::services::JwtKeys;
use crate::config::{AppConfig, StoreBackend};
use crate::store::{JobStore, MemoryStore, PgStore, UserStore};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub jobs: Arc<dyn JobStore>,
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        match config.store {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres store")?;
                let store = PgStore::connect(url, config.max_connections).await?;
                store.migrate().await?;
                let store = Arc::new(store);
                Ok(Self::from_parts(store.clone(), store, config))
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data will not survive a restart");
                Ok(Self::in_memory(config))
            }
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(store.clone(), store, config)
    }

    pub fn from_parts(
        users: Arc<dyn UserStore>,
        jobs: Arc<dyn JobStore>,
        config: AppConfig,
    ) -> Self {
        let keys = JwtKeys::new(&config.jwt);
        Self {
            users,
            jobs,
            config: Arc::new(config),
            keys,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::in_memory(AppConfig {
            store: StoreBackend::Memory,
            database_url: None,
            max_connections: 1,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
            },
            host: "127.0.0.1".into(),
            port: 0,
        })
    }
}
