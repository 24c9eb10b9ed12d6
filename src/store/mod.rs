//! Record store: one trait per collection, a PostgreSQL backend and an in-memory backend.
//!
//! The PostgreSQL queries live next to the feature they serve (`auth::repo`, `jobs::repo`).

mod memory;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::auth::repo_types::{PublicUser, User};
use crate::error::AppResult;
use crate::jobs::repo_types::{Fields, Job, OwnerEmail};

pub use memory::MemoryStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `AppError::Conflict` when the email is already taken.
    async fn create(&self, email: &str, password_hash: &str) -> AppResult<User>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create(&self, owner: Uuid, fields: Fields) -> AppResult<Job>;
    /// Owner resolved to the full public user.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job<PublicUser>>>;
    /// Owner resolved to its email only.
    async fn find_all(&self) -> AppResult<Vec<Job<OwnerEmail>>>;
    /// Merges the top-level keys of `patch` into the stored fields.
    async fn update_by_id(&self, id: Uuid, patch: Fields) -> AppResult<Option<Job>>;
    async fn delete_by_id(&self, id: Uuid) -> AppResult<Option<Job>>;
}

#[derive(Clone)]
pub struct PgStore {
    pub(crate) db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        tracing::info!("database migrations applied");
        Ok(())
    }
}
