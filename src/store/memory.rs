use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{JobStore, UserStore};
use crate::auth::repo_types::{PublicUser, User};
use crate::error::{AppError, AppResult};
use crate::jobs::repo_types::{Fields, Job, OwnerEmail};

/// Process-local store with the same guarantees as the PostgreSQL one:
/// unique emails, owners that must exist, insertion-ordered listings.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    jobs: Vec<Job>,
}

impl Inner {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, email: &str, password_hash: &str) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == email) {
            return Err(AppError::Conflict("email already registered".into()));
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.inner.read().await.user(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create(&self, owner: Uuid, fields: Fields) -> AppResult<Job> {
        let mut inner = self.inner.write().await;
        if inner.user(owner).is_none() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "job owner {owner} does not exist"
            )));
        }
        let now = OffsetDateTime::now_utc();
        let job = Job {
            id: Uuid::new_v4(),
            owner,
            fields,
            created_at: now,
            updated_at: now,
        };
        inner.jobs.push(job.clone());
        Ok(job)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job<PublicUser>>> {
        let inner = self.inner.read().await;
        let resolved = inner.jobs.iter().find(|j| j.id == id).and_then(|job| {
            let owner = inner.user(job.owner)?;
            Some(job.clone().with_owner(PublicUser::from(owner.clone())))
        });
        Ok(resolved)
    }

    async fn find_all(&self) -> AppResult<Vec<Job<OwnerEmail>>> {
        let inner = self.inner.read().await;
        let jobs = inner
            .jobs
            .iter()
            .filter_map(|job| {
                let owner = inner.user(job.owner)?;
                Some(job.clone().with_owner(OwnerEmail {
                    email: owner.email.clone(),
                }))
            })
            .collect();
        Ok(jobs)
    }

    async fn update_by_id(&self, id: Uuid, patch: Fields) -> AppResult<Option<Job>> {
        let mut inner = self.inner.write().await;
        let Some(job) = inner.jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        job.fields.extend(patch);
        job.updated_at = OffsetDateTime::now_utc();
        Ok(Some(job.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        let mut inner = self.inner.write().await;
        let removed = inner
            .jobs
            .iter()
            .position(|j| j.id == id)
            .map(|idx| inner.jobs.remove(idx));
        Ok(removed)
    }
}
