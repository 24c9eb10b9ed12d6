use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::auth::repo_types::PublicUser;
use crate::error::AppResult;
use crate::jobs::repo_types::{
    Fields, Job, JobRow, JobWithOwnerEmailRow, JobWithOwnerRow, OwnerEmail,
};
use crate::store::{JobStore, PgStore};

#[async_trait]
impl JobStore for PgStore {
    async fn create(&self, owner: Uuid, fields: Fields) -> AppResult<Job> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (owner, fields)
            VALUES ($1, $2)
            RETURNING id, owner, fields, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(Json(fields))
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job<PublicUser>>> {
        let row = sqlx::query_as::<_, JobWithOwnerRow>(
            r#"
            SELECT j.id, j.owner, j.fields, j.created_at, j.updated_at,
                   u.email      AS owner_email,
                   u.created_at AS owner_created_at,
                   u.updated_at AS owner_updated_at
              FROM jobs j
              JOIN users u ON u.id = j.owner
             WHERE j.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> AppResult<Vec<Job<OwnerEmail>>> {
        let rows = sqlx::query_as::<_, JobWithOwnerEmailRow>(
            r#"
            SELECT j.id, j.fields, j.created_at, j.updated_at,
                   u.email AS owner_email
              FROM jobs j
              JOIN users u ON u.id = j.owner
             ORDER BY j.created_at ASC, j.id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_by_id(&self, id: Uuid, patch: Fields) -> AppResult<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs
               SET fields = fields || $2,
                   updated_at = now()
             WHERE id = $1
            RETURNING id, owner, fields, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(Json(patch))
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            DELETE FROM jobs
             WHERE id = $1
            RETURNING id, owner, fields, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sqlx::PgPool;

    use super::*;
    use crate::auth::repo_types::User;
    use crate::store::UserStore;

    fn fields(v: serde_json::Value) -> Fields {
        v.as_object().cloned().unwrap()
    }

    async fn seed_user(store: &PgStore, email: &str) -> User {
        UserStore::create(store, email, "hash").await.unwrap()
    }

    async fn add_job(store: &PgStore, owner: Uuid, v: serde_json::Value) -> Job {
        JobStore::create(store, owner, fields(v)).await.unwrap()
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn update_merges_top_level_keys(pool: PgPool) {
        let store = PgStore { db: pool };
        let user = seed_user(&store, "a@b.com").await;
        let job = add_job(&store, user.id, json!({ "title": "x", "remote": false })).await;

        let patch = fields(json!({ "remote": true, "salary": 10 }));
        let updated = store.update_by_id(job.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.owner, user.id);
        let merged = fields(json!({ "title": "x", "remote": true, "salary": 10 }));
        assert_eq!(updated.fields, merged);
        assert!(updated.updated_at >= job.updated_at);

        let missing = store.update_by_id(Uuid::new_v4(), Fields::new()).await.unwrap();
        assert!(missing.is_none());
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn lookups_resolve_the_owner(pool: PgPool) {
        let store = PgStore { db: pool };
        let user = seed_user(&store, "a@b.com").await;
        let first = add_job(&store, user.id, json!({ "title": "x" })).await;
        add_job(&store, user.id, json!({ "title": "y" })).await;

        let one = JobStore::find_by_id(&store, first.id).await.unwrap().unwrap();
        assert_eq!(one.owner.id, user.id);
        assert_eq!(one.owner.email, "a@b.com");
        assert_eq!(one.fields["title"], "x");

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].fields["title"], "x");
        assert_eq!(all[1].fields["title"], "y");
        assert!(all.iter().all(|job| job.owner.email == "a@b.com"));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn delete_returns_the_removed_job(pool: PgPool) {
        let store = PgStore { db: pool };
        let user = seed_user(&store, "a@b.com").await;
        let job = add_job(&store, user.id, json!({})).await;

        let deleted = store.delete_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, job.id);
        assert!(store.delete_by_id(job.id).await.unwrap().is_none());
        assert!(JobStore::find_by_id(&store, job.id).await.unwrap().is_none());
    }
}
