use serde::Serialize;
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::PublicUser;

/// Free-form job attributes supplied by clients.
pub type Fields = serde_json::Map<String, Value>;

/// Keys the service owns; never taken from a request body.
pub const RESERVED_KEYS: [&str; 5] = ["id", "_id", "owner", "createdAt", "updatedAt"];

pub fn strip_reserved(mut fields: Fields) -> Fields {
    for key in RESERVED_KEYS {
        fields.remove(key);
    }
    fields
}

/// A job document. `O` is the owner reference: a raw user id, or the owner resolved
/// to some view of the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job<O = Uuid> {
    pub id: Uuid,
    pub owner: O,
    #[serde(flatten)]
    pub fields: Fields,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl<O> Job<O> {
    pub fn with_owner<P>(self, owner: P) -> Job<P> {
        Job {
            id: self.id,
            owner,
            fields: self.fields,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Owner as shown in job listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerEmail {
    pub email: String,
}

/// Anything that identifies the user owning a job.
pub trait OwnerRef {
    fn owner_id(&self) -> Uuid;
}

impl OwnerRef for Uuid {
    fn owner_id(&self) -> Uuid {
        *self
    }
}

impl OwnerRef for PublicUser {
    fn owner_id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub owner: Uuid,
    pub fields: Json<Fields>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<JobRow> for Job {
    fn from(r: JobRow) -> Self {
        Self {
            id: r.id,
            owner: r.owner,
            fields: r.fields.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct JobWithOwnerEmailRow {
    pub id: Uuid,
    pub fields: Json<Fields>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub owner_email: String,
}

impl From<JobWithOwnerEmailRow> for Job<OwnerEmail> {
    fn from(r: JobWithOwnerEmailRow) -> Self {
        Self {
            id: r.id,
            owner: OwnerEmail {
                email: r.owner_email,
            },
            fields: r.fields.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct JobWithOwnerRow {
    pub id: Uuid,
    pub owner: Uuid,
    pub fields: Json<Fields>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub owner_email: String,
    pub owner_created_at: OffsetDateTime,
    pub owner_updated_at: OffsetDateTime,
}

impl From<JobWithOwnerRow> for Job<PublicUser> {
    fn from(r: JobWithOwnerRow) -> Self {
        Self {
            id: r.id,
            owner: PublicUser {
                id: r.owner,
                email: r.owner_email,
                created_at: r.owner_created_at,
                updated_at: r.owner_updated_at,
            },
            fields: r.fields.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Fields {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn strips_service_owned_keys() {
        let cleaned = strip_reserved(fields(json!({
            "title": "x",
            "id": "forged",
            "_id": "forged",
            "owner": "someone-else",
            "createdAt": "1970-01-01T00:00:00Z",
            "updatedAt": "1970-01-01T00:00:00Z",
            "company": { "name": "acme" }
        })));
        assert_eq!(cleaned, fields(json!({ "title": "x", "company": { "name": "acme" } })));
    }

    #[test]
    fn job_serializes_fields_flat() {
        let owner = Uuid::new_v4();
        let job = Job {
            id: Uuid::new_v4(),
            owner,
            fields: fields(json!({ "title": "x", "salary": 10 })),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["owner"], owner.to_string());
        assert_eq!(json["title"], "x");
        assert_eq!(json["salary"], 10);
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert!(json.get("fields").is_none());

        let owner = OwnerEmail {
            email: "a@b.com".into(),
        };
        let listed = serde_json::to_value(job.with_owner(owner)).unwrap();
        assert_eq!(listed["owner"], json!({ "email": "a@b.com" }));
    }
}
