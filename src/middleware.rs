//! Request checks that run ahead of the handlers.
//!
//! Extractors run in argument order, so handlers list `ValidId` before `AuthUser`
//! and the body last: a bad id is a 400 before a missing token is a 401.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path},
    http::request::Parts,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::error::{AppError, AppResult};
use crate::jobs::repo_types::{Job, OwnerRef};

/// `Json<T>` whose rejections go through [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path `:id` that parsed as a record identifier.
#[derive(Debug, Clone, Copy)]
pub struct ValidId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        Uuid::parse_str(&raw).map(ValidId).map_err(|_| {
            debug!(id = %raw, "malformed id");
            AppError::Validation(format!("invalid id: {raw}"))
        })
    }
}

/// Turns an absent lookup result into a 404.
pub fn record_exists<T>(record: Option<T>, kind: &str) -> AppResult<T> {
    record.ok_or_else(|| AppError::NotFound(format!("{kind} not found")))
}

/// Lets the job through only when `requester` owns it.
pub fn validate_ownership<O: OwnerRef>(job: Job<O>, requester: &User) -> AppResult<Job<O>> {
    let owner_id = job.owner.owner_id();
    if owner_id != requester.id {
        warn!(job_id = %job.id, %owner_id, requester_id = %requester.id, "ownership check failed");
        return Err(AppError::Ownership(
            "you are not allowed to modify this job".into(),
        ));
    }
    Ok(job)
}
