use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::{extractors::AuthUser, repo_types::PublicUser},
    error::{AppError, AppResult},
    jobs::repo_types::{strip_reserved, Fields, Job, OwnerEmail},
    middleware::{record_exists, validate_ownership, ApiJson, ValidId},
    state::AppState,
};

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/:id", get(get_job).put(update_job).delete(delete_job))
}

#[instrument(skip(state))]
pub async fn list_jobs(State(state): State<AppState>) -> AppResult<Json<Vec<Job<OwnerEmail>>>> {
    let jobs = state.jobs.find_all().await?;
    Ok(Json(jobs))
}

#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> AppResult<Json<Job<PublicUser>>> {
    let job = record_exists(state.jobs.find_by_id(id).await?, "job")?;
    Ok(Json(job))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<Fields>,
) -> AppResult<(StatusCode, Json<Job>)> {
    let job = state.jobs.create(user.id, strip_reserved(body)).await?;
    info!(job_id = %job.id, "job created");
    Ok((StatusCode::CREATED, Json(job)))
}

/// A malformed body is only reported once the job is known to exist and belong to the caller.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_job(
    State(state): State<AppState>,
    ValidId(id): ValidId,
    AuthUser(user): AuthUser,
    body: Result<ApiJson<Fields>, AppError>,
) -> AppResult<Json<Job>> {
    let job = record_exists(state.jobs.find_by_id(id).await?, "job")?;
    validate_ownership(job, &user)?;
    let ApiJson(body) = body?;

    // gone between the ownership check and the write
    let patch = strip_reserved(body);
    let updated = record_exists(state.jobs.update_by_id(id, patch).await?, "job")?;
    info!(job_id = %id, "job updated");
    Ok(Json(updated))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_job(
    State(state): State<AppState>,
    ValidId(id): ValidId,
    AuthUser(user): AuthUser,
) -> AppResult<StatusCode> {
    let job = record_exists(state.jobs.find_by_id(id).await?, "job")?;
    validate_ownership(job, &user)?;

    record_exists(state.jobs.delete_by_id(id).await?, "job")?;
    info!(job_id = %id, "job deleted");
    Ok(StatusCode::NO_CONTENT)
}
