use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{SigninRequest, SignupRequest, TokenResponse},
        password::{hash_in_background, verify_dummy_in_background, verify_in_background},
        repo_types::PublicUser,
        services::{is_valid_email, normalize_email},
    },
    error::{AppError, AppResult},
    middleware::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/signout", post(signout))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("invalid email".into()));
    }

    let hash = hash_in_background(payload.password).await?;

    let user = state.users.create(&email, &hash).await.map_err(|e| {
        if matches!(e, AppError::Conflict(_)) {
            warn!(email = %email, "email already registered");
        }
        e
    })?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SigninRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = normalize_email(&payload.email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "signin unknown email");
        verify_dummy_in_background(payload.password).await?;
        return Err(AppError::invalid_credentials());
    };

    if !verify_in_background(payload.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "signin invalid password");
        return Err(AppError::invalid_credentials());
    }

    let token = state.keys.sign(user.id)?;

    info!(user_id = %user.id, "user signed in");
    Ok(Json(TokenResponse { token }))
}

/// Tokens are stateless, so there is nothing to revoke server-side.
#[instrument]
pub async fn signout() -> Json<TokenResponse> {
    Json(TokenResponse {
        token: String::new(),
    })
}
