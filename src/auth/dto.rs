use serde::{Deserialize, Serialize};

/// Request body for sign-up.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

/// Request body for sign-in.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Returned by sign-in (a fresh token) and sign-out (an empty one).
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
