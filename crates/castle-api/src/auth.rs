use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{info, warn};
use uuid::Uuid;

use castle_db::Database;
use castle_types::api::{AuthResponse, Claims, LoginRequest, RegisterRequest};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        warn!("Registration attempt with missing username or password");
        return Err(ApiError::MissingCredentials);
    }

    if state.db.get_user_by_username(&req.username)?.is_some() {
        warn!("Registration attempt for existing user: {}", req.username);
        return Err(ApiError::UserAlreadyExists);
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = Uuid::new_v4();

    state
        .db
        .create_user(&user_id.to_string(), &req.username, &password_hash, &req.email)?;

    let token = create_token(&state.jwt_secret, user_id, &req.username)?;

    info!("Successful registration for user: {}", req.username);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user_id,
            username: req.username,
            email: req.email,
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        warn!("Login attempt with missing username or password");
        return Err(ApiError::MissingCredentials);
    }

    // Exact, case-sensitive lookup. The distinction between an unknown user
    // and a wrong password is part of the public contract.
    let user = state.db.get_user_by_username(&req.username)?.ok_or_else(|| {
        warn!("Login attempt for unknown user: {}", req.username);
        ApiError::UserNotFound
    })?;

    if !verify_password(&req.password, &user.password)? {
        warn!("Failed login attempt for user: {}", req.username);
        return Err(ApiError::IncorrectPassword);
    }

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| anyhow::anyhow!("Corrupt user id '{}': {}", user.id, e))?;

    let token = create_token(&state.jwt_secret, user_id, &user.username)?;

    info!("Successful login for user: {}", user.username);

    Ok(Json(AuthResponse {
        id: user_id,
        username: user.username,
        email: user.email,
        token,
    }))
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

/// Ok(false) is a wrong password; Err is a malformed stored hash, which is
/// a server-side defect rather than a client mistake.
fn verify_password(password: &str, stored_hash: &str) -> anyhow::Result<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Corrupt password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn create_token(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
