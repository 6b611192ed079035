use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, SignupRequest, TokenResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_dummy, verify_password},
        repo_types::User,
    },
    error::{AppError, AppResult, MessageBody},
    extract::AppJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<MessageBody>)> {
    let SignupRequest {
        username,
        email,
        password,
    } = payload;

    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(anyhow::Error::from)??;

    let user = User::create(&state.db, &username, &email, &hash)
        .await
        .map_err(|e| {
            if let Some(constraint) = unique_violation(&e) {
                warn!(%username, constraint, "signup conflict");
                return AppError::Conflict(conflict_message(constraint).into());
            }
            AppError::from(e)
        })?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        MessageBody::new("User created successfully"),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let LoginRequest { username, password } = payload;

    let found = User::find_by_username(&state.db, &username).await?;
    let verified = tokio::task::spawn_blocking(move || match found {
        Some(user) => verify_password(&password, &user.password_hash).map(|ok| ok.then_some(user)),
        None => {
            verify_dummy(&password);
            Ok(None)
        }
    })
    .await
    .map_err(anyhow::Error::from)??;

    let Some(user) = verified else {
        warn!(%username, "login rejected");
        return Err(AppError::invalid_credentials());
    };

    let access_token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(TokenResponse { access_token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, user_id).await?.ok_or_else(|| {
        warn!(user_id, "token refers to a missing user");
        AppError::Unauthorized("User not found".into())
    })?;

    Ok(Json(PublicUser {
        id: user.id,
        username: user.username,
        email: user.email,
    }))
}

/// Name of the unique constraint a failed insert tripped over, if that is
/// why it failed.
fn unique_violation(e: &sqlx::Error) -> Option<&str> {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Some(db.constraint().unwrap_or_default())
        }
        _ => None,
    }
}

fn conflict_message(constraint: &str) -> &'static str {
    if constraint.contains("username") {
        "Username already taken"
    } else if constraint.contains("email") {
        "Email already registered"
    } else {
        "Username or email already registered"
    }
}
