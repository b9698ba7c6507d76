//! Authentication route handlers: registration, login, logout, status.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::{OptionalAuth, auth::clear_session, auth::set_current_user};
use crate::models::user::SessionUser;
use crate::services::{AuthService, auth::RegisterInput};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/join", post(join))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
        .route("/auth/status", get(status))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRequest {
    email: String,
    name: String,
    password: String,
    #[serde(default)]
    address: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct UserResponse {
    success: bool,
    message: String,
    user: SessionUser,
}

#[derive(Debug, Serialize)]
struct AckResponse {
    success: bool,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    success: bool,
    is_authenticated: bool,
    user: Option<SessionUser>,
}

/// Register a new user and log them in.
///
/// POST /auth/join
async fn join(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<JoinRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AuthService::new(state.pool())
        .register(RegisterInput {
            email: &body.email,
            name: &body.name,
            password: &body.password,
            address: &body.address,
        })
        .await?;

    let session_user = SessionUser::from(&user);
    set_current_user(&session, &session_user)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            message: "registration complete".to_string(),
            user: session_user,
        }),
    ))
}

/// Login with email and password.
///
/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    // Rotate the session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let session_user = SessionUser::from(&user);
    set_current_user(&session, &session_user)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(UserResponse {
        success: true,
        message: "login successful".to_string(),
        user: session_user,
    }))
}

/// Logout, destroying the session.
///
/// GET /auth/logout
async fn logout(session: Session) -> Result<Json<AckResponse>, AppError> {
    clear_session(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(AckResponse {
        success: true,
        message: "logged out".to_string(),
    }))
}

/// Report whether the caller is logged in, and as whom.
///
/// GET /auth/status
async fn status(OptionalAuth(user): OptionalAuth) -> Json<StatusResponse> {
    Json(StatusResponse {
        success: true,
        is_authenticated: user.is_some(),
        user,
    })
}
