use axum::{Json, Router, extract::State, routing::{get, post}};
use axum_valid::Valid;

use crate::{
    dto::auth::{
        CredentialsRequest, PasswordResetRequest, RestoreResponse, SessionResponse, SignUpResponse,
    },
    error::AppError,
    services::auth_service,
    state::SharedState,
};

/// Routes handling sign-in, sign-up and session restoration.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/logout", post(logout))
        .route("/auth/password-reset", post(password_reset))
        .route("/auth/session", get(restore_session))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Credentials rejected")
    )
)]
/// Exchange credentials for a persisted session.
pub async fn login(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CredentialsRequest>>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = auth_service::sign_in(&state, payload.email, payload.password).await?;
    Ok(Json(SessionResponse::from(&session)))
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Account created", body = SignUpResponse),
        (status = 401, description = "Email already in use")
    )
)]
/// Register a new account; the session is persisted when granted immediately.
pub async fn signup(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CredentialsRequest>>,
) -> Result<Json<SignUpResponse>, AppError> {
    let outcome = auth_service::sign_up(&state, payload.email, payload.password).await?;
    Ok(Json(SignUpResponse::from(&outcome)))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses((status = 204, description = "Signed out"))
)]
/// Best-effort remote sign-out followed by unconditional local clearing.
pub async fn logout(State(state): State<SharedState>) -> axum::http::StatusCode {
    auth_service::sign_out(&state).await;
    axum::http::StatusCode::NO_CONTENT
}

#[utoipa::path(
    post,
    path = "/auth/password-reset",
    tag = "auth",
    request_body = PasswordResetRequest,
    responses((status = 204, description = "Reset email requested"))
)]
/// Ask the remote service to send a password-reset email.
pub async fn password_reset(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<PasswordResetRequest>>,
) -> Result<axum::http::StatusCode, AppError> {
    auth_service::reset_password(&state, payload.email).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "auth",
    responses((status = 200, description = "Restore outcome", body = RestoreResponse))
)]
/// Attempt a silent login from the persisted session.
pub async fn restore_session(State(state): State<SharedState>) -> Json<RestoreResponse> {
    let user_id = auth_service::try_auto_login(&state).await;
    Json(RestoreResponse { user_id })
}
