use axum::{Json, Router, extract::State, routing::{get, put}};
use axum_valid::Valid;

use crate::{
    dto::profile::{ChangePasswordRequest, ProfileResponse, UpdateProfileRequest},
    error::AppError,
    services::auth_service,
    state::SharedState,
};

/// Routes for the profile screen (display name and password).
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/password", put(change_password))
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "profile",
    responses(
        (status = 200, description = "Current profile", body = ProfileResponse),
        (status = 401, description = "Not signed in")
    )
)]
/// Return the signed-in user's live profile, revalidating the session first.
pub async fn get_profile(
    State(state): State<SharedState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = auth_service::current_user(&state).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/profile",
    tag = "profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Display name updated", body = ProfileResponse),
        (status = 401, description = "Not signed in")
    )
)]
/// Update the display name kept in the account metadata.
pub async fn update_profile(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<UpdateProfileRequest>>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = auth_service::update_display_name(&state, payload.display_name).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/profile/password",
    tag = "profile",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ProfileResponse),
        (status = 401, description = "Not signed in")
    )
)]
/// Replace the account password.
pub async fn change_password(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<ChangePasswordRequest>>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = auth_service::change_password(&state, payload.password).await?;
    Ok(Json(user.into()))
}
