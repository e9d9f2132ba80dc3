use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for EFL Predict Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::home::game_modes,
        crate::routes::auth::login,
        crate::routes::auth::signup,
        crate::routes::auth::logout,
        crate::routes::auth::password_reset,
        crate::routes::auth::restore_session,
        crate::routes::profile::get_profile,
        crate::routes::profile::update_profile,
        crate::routes::profile::change_password,
        crate::routes::prediction::list_leagues,
        crate::routes::prediction::get_table,
        crate::routes::prediction::reorder_table,
        crate::routes::prediction::save_prediction,
        crate::routes::prediction::get_countdown,
        crate::routes::prediction::countdown_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::home::GameMode,
            crate::dto::home::GameModesResponse,
            crate::dto::auth::CredentialsRequest,
            crate::dto::auth::PasswordResetRequest,
            crate::dto::auth::SessionResponse,
            crate::dto::auth::SignUpResponse,
            crate::dto::auth::RestoreResponse,
            crate::dto::profile::ProfileResponse,
            crate::dto::profile::UpdateProfileRequest,
            crate::dto::profile::ChangePasswordRequest,
            crate::dto::phase::VisibleTabPhase,
            crate::dto::prediction::LeaguesResponse,
            crate::dto::prediction::TeamRow,
            crate::dto::prediction::TableResponse,
            crate::dto::prediction::ReorderRequest,
            crate::dto::prediction::SaveResponse,
            crate::dto::prediction::CountdownResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "home", description = "Game mode listing"),
        (name = "auth", description = "Sign in, sign up and session restore"),
        (name = "profile", description = "Profile and password management"),
        (name = "prediction", description = "Per-league prediction editor"),
    )
)]
pub struct ApiDoc;
