//! DTO definitions for the home/menu route.

use serde::Serialize;
use utoipa::ToSchema;

/// One game mode tile shown on the home screen.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameMode {
    /// Display title of the mode.
    pub title: String,
    /// URL path of the mode, absent while it is not playable yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// True for modes that are announced but not yet available.
    pub coming_soon: bool,
}

/// The list of game modes offered by the application.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameModesResponse {
    /// Available and announced game modes.
    pub modes: Vec<GameMode>,
}
