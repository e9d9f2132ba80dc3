use axum::{Json, Router, routing::get};

use crate::{
    dto::home::{GameMode, GameModesResponse},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/games",
    tag = "home",
    responses((status = 200, description = "Available game modes", body = GameModesResponse))
)]
/// List the game modes shown on the home screen.
pub async fn game_modes() -> Json<GameModesResponse> {
    Json(GameModesResponse {
        modes: vec![
            GameMode {
                title: "EFL 1 to 24s".into(),
                path: Some("/leagues/championship/table".into()),
                coming_soon: false,
            },
            GameMode {
                title: "Last Man Standing".into(),
                path: None,
                coming_soon: true,
            },
            GameMode {
                title: "Season Prediction".into(),
                path: None,
                coming_soon: true,
            },
            GameMode {
                title: "Snakes and Ladders".into(),
                path: None,
                coming_soon: true,
            },
        ],
    })
}

/// Configure the home routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/games", get(game_modes))
}
