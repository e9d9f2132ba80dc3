use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::{get, post},
};
use axum_valid::Valid;
use futures::Stream;
use tracing::info;

use crate::{
    dao::models::League,
    dto::prediction::{
        CountdownResponse, LeaguesResponse, ReorderRequest, SaveResponse, TableResponse,
    },
    error::AppError,
    services::{countdown, prediction_service},
    state::SharedState,
};

/// Routes for the per-league prediction editor and the deadline countdown.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/leagues", get(list_leagues))
        .route("/leagues/{league}/table", get(get_table))
        .route("/leagues/{league}/reorder", post(reorder_table))
        .route("/leagues/{league}/save", post(save_prediction))
        .route("/countdown", get(get_countdown))
        .route("/countdown/stream", get(countdown_stream))
}

#[utoipa::path(
    get,
    path = "/leagues",
    tag = "prediction",
    responses((status = 200, description = "Leagues offered by the game", body = LeaguesResponse))
)]
/// List the league tabs, in display order.
pub async fn list_leagues() -> Json<LeaguesResponse> {
    Json(LeaguesResponse::all())
}

#[utoipa::path(
    get,
    path = "/leagues/{league}/table",
    tag = "prediction",
    params(("league" = String, Path, description = "League to load: championship, league_one or league_two")),
    responses(
        (status = 200, description = "Table loaded", body = TableResponse),
        (status = 401, description = "Not signed in")
    )
)]
/// Load a league tab, discarding any unsaved local edits.
pub async fn get_table(
    State(state): State<SharedState>,
    Path(league): Path<League>,
) -> Result<Json<TableResponse>, AppError> {
    let table = prediction_service::load_table(&state, league).await?;
    Ok(Json(table))
}

#[utoipa::path(
    post,
    path = "/leagues/{league}/reorder",
    tag = "prediction",
    params(("league" = String, Path, description = "League being edited")),
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Row moved", body = TableResponse),
        (status = 409, description = "Tab is not in an editable phase")
    )
)]
/// Move one row of the table and recompute dirtiness.
pub async fn reorder_table(
    State(state): State<SharedState>,
    Path(league): Path<League>,
    Valid(Json(payload)): Valid<Json<ReorderRequest>>,
) -> Result<Json<TableResponse>, AppError> {
    let table = prediction_service::reorder(&state, league, payload.from, payload.to)?;
    Ok(Json(table))
}

#[utoipa::path(
    post,
    path = "/leagues/{league}/save",
    tag = "prediction",
    params(("league" = String, Path, description = "League being saved")),
    responses(
        (status = 200, description = "Prediction saved", body = SaveResponse),
        (status = 423, description = "Deadline has passed; saves are rejected")
    )
)]
/// Persist the current order as the user's prediction for this league.
pub async fn save_prediction(
    State(state): State<SharedState>,
    Path(league): Path<League>,
) -> Result<Json<SaveResponse>, AppError> {
    let saved = prediction_service::save(&state, league).await?;
    Ok(Json(saved))
}

#[utoipa::path(
    get,
    path = "/countdown",
    tag = "prediction",
    responses((status = 200, description = "Time remaining until the deadline", body = CountdownResponse))
)]
/// Snapshot of the time remaining until the prediction deadline.
pub async fn get_countdown(State(state): State<SharedState>) -> Json<CountdownResponse> {
    let tick = state.countdown().snapshot();
    Json(CountdownResponse::new(tick, state.config().deadline))
}

#[utoipa::path(
    get,
    path = "/countdown/stream",
    tag = "prediction",
    responses((status = 200, description = "Countdown SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream countdown ticks to the frontend, one event per second.
pub async fn countdown_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    info!("new countdown SSE connection");
    countdown::sse_stream(&state)
}
