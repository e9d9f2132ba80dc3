//! The reorder-and-persist workflow behind the per-league prediction editor.

use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    dao::models::{League, PredictionEntity, TeamEntity},
    dto::prediction::{SaveResponse, TableResponse},
    error::ServiceError,
    services::auth_service,
    state::{LeagueTab, PredictionEditor, SharedState, TabEvent, TabPhase},
};

/// Load the table for a league tab, discarding any local edits.
///
/// When a saved prediction exists its order wins; teams it references that
/// no longer exist are dropped from the rebuilt order. Without a prediction
/// the league's default `sort_order` applies. The dirty baseline is reset to
/// the freshly loaded order.
pub async fn load_table(
    state: &SharedState,
    league: League,
) -> Result<TableResponse, ServiceError> {
    let session = auth_service::ensure_session(state).await?;
    let season = state.config().season.clone();
    let remote = state.remote();

    {
        let mut tab = state.tab_mut(league);
        if !matches!(tab.machine.phase(), TabPhase::Loading) {
            tab.machine.apply(TabEvent::LoadStarted)?;
        }
    }

    let saved = auth_service::session_checked(
        state,
        remote
            .find_prediction(
                session.access_token.clone(),
                session.user_id,
                league,
                season.clone(),
            )
            .await,
    )
    .await?;

    let teams: Vec<TeamEntity> = match saved {
        Some(prediction) if !prediction.rankings.is_empty() => {
            let mut teams = Vec::with_capacity(prediction.rankings.len());
            for team_id in prediction.rankings {
                let found = remote.find_team(session.access_token.clone(), team_id).await;
                match auth_service::session_checked(state, found).await? {
                    Some(team) => teams.push(team),
                    // A team referenced by the saved prediction has since
                    // been deleted; it silently disappears from the order.
                    None => warn!(%team_id, %league, "saved prediction references a missing team; dropping it"),
                }
            }
            teams
        }
        _ => {
            let listed = remote
                .list_teams(session.access_token.clone(), league, season)
                .await;
            auth_service::session_checked(state, listed).await?
        }
    };

    let mut tab = state.tab_mut(league);
    tab.editor = PredictionEditor::from_teams(teams);
    tab.machine.apply(TabEvent::LoadFinished)?;
    Ok(snapshot(state, league, &tab))
}

/// Move a row of the league table, recomputing dirtiness.
pub fn reorder(
    state: &SharedState,
    league: League,
    from: usize,
    to: usize,
) -> Result<TableResponse, ServiceError> {
    let mut tab = state.tab_mut(league);
    if !matches!(tab.machine.phase(), TabPhase::Loaded { .. }) {
        return Err(ServiceError::InvalidState(format!(
            "cannot reorder while the {league} tab is in {:?}",
            tab.machine.phase()
        )));
    }

    let dirty = tab.editor.reorder(from, to)?;
    tab.machine.apply(TabEvent::Reordered { dirty })?;
    Ok(snapshot(state, league, &tab))
}

/// Persist the current order as the user's prediction.
///
/// Rejected outright at or after the deadline, before any session refresh or
/// persistence call is made. A successful save resets the dirty baseline; a
/// failed one leaves the tab dirty so the user can retry.
pub async fn save(state: &SharedState, league: League) -> Result<SaveResponse, ServiceError> {
    if OffsetDateTime::now_utc() >= state.config().deadline {
        let mut tab = state.tab_mut(league);
        let _ = tab.machine.apply(TabEvent::DeadlineReached);
        return Err(ServiceError::Locked);
    }

    // Defensive refresh so the upsert never rides an expired token.
    let session = auth_service::ensure_session(state).await?;

    let rankings = {
        let mut tab = state.tab_mut(league);
        match tab.machine.phase() {
            TabPhase::Loaded { dirty: true } => {}
            TabPhase::Loaded { dirty: false } => {
                return Err(ServiceError::InvalidState(
                    "nothing to save: the order matches the stored prediction".into(),
                ));
            }
            other => {
                return Err(ServiceError::InvalidState(format!(
                    "cannot save while the {league} tab is in {other:?}"
                )));
            }
        }
        tab.machine.apply(TabEvent::SaveStarted)?;
        tab.editor.ranking()
    };

    let updated_at = OffsetDateTime::now_utc();
    let prediction = PredictionEntity {
        user_id: session.user_id,
        league,
        season: state.config().season.clone(),
        rankings: rankings.clone(),
        updated_at,
    };

    let upserted = state
        .remote()
        .upsert_prediction(session.access_token, prediction)
        .await;
    match auth_service::session_checked(state, upserted).await {
        Ok(()) => {
            let mut tab = state.tab_mut(league);
            tab.editor.mark_saved();
            tab.machine.apply(TabEvent::SaveSucceeded)?;
            info!(%league, teams = rankings.len(), "prediction saved");
            Ok(SaveResponse::new(
                league,
                state.config().season.clone(),
                rankings,
                updated_at,
            ))
        }
        Err(err) => {
            let mut tab = state.tab_mut(league);
            let _ = tab.machine.apply(TabEvent::SaveFailed);
            Err(err)
        }
    }
}

/// Current snapshot of a league tab without touching the remote service.
pub fn table_snapshot(state: &SharedState, league: League) -> TableResponse {
    let tab = state.tab_mut(league);
    snapshot(state, league, &tab)
}

fn snapshot(state: &SharedState, league: League, tab: &LeagueTab) -> TableResponse {
    let tick = state.countdown().snapshot();
    TableResponse::new(
        league,
        state.config().season.clone(),
        tab,
        tick.remaining_seconds,
        tick.locked,
    )
}
