//! DTO definitions for the per-league prediction editor.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::League,
    dto::{format_timestamp, phase::VisibleTabPhase},
    services::countdown::CountdownTick,
    state::LeagueTab,
};

/// Leagues offered by the game, in display order.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaguesResponse {
    /// League identifiers usable in `/leagues/{league}/...` paths.
    pub leagues: Vec<String>,
}

impl LeaguesResponse {
    /// List every league tab the game offers.
    pub fn all() -> Self {
        Self {
            leagues: League::ALL
                .iter()
                .map(|league| league.as_str().to_string())
                .collect(),
        }
    }
}

/// One row of the displayed league table.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamRow {
    /// Predicted finishing position, 1-based.
    pub position: u32,
    /// Team identifier.
    pub id: Uuid,
    /// Club name.
    pub name: String,
}

/// Snapshot of a league tab: its table, phase and deadline status.
#[derive(Debug, Serialize, ToSchema)]
pub struct TableResponse {
    /// League the tab shows.
    #[schema(value_type = String)]
    pub league: League,
    /// Season the table applies to.
    pub season: String,
    /// Lifecycle phase of the tab.
    pub phase: VisibleTabPhase,
    /// True while the order differs from the stored prediction.
    pub dirty: bool,
    /// True once the deadline has passed.
    pub locked: bool,
    /// Whole seconds left until the deadline.
    pub remaining_seconds: i64,
    /// Teams in predicted finishing order.
    pub table: Vec<TeamRow>,
}

impl TableResponse {
    /// Build a snapshot from the tab state and the latest countdown tick.
    pub fn new(
        league: League,
        season: String,
        tab: &LeagueTab,
        remaining_seconds: i64,
        locked: bool,
    ) -> Self {
        let phase = VisibleTabPhase::from(&tab.machine.phase());
        Self {
            league,
            season,
            phase,
            dirty: phase == VisibleTabPhase::Dirty,
            locked: locked || phase == VisibleTabPhase::Locked,
            remaining_seconds,
            table: tab
                .editor
                .teams()
                .enumerate()
                .map(|(index, team)| TeamRow {
                    position: index as u32 + 1,
                    id: team.id,
                    name: team.name.clone(),
                })
                .collect(),
        }
    }
}

/// Request to move one row of the table.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ReorderRequest {
    /// Position the row is taken from, 0-based.
    pub from: usize,
    /// Position the row is dropped at, 0-based.
    pub to: usize,
}

/// Confirmation of a persisted prediction.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveResponse {
    /// League the prediction covers.
    #[schema(value_type = String)]
    pub league: League,
    /// Season the prediction covers.
    pub season: String,
    /// Team ids in the persisted order.
    pub rankings: Vec<Uuid>,
    /// When the prediction was saved.
    pub saved_at: String,
}

impl SaveResponse {
    /// Build the confirmation payload for a completed save.
    pub fn new(
        league: League,
        season: String,
        rankings: Vec<Uuid>,
        saved_at: OffsetDateTime,
    ) -> Self {
        Self {
            league,
            season,
            rankings,
            saved_at: format_timestamp(saved_at),
        }
    }
}

/// Time remaining until the prediction deadline.
#[derive(Debug, Serialize, ToSchema)]
pub struct CountdownResponse {
    /// Whole seconds left, floored at zero.
    pub remaining_seconds: i64,
    /// True once the deadline has passed; saving is disabled for good.
    pub locked: bool,
    /// The deadline itself.
    pub deadline: String,
}

impl CountdownResponse {
    /// Build the payload from a countdown tick.
    pub fn new(tick: CountdownTick, deadline: OffsetDateTime) -> Self {
        Self {
            remaining_seconds: tick.remaining_seconds,
            locked: tick.locked,
            deadline: format_timestamp(deadline),
        }
    }
}
