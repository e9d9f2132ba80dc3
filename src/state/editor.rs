use indexmap::IndexMap;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::TeamEntity;

/// Error returned when a reorder targets a position outside the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reorder out of bounds: moving {from} to {to} in a table of {len} teams")]
pub struct ReorderOutOfBounds {
    /// Position the row was taken from.
    pub from: usize,
    /// Position the row was dropped at.
    pub to: usize,
    /// Number of teams in the table.
    pub len: usize,
}

/// In-memory ordered table of teams for one league tab.
///
/// The map order is the displayed order; the baseline records the id
/// sequence as last persisted. Dirtiness is a direct comparison of the two
/// sequences, so undoing an edit by hand returns the tab to a clean state.
#[derive(Debug, Clone, Default)]
pub struct PredictionEditor {
    teams: IndexMap<Uuid, TeamEntity>,
    baseline: Vec<Uuid>,
}

impl PredictionEditor {
    /// Build an editor from teams already in display order; the baseline is
    /// set to that order.
    pub fn from_teams(teams: Vec<TeamEntity>) -> Self {
        let teams: IndexMap<Uuid, TeamEntity> =
            teams.into_iter().map(|team| (team.id, team)).collect();
        let baseline = teams.keys().copied().collect();
        Self { teams, baseline }
    }

    /// Move the row at `from` so it ends up at position `to`.
    ///
    /// Returns the recomputed dirtiness. The team set is never altered, only
    /// positions change.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, ReorderOutOfBounds> {
        let len = self.teams.len();
        if from >= len || to >= len {
            return Err(ReorderOutOfBounds { from, to, len });
        }

        self.teams.move_index(from, to);
        Ok(self.is_dirty())
    }

    /// Team ids in the currently displayed order.
    pub fn ranking(&self) -> Vec<Uuid> {
        self.teams.keys().copied().collect()
    }

    /// Whether the displayed order differs from the last persisted one.
    pub fn is_dirty(&self) -> bool {
        !self.teams.keys().eq(self.baseline.iter())
    }

    /// Reset the baseline to the displayed order after a successful save.
    pub fn mark_saved(&mut self) {
        self.baseline = self.ranking();
    }

    /// Teams in displayed order.
    pub fn teams(&self) -> impl Iterator<Item = &TeamEntity> {
        self.teams.values()
    }

    /// Number of teams in the table.
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// True when no teams are loaded.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
