use serde::Serialize;
use utoipa::ToSchema;

use crate::state::TabPhase;

/// Publicly visible phase of a league tab exposed to clients.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleTabPhase {
    /// The table is being fetched.
    Loading,
    /// The table matches the stored prediction.
    Clean,
    /// The table has unsaved edits.
    Dirty,
    /// A save is in flight.
    Saving,
    /// The deadline has passed; saving is permanently disabled.
    Locked,
}

impl From<&TabPhase> for VisibleTabPhase {
    fn from(value: &TabPhase) -> Self {
        match value {
            TabPhase::Loading => VisibleTabPhase::Loading,
            TabPhase::Loaded { dirty: false } => VisibleTabPhase::Clean,
            TabPhase::Loaded { dirty: true } => VisibleTabPhase::Dirty,
            TabPhase::Saving => VisibleTabPhase::Saving,
            TabPhase::Locked => VisibleTabPhase::Locked,
        }
    }
}
