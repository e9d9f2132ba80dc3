use thiserror::Error;

/// Phases a league tab can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabPhase {
    /// Teams and any saved prediction are being fetched.
    Loading,
    /// A table is displayed; `dirty` is true while the order differs from
    /// the last persisted one.
    Loaded {
        /// Whether the current order has unsaved changes.
        dirty: bool,
    },
    /// The current order is being upserted to the remote service.
    Saving,
    /// The deadline has passed; saves are permanently rejected.
    Locked,
}

/// Events that can be applied to a league tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabEvent {
    /// A (re)load of the tab has begun, discarding any local edits.
    LoadStarted,
    /// The table finished loading; the baseline equals the displayed order.
    LoadFinished,
    /// The user moved a row; carries the recomputed dirtiness.
    Reordered {
        /// Whether the resulting order differs from the saved baseline.
        dirty: bool,
    },
    /// A save request was accepted and is in flight.
    SaveStarted,
    /// The upsert succeeded; the baseline now matches the displayed order.
    SaveSucceeded,
    /// The upsert failed; edits are kept so the user can retry.
    SaveFailed,
    /// The deadline passed; the save path shuts down for good.
    DeadlineReached,
}

/// Error returned when an event cannot be applied in the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the tab was in when the invalid event was received.
    pub from: TabPhase,
    /// The event that cannot be applied from this phase.
    pub event: TabEvent,
}

/// State machine tracking one league tab's editing lifecycle.
#[derive(Debug, Clone)]
pub struct TabStateMachine {
    phase: TabPhase,
}

impl Default for TabStateMachine {
    fn default() -> Self {
        Self {
            phase: TabPhase::Loading,
        }
    }
}

impl TabStateMachine {
    /// Create a machine starting in the loading phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> TabPhase {
        self.phase
    }

    /// Apply an event, returning the new phase.
    pub fn apply(&mut self, event: TabEvent) -> Result<TabPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            // Reloads are allowed from every settled phase, including after
            // the deadline so the final table stays viewable.
            (TabPhase::Loaded { .. } | TabPhase::Locked, TabEvent::LoadStarted) => {
                TabPhase::Loading
            }
            (TabPhase::Loading, TabEvent::LoadFinished) => TabPhase::Loaded { dirty: false },
            (TabPhase::Loaded { .. }, TabEvent::Reordered { dirty }) => TabPhase::Loaded { dirty },
            (TabPhase::Loaded { dirty: true }, TabEvent::SaveStarted) => TabPhase::Saving,
            (TabPhase::Saving, TabEvent::SaveSucceeded) => TabPhase::Loaded { dirty: false },
            (TabPhase::Saving, TabEvent::SaveFailed) => TabPhase::Loaded { dirty: true },
            (_, TabEvent::DeadlineReached) => TabPhase::Locked,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        self.phase = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(machine: &mut TabStateMachine) {
        machine.apply(TabEvent::LoadFinished).unwrap();
    }

    #[test]
    fn initial_phase_is_loading() {
        let machine = TabStateMachine::new();
        assert_eq!(machine.phase(), TabPhase::Loading);
    }

    #[test]
    fn full_happy_path_through_save() {
        let mut machine = TabStateMachine::new();

        assert_eq!(
            machine.apply(TabEvent::LoadFinished).unwrap(),
            TabPhase::Loaded { dirty: false }
        );
        assert_eq!(
            machine.apply(TabEvent::Reordered { dirty: true }).unwrap(),
            TabPhase::Loaded { dirty: true }
        );
        assert_eq!(
            machine.apply(TabEvent::SaveStarted).unwrap(),
            TabPhase::Saving
        );
        assert_eq!(
            machine.apply(TabEvent::SaveSucceeded).unwrap(),
            TabPhase::Loaded { dirty: false }
        );
    }

    #[test]
    fn failed_save_keeps_tab_dirty() {
        let mut machine = TabStateMachine::new();
        loaded(&mut machine);
        machine.apply(TabEvent::Reordered { dirty: true }).unwrap();
        machine.apply(TabEvent::SaveStarted).unwrap();

        assert_eq!(
            machine.apply(TabEvent::SaveFailed).unwrap(),
            TabPhase::Loaded { dirty: true }
        );
    }

    #[test]
    fn clean_tab_cannot_start_a_save() {
        let mut machine = TabStateMachine::new();
        loaded(&mut machine);

        let err = machine.apply(TabEvent::SaveStarted).unwrap_err();
        assert_eq!(err.from, TabPhase::Loaded { dirty: false });
        assert_eq!(err.event, TabEvent::SaveStarted);
    }

    #[test]
    fn undoing_a_reorder_clears_dirtiness() {
        let mut machine = TabStateMachine::new();
        loaded(&mut machine);
        machine.apply(TabEvent::Reordered { dirty: true }).unwrap();

        assert_eq!(
            machine.apply(TabEvent::Reordered { dirty: false }).unwrap(),
            TabPhase::Loaded { dirty: false }
        );
    }

    #[test]
    fn reload_discards_dirty_state() {
        let mut machine = TabStateMachine::new();
        loaded(&mut machine);
        machine.apply(TabEvent::Reordered { dirty: true }).unwrap();

        assert_eq!(
            machine.apply(TabEvent::LoadStarted).unwrap(),
            TabPhase::Loading
        );
        assert_eq!(
            machine.apply(TabEvent::LoadFinished).unwrap(),
            TabPhase::Loaded { dirty: false }
        );
    }

    #[test]
    fn deadline_locks_from_any_phase() {
        for prime in [true, false] {
            let mut machine = TabStateMachine::new();
            if prime {
                loaded(&mut machine);
            }
            assert_eq!(
                machine.apply(TabEvent::DeadlineReached).unwrap(),
                TabPhase::Locked
            );
        }
    }

    #[test]
    fn locked_tab_rejects_saving_but_allows_reload() {
        let mut machine = TabStateMachine::new();
        loaded(&mut machine);
        machine.apply(TabEvent::DeadlineReached).unwrap();

        let err = machine.apply(TabEvent::SaveStarted).unwrap_err();
        assert_eq!(err.from, TabPhase::Locked);

        assert_eq!(
            machine.apply(TabEvent::LoadStarted).unwrap(),
            TabPhase::Loading
        );
    }
}
