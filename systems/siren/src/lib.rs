#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Siren system that raises an alarm while the cop has a clear line of sight
//! to the robber during the robber's turn.

use cop_and_robber_core::{CellCoord, Event, Role};
use tracing::debug;

/// Transition of the siren.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SirenSignal {
    /// The siren should start playing.
    Started,
    /// The siren should stop playing.
    Stopped,
}

/// Pure system tracking whether the siren is sounding.
#[derive(Clone, Copy, Debug, Default)]
pub struct Siren {
    active: bool,
}

impl Siren {
    /// Creates a silent siren.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: false }
    }

    /// Whether the siren is sounding.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Re-evaluates the siren after positions or the active role changed.
    ///
    /// Returns a signal only when the siren state flips.
    pub fn handle<F>(
        &mut self,
        active_role: Role,
        cop: CellCoord,
        robber: CellCoord,
        has_line_of_sight: F,
    ) -> Option<SirenSignal>
    where
        F: Fn(CellCoord, CellCoord) -> bool,
    {
        let aligned = cop.column() == robber.column() || cop.row() == robber.row();
        let should_sound = active_role == Role::Robber && aligned && has_line_of_sight(cop, robber);

        match (self.active, should_sound) {
            (false, true) => {
                self.active = true;
                debug!("siren started");
                Some(SirenSignal::Started)
            }
            (true, false) => {
                self.active = false;
                debug!("siren stopped");
                Some(SirenSignal::Stopped)
            }
            _ => None,
        }
    }

    /// Reports whether a batch of world events may have changed the siren.
    #[must_use]
    pub fn is_relevant(events: &[Event]) -> bool {
        events.iter().any(|event| {
            matches!(
                event,
                Event::PlayerMoved { .. }
                    | Event::TurnChanged { .. }
                    | Event::SessionStarted { .. }
                    | Event::GameOver { .. }
            )
        })
    }

    /// Silences the siren, reporting a stop when it was sounding.
    pub fn reset(&mut self) -> Option<SirenSignal> {
        if self.active {
            self.active = false;
            Some(SirenSignal::Stopped)
        } else {
            None
        }
    }
}
