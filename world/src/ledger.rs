//! Per-role move histories shown to the opponent.

use cop_and_robber_core::{Direction, MoveRecord, Role};

/// Ordered move history for each role.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveLedger {
    robber: Vec<MoveRecord>,
    cop: Vec<MoveRecord>,
}

impl MoveLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a move to the role's history.
    pub fn record(&mut self, role: Role, direction: Direction) {
        self.history_mut(role).push(MoveRecord::new(role, direction));
    }

    /// Snapshot of the role's history in recording order.
    #[must_use]
    pub fn moves_for(&self, role: Role) -> Vec<MoveRecord> {
        self.history(role).to_vec()
    }

    /// Empties the role's history.
    pub fn clear_for(&mut self, role: Role) {
        self.history_mut(role).clear();
    }

    fn history(&self, role: Role) -> &[MoveRecord] {
        match role {
            Role::Robber => &self.robber,
            Role::Cop => &self.cop,
        }
    }

    fn history_mut(&mut self, role: Role) -> &mut Vec<MoveRecord> {
        match role {
            Role::Robber => &mut self.robber,
            Role::Cop => &mut self.cop,
        }
    }
}
