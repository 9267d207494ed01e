//! Players, treasures and guess markers placed on the board.

use std::time::Duration;

use cop_and_robber_core::{CellCoord, Role};

/// A player token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    role: Role,
    cell: CellCoord,
    collected_coins: u32,
    settle_remaining: Duration,
}

impl Player {
    /// Places a player on its spawn cell.
    #[must_use]
    pub fn spawn(role: Role, cell: CellCoord) -> Self {
        Self {
            role,
            cell,
            collected_coins: 0,
            settle_remaining: Duration::ZERO,
        }
    }

    /// Role of the player.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Cell the player stands on.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Treasures picked up so far.
    #[must_use]
    pub const fn collected_coins(&self) -> u32 {
        self.collected_coins
    }

    /// Reports whether the player is still settling from its last move.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        !self.settle_remaining.is_zero()
    }

    /// Moves the player and starts the settle cooldown.
    ///
    /// The robber picks up uncollected treasure on the destination; the cell
    /// of a newly collected treasure is returned.
    pub fn move_to(
        &mut self,
        cell: CellCoord,
        settle: Duration,
        treasures: &mut [Treasure],
    ) -> Option<CellCoord> {
        self.cell = cell;
        self.settle_remaining = settle;

        if self.role != Role::Robber {
            return None;
        }

        let treasure = treasures
            .iter_mut()
            .find(|treasure| treasure.cell() == cell && !treasure.is_collected())?;
        if treasure.collect() {
            self.collected_coins = self.collected_coins.saturating_add(1);
            Some(cell)
        } else {
            None
        }
    }

    /// Drains the settle cooldown. Returns `true` when the player just settled.
    pub fn settle(&mut self, dt: Duration) -> bool {
        if !self.is_moving() {
            return false;
        }
        self.settle_remaining = self.settle_remaining.saturating_sub(dt);
        !self.is_moving()
    }

    /// Cancels any remaining cooldown.
    pub fn clear_settle(&mut self) {
        self.settle_remaining = Duration::ZERO;
    }
}

/// A collectible placed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Treasure {
    cell: CellCoord,
    collected: bool,
}

impl Treasure {
    /// Places uncollected treasure on a cell.
    #[must_use]
    pub const fn new(cell: CellCoord) -> Self {
        Self {
            cell,
            collected: false,
        }
    }

    /// Cell holding the treasure.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Whether the treasure has been picked up.
    #[must_use]
    pub const fn is_collected(&self) -> bool {
        self.collected
    }

    /// Marks the treasure collected. Returns whether it was newly collected.
    pub fn collect(&mut self) -> bool {
        let newly = !self.collected;
        self.collected = true;
        newly
    }
}

/// Marker a role moves to track where it believes the opponent is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Indicator {
    role: Role,
    cell: CellCoord,
}

impl Indicator {
    /// Creates an indicator owned by `role` marking `cell`.
    #[must_use]
    pub const fn new(role: Role, cell: CellCoord) -> Self {
        Self { role, cell }
    }

    /// Role owning the indicator.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Cell currently marked.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) fn move_to(&mut self, cell: CellCoord) {
        self.cell = cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: Duration = Duration::from_millis(100);

    #[test]
    fn collecting_twice_is_a_no_op() {
        let mut treasure = Treasure::new(CellCoord::new(2, 2));
        assert!(treasure.collect());
        assert!(!treasure.collect());
        assert!(treasure.is_collected());
    }

    #[test]
    fn robber_collects_treasure_on_arrival() {
        let mut treasures = [Treasure::new(CellCoord::new(2, 1))];
        let mut robber = Player::spawn(Role::Robber, CellCoord::new(1, 1));
        assert_eq!(
            robber.move_to(CellCoord::new(2, 1), SETTLE, &mut treasures),
            Some(CellCoord::new(2, 1))
        );
        assert_eq!(robber.collected_coins(), 1);
        assert!(treasures[0].is_collected());
    }

    #[test]
    fn cop_walks_over_treasure() {
        let mut treasures = [Treasure::new(CellCoord::new(2, 1))];
        let mut cop = Player::spawn(Role::Cop, CellCoord::new(1, 1));
        assert_eq!(cop.move_to(CellCoord::new(2, 1), SETTLE, &mut treasures), None);
        assert!(!treasures[0].is_collected());
    }

    #[test]
    fn settle_drains_over_ticks() {
        let mut robber = Player::spawn(Role::Robber, CellCoord::new(1, 1));
        let _ = robber.move_to(CellCoord::new(1, 2), SETTLE, &mut []);
        assert!(robber.is_moving());
        assert!(!robber.settle(Duration::from_millis(60)));
        assert!(robber.settle(Duration::from_millis(60)));
        assert!(!robber.is_moving());
        assert!(!robber.settle(Duration::from_millis(60)));
    }
}
