#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cop and Robber engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired actions for the active player, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what changed or why a request was refused. Systems consume
//! event streams, query immutable snapshots, and respond with new commands.

mod config;
mod connectivity;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use config::{BoardConfig, ConfigError, GameConfig, LieConfig, ObstacleConfig, TurnConfig};
pub use connectivity::reachable_cells;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Cop and Robber.";

/// The two sides of a pass-and-play match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Collects treasure while avoiding the cop. Always moves first.
    Robber,
    /// Hunts the robber.
    Cop,
}

impl Role {
    /// Both roles in turn order.
    pub const ALL: [Role; 2] = [Role::Robber, Role::Cop];

    /// Returns the role on the other side of the table.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Robber => Self::Cop,
            Self::Cop => Self::Robber,
        }
    }

    /// Human readable name of the role.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Robber => "Robber",
            Self::Cop => "Cop",
        }
    }
}

/// Orthogonal movement directions. Rows grow upward, so `Up` increments the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices.
    Up,
    /// Movement toward decreasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Derives the direction of a single orthogonal step between two cells.
    ///
    /// Returns `None` unless the cells differ by exactly one unit along
    /// exactly one axis.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::Right)
            } else {
                Some(Self::Left)
            }
        } else if to.row() > from.row() {
            Some(Self::Up)
        } else {
            Some(Self::Down)
        }
    }

    /// Arrow glyph used when replaying move histories.
    #[must_use]
    pub const fn arrow(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Down => '↓',
            Self::Left => '←',
            Self::Right => '→',
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring cell one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the unsigned coordinate space.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::Up => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::Down => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::Left => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
            Direction::Right => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
        }
    }

    /// Reports whether the cell lies strictly inside a grid of the given size,
    /// i.e. within bounds and off the outer wall.
    #[must_use]
    pub const fn is_interior_of(&self, columns: u32, rows: u32) -> bool {
        self.column > 0
            && self.row > 0
            && self.column.saturating_add(1) < columns
            && self.row.saturating_add(1) < rows
    }
}

/// Continuous position of a cell centre measured in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

/// Single entry of a role's move history.
///
/// Fabricated entries produced by a lie are stored exactly like real ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    role: Role,
    direction: Direction,
}

impl MoveRecord {
    /// Creates a new move record.
    #[must_use]
    pub const fn new(role: Role, direction: Direction) -> Self {
        Self { role, direction }
    }

    /// Role that owns the record.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Direction shown to the opponent.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

/// Terrain description used to (re)build the board.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardLayout {
    columns: u32,
    rows: u32,
    tile_length: f32,
    obstacles: Vec<CellCoord>,
}

impl BoardLayout {
    /// Creates a board layout from its dimensions and interior obstacle cells.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tile_length: f32, obstacles: Vec<CellCoord>) -> Self {
        Self {
            columns,
            rows,
            tile_length,
            obstacles,
        }
    }

    /// Number of columns including the outer wall.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows including the outer wall.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a cell expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Interior cells marked impassable.
    #[must_use]
    pub fn obstacles(&self) -> &[CellCoord] {
        &self.obstacles
    }
}

/// Everything required to start a session: terrain, spawn points, and the
/// seed driving the per-turn step rolls.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionLayout {
    board: BoardLayout,
    robber: CellCoord,
    cop: CellCoord,
    treasures: Vec<CellCoord>,
    turn_seed: u64,
}

impl SessionLayout {
    /// Creates a new session layout.
    #[must_use]
    pub fn new(
        board: BoardLayout,
        robber: CellCoord,
        cop: CellCoord,
        treasures: Vec<CellCoord>,
        turn_seed: u64,
    ) -> Self {
        Self {
            board,
            robber,
            cop,
            treasures,
            turn_seed,
        }
    }

    /// Terrain of the session.
    #[must_use]
    pub const fn board(&self) -> &BoardLayout {
        &self.board
    }

    /// Spawn cell of the player holding the given role.
    #[must_use]
    pub const fn spawn(&self, role: Role) -> CellCoord {
        match role {
            Role::Robber => self.robber,
            Role::Cop => self.cop,
        }
    }

    /// Cells holding treasure at the start of the session.
    #[must_use]
    pub fn treasures(&self) -> &[CellCoord] {
        &self.treasures
    }

    /// Seed for the turn controller's step rolls.
    #[must_use]
    pub const fn turn_seed(&self) -> u64 {
        self.turn_seed
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock, draining movement settle timers.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a player step one cell in the specified direction.
    MovePlayer {
        /// Role of the player attempting to move.
        role: Role,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Moves the role's guess marker for the opponent's position.
    MoveIndicator {
        /// Role that owns the indicator.
        role: Role,
        /// Direction of travel for the marker.
        direction: Direction,
    },
    /// Requests to start arming a lie for the next move.
    BeginLie {
        /// Role spending the lie.
        role: Role,
    },
    /// Chooses the fabricated direction of an armed lie.
    SelectLieDirection {
        /// Role spending the lie.
        role: Role,
        /// Direction that will be recorded instead of the real one.
        direction: Direction,
    },
    /// Abandons a lie that is still waiting for its direction.
    CancelLie {
        /// Role that began the lie.
        role: Role,
    },
    /// Requests that the active role hand the device to the opponent.
    EndTurn,
    /// Discards the session and starts over from the provided layout.
    RestartGame {
        /// Layout of the new session.
        layout: SessionLayout,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces a freshly (re)started session.
    SessionStarted {
        /// Round number of the opening turn.
        round: u32,
        /// Role that moves first.
        active_role: Role,
        /// Step budget rolled for the opening turn.
        steps_allowed: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that a player's post-move cooldown elapsed.
    PlayerSettled {
        /// Role of the player that can move again.
        role: Role,
    },
    /// Confirms that a player moved between two cells.
    PlayerMoved {
        /// Role of the player that moved.
        role: Role,
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
    },
    /// Reports that a movement request was refused.
    MoveRejected {
        /// Role that attempted to move.
        role: Role,
        /// Requested direction.
        direction: Direction,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that the robber picked up a treasure.
    TreasureCollected {
        /// Cell holding the treasure.
        cell: CellCoord,
        /// Number of treasures the robber holds after the pickup.
        collected_coins: u32,
    },
    /// Confirms that an indicator moved.
    IndicatorMoved {
        /// Role owning the indicator.
        role: Role,
        /// Cell the indicator now marks.
        cell: CellCoord,
    },
    /// Reports that an indicator could not move.
    IndicatorRejected {
        /// Role owning the indicator.
        role: Role,
        /// Requested direction.
        direction: Direction,
        /// Specific reason the marker stayed put.
        reason: MoveError,
    },
    /// Confirms that a lie is waiting for its fabricated direction.
    LieArmed {
        /// Role spending the lie.
        role: Role,
    },
    /// Confirms that a fabricated direction was chosen and the lie spent.
    LieSelected {
        /// Role spending the lie.
        role: Role,
        /// Fabricated direction.
        direction: Direction,
        /// Lies spent so far in the session.
        total_used: u32,
        /// Session-wide lie budget.
        max_total: u32,
    },
    /// Confirms that an armed lie was abandoned before choosing a direction.
    LieCancelled {
        /// Role that abandoned the lie.
        role: Role,
    },
    /// Reports that the move history received a fabricated entry.
    LieConsumed {
        /// Role whose history was falsified.
        role: Role,
        /// Direction written to the history.
        recorded: Direction,
        /// Direction actually travelled.
        actual: Direction,
    },
    /// Reports that a lie request was refused.
    LieRejected {
        /// Role that issued the request.
        role: Role,
        /// Specific reason the request failed.
        reason: LieError,
    },
    /// Reports that the active role tried to end its turn too early.
    TurnEndRejected {
        /// Specific reason the turn could not end.
        reason: TurnEndError,
    },
    /// Announces the atomic hand-over between roles.
    TurnChanged {
        /// Round counter after the hand-over.
        round: u32,
        /// Role that moves next.
        active_role: Role,
        /// Step budget rolled for the new turn.
        steps_allowed: u32,
        /// Moves of the outgoing role, as the incoming role is allowed to see them.
        revealed: Vec<MoveRecord>,
    },
    /// Announces the end of the match.
    GameOver {
        /// Winner and reason.
        outcome: GameOutcome,
    },
    /// Reports that a restart layout could not be applied.
    RestartRejected,
}

/// Reasons a movement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveError {
    /// The match already has a winner.
    GameOver,
    /// The requesting role is not the active role.
    NotYourTurn,
    /// The player is still settling from its previous move.
    Settling,
    /// The turn's step budget is spent.
    NoStepsRemaining,
    /// The destination is a wall, an obstacle, or off the board.
    Blocked,
    /// The cop's final step may not land on uncollected treasure.
    TreasureGuarded,
}

/// Reasons a lie request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LieError {
    /// The match already has a winner.
    GameOver,
    /// The requesting role is not the active role.
    NotYourTurn,
    /// Only the configured deceiving role may lie.
    NotDeceivingRole,
    /// Lies require at least one remaining step this turn.
    NoStepsRemaining,
    /// The session or per-turn budget is spent.
    BudgetExhausted,
    /// A lie is already armed or pending this turn.
    AlreadyActive,
    /// No lie is waiting for a direction.
    NotArming,
}

/// Reasons a turn may not end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnEndError {
    /// The match already has a winner.
    GameOver,
    /// The active role has not spent its whole step budget.
    StepsRemaining {
        /// Steps already taken.
        taken: u32,
        /// Steps rolled for the turn.
        allowed: u32,
    },
}

/// How a match was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictoryReason {
    /// The cop and robber ended up on the same cell.
    Caught,
    /// The robber collected every treasure.
    TreasureCleared,
}

/// Final result of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Winning role.
    pub winner: Role,
    /// How the match was decided.
    pub reason: VictoryReason,
}

/// Read-only snapshot of the turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TurnState {
    /// Turn counter, starting at 1 and incremented by every hand-over.
    pub round: u32,
    /// Role allowed to move.
    pub active_role: Role,
    /// Steps already taken this turn.
    pub steps_taken: u32,
    /// Steps rolled for this turn.
    pub steps_allowed: u32,
}

/// Read-only snapshot of the lie budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LieBudget {
    /// Role allowed to lie.
    pub deceiver: Role,
    /// Lies spent in the session.
    pub total_used: u32,
    /// Lies spent in the current turn.
    pub used_this_turn: u32,
    /// Session-wide lie limit.
    pub max_total: u32,
    /// Per-turn lie limit.
    pub max_per_turn: u32,
    /// Whether a lie is waiting for its direction.
    pub arming: bool,
    /// Fabricated direction waiting for the next real move.
    pub pending_direction: Option<Direction>,
}
