//! Tunable parameters for a session.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// Smallest board side that still leaves one interior cell inside the wall.
const MINIMUM_BOARD_SIDE: u32 = 3;

/// Complete configuration of a Cop and Robber session.
///
/// Every field has a default, so partial TOML documents deserialize into a
/// playable configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board dimensions.
    pub board: BoardConfig,
    /// Obstacle placement parameters.
    pub obstacles: ObstacleConfig,
    /// Step roll range.
    pub turns: TurnConfig,
    /// Lie budget.
    pub lies: LieConfig,
    /// Number of treasures spawned on the board.
    pub treasure_count: u32,
    /// Cooldown after each move, in milliseconds.
    pub settle_delay_ms: u64,
    /// Forbids the cop's final step of a turn from landing on uncollected treasure.
    pub cop_final_step_guards_treasure: bool,
    /// Seed for deterministic layouts. Entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            obstacles: ObstacleConfig::default(),
            turns: TurnConfig::default(),
            lies: LieConfig::default(),
            treasure_count: 5,
            settle_delay_ms: 100,
            cop_final_step_guards_treasure: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Cooldown applied after each move.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.columns < MINIMUM_BOARD_SIDE || self.board.rows < MINIMUM_BOARD_SIDE {
            return Err(ConfigError::BoardTooSmall {
                columns: self.board.columns,
                rows: self.board.rows,
            });
        }

        if !(self.board.tile_length.is_finite() && self.board.tile_length > 0.0) {
            return Err(ConfigError::InvalidTileLength(self.board.tile_length));
        }

        if self.turns.min_steps == 0 || self.turns.min_steps > self.turns.max_steps {
            return Err(ConfigError::InvalidStepRange {
                min: self.turns.min_steps,
                max: self.turns.max_steps,
            });
        }

        if self.obstacles.origins_per_variant == 0 {
            return Err(ConfigError::NoOriginsPerVariant);
        }

        Ok(())
    }
}

/// Board dimensions, including the outer wall.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
    /// Side length of a cell in world units.
    pub tile_length: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 10,
            tile_length: 1.0,
        }
    }
}

/// Obstacle placement parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Number of obstacle placements requested.
    pub pattern_count: u32,
    /// Uses multi-cell patterns when true, single cells otherwise.
    pub use_patterns: bool,
    /// Upper bound on placement iterations.
    pub max_attempts: u32,
    /// Random origins tried for each pattern variant.
    pub origins_per_variant: u32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            pattern_count: 4,
            use_patterns: true,
            max_attempts: 2000,
            origins_per_variant: 4,
        }
    }
}

/// Inclusive range the per-turn step budget is rolled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    /// Lowest possible roll.
    pub min_steps: u32,
    /// Highest possible roll.
    pub max_steps: u32,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            min_steps: 1,
            max_steps: 4,
        }
    }
}

/// Lie budget and the role allowed to spend it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LieConfig {
    /// Lies available for the whole session.
    pub max_total: u32,
    /// Lies available in a single turn.
    pub max_per_turn: u32,
    /// Role allowed to lie.
    pub deceiver: Role,
}

impl Default for LieConfig {
    fn default() -> Self {
        Self {
            max_total: 3,
            max_per_turn: 1,
            deceiver: Role::Robber,
        }
    }
}

/// Configuration values that cannot produce a playable session.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Boards need at least one interior cell inside the wall.
    #[error("board must be at least 3x3, got {columns}x{rows}")]
    BoardTooSmall {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// Tile length must be a positive finite number.
    #[error("tile length must be positive, got {0}")]
    InvalidTileLength(f32),
    /// Step range must be non-empty and start at one or more.
    #[error("step range {min}..={max} is invalid")]
    InvalidStepRange {
        /// Configured minimum.
        min: u32,
        /// Configured maximum.
        max: u32,
    },
    /// Placement needs at least one origin per variant.
    #[error("origins_per_variant must be at least 1")]
    NoOriginsPerVariant,
}
