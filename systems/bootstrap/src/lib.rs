#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that prepares Cop and Robber sessions: it seeds the
//! randomness, plans spawns, places obstacles around them and hands the
//! resulting layout to the world.

use cop_and_robber_core::{BoardLayout, Command, ConfigError, GameConfig, SessionLayout};
use cop_and_robber_system_obstacles::ObstaclePlacer;
use cop_and_robber_system_spawning::{SpawnError, Spawning};
use cop_and_robber_world::{World, WorldError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::info;

/// Failures raised while preparing a session.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BootstrapError {
    /// The configuration cannot produce a playable session.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Spawns could not be planned.
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    /// The world refused the generated layout.
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Game orchestrator producing fresh layouts from one seeded generator.
#[derive(Debug)]
pub struct Bootstrap {
    config: GameConfig,
    spawning: Spawning,
    placer: ObstaclePlacer,
    rng: ChaCha8Rng,
}

impl Bootstrap {
    /// Validates the configuration and seeds the generator from
    /// `config.seed`, or from entropy when no seed is configured.
    pub fn new(config: GameConfig) -> Result<Self, BootstrapError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            spawning: Spawning::new(config.treasure_count),
            placer: ObstaclePlacer::from_config(&config.obstacles),
            rng,
            config,
        })
    }

    /// Configuration sessions are built with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Generates the next layout: spawns first, then obstacles that keep
    /// every spawn cell clear, then a seed for the turn rolls.
    pub fn layout(&mut self) -> Result<SessionLayout, BootstrapError> {
        let board = self.config.board;
        let plan = self.spawning.plan(board.columns, board.rows, &mut self.rng)?;

        let obstacles = self.placer.place(
            board.columns,
            board.rows,
            &plan.reserved_cells(),
            self.config.obstacles.pattern_count,
            &mut self.rng,
        );
        info!(
            placements = obstacles.placements().len(),
            requested = obstacles.requested(),
            cells = obstacles.cells().len(),
            attempts = obstacles.attempts(),
            "obstacles generated"
        );

        let turn_seed = self.rng.gen();
        let (robber, cop, treasures) = plan.into_parts();
        Ok(SessionLayout::new(
            BoardLayout::new(
                board.columns,
                board.rows,
                board.tile_length,
                obstacles.into_cells(),
            ),
            robber,
            cop,
            treasures,
            turn_seed,
        ))
    }

    /// Builds a world from a freshly generated layout.
    pub fn start_session(&mut self) -> Result<World, BootstrapError> {
        let layout = self.layout()?;
        Ok(World::new(self.config.clone(), &layout)?)
    }

    /// Wraps a freshly generated layout in a restart command.
    pub fn restart_command(&mut self) -> Result<Command, BootstrapError> {
        Ok(Command::RestartGame {
            layout: self.layout()?,
        })
    }
}
