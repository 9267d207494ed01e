#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Cop and Robber.

mod board;
mod entities;
mod ledger;
mod lie;
mod turn;

use std::time::Duration;

use cop_and_robber_core::{
    CellCoord, Command, ConfigError, Direction, Event, GameConfig, GameOutcome, LieError,
    MoveError, MoveRecord, Role, SessionLayout, TurnEndError, VictoryReason, WELCOME_BANNER,
};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use board::{Board, BoardError, CellData};
pub use entities::{Indicator, Player, Treasure};
pub use ledger::MoveLedger;
pub use lie::{LieEngine, LiePhase};
pub use turn::{TurnChange, TurnController};

/// Failures raised while building a world from a layout.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum WorldError {
    /// The configuration cannot produce a playable session.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The board could not be allocated.
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
    /// A player spawn is not on a passable cell.
    #[error("{role:?} spawn {cell:?} is not passable")]
    BlockedSpawn {
        /// Role of the misplaced player.
        role: Role,
        /// Requested spawn cell.
        cell: CellCoord,
    },
    /// Both players were asked to spawn on the same cell.
    #[error("players cannot share spawn cell {0:?}")]
    SharedSpawn(CellCoord),
    /// A treasure sits on an impassable cell or under a player.
    #[error("treasure cell {0:?} is blocked or occupied")]
    InvalidTreasure(CellCoord),
}

/// Represents the authoritative Cop and Robber world state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    board: Board,
    ledger: MoveLedger,
    turns: TurnController,
    lies: LieEngine,
    robber: Player,
    cop: Player,
    treasures: Vec<Treasure>,
    robber_indicator: Indicator,
    cop_indicator: Indicator,
    revealed: Vec<MoveRecord>,
    outcome: Option<GameOutcome>,
}

impl World {
    /// Builds a session from the configuration and layout.
    ///
    /// The board is allocated without obstacles first so spawn cells can be
    /// validated against the bare interior, then the layout's obstacles are
    /// applied.
    pub fn new(config: GameConfig, layout: &SessionLayout) -> Result<Self, WorldError> {
        config.validate()?;

        let terrain = layout.board();
        let mut board = Board::initialize_without_obstacles(
            terrain.columns(),
            terrain.rows(),
            terrain.tile_length(),
        )?;
        board.apply_obstacles(terrain.obstacles().iter().copied());

        for role in Role::ALL {
            let cell = layout.spawn(role);
            if !board.is_passable(cell) {
                return Err(WorldError::BlockedSpawn { role, cell });
            }
        }

        let robber_spawn = layout.spawn(Role::Robber);
        let cop_spawn = layout.spawn(Role::Cop);
        if robber_spawn == cop_spawn {
            return Err(WorldError::SharedSpawn(robber_spawn));
        }

        let mut treasures: Vec<Treasure> = Vec::with_capacity(layout.treasures().len());
        for &cell in layout.treasures() {
            if !board.is_passable(cell) || cell == robber_spawn || cell == cop_spawn {
                return Err(WorldError::InvalidTreasure(cell));
            }
            if treasures.iter().any(|treasure| treasure.cell() == cell) {
                continue;
            }
            treasures.push(Treasure::new(cell));
        }

        info!(
            columns = board.columns(),
            rows = board.rows(),
            obstacles = board.obstacles().len(),
            treasures = treasures.len(),
            "session created"
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            ledger: MoveLedger::new(),
            turns: TurnController::new(config.turns, layout.turn_seed()),
            lies: LieEngine::new(config.lies),
            robber: Player::spawn(Role::Robber, robber_spawn),
            cop: Player::spawn(Role::Cop, cop_spawn),
            robber_indicator: Indicator::new(Role::Robber, cop_spawn),
            cop_indicator: Indicator::new(Role::Cop, robber_spawn),
            treasures,
            revealed: Vec::new(),
            outcome: None,
            board,
            config,
        })
    }

    fn player(&self, role: Role) -> &Player {
        match role {
            Role::Robber => &self.robber,
            Role::Cop => &self.cop,
        }
    }

    fn indicator(&self, role: Role) -> &Indicator {
        match role {
            Role::Robber => &self.robber_indicator,
            Role::Cop => &self.cop_indicator,
        }
    }

    fn move_player(&mut self, role: Role, direction: Direction, out_events: &mut Vec<Event>) {
        let target = match self.check_move(role, direction) {
            Ok(target) => target,
            Err(reason) => {
                debug!(role = role.label(), ?direction, ?reason, "move rejected");
                out_events.push(Event::MoveRejected {
                    role,
                    direction,
                    reason,
                });
                return;
            }
        };

        let _ = self.turns.on_move_consumed();

        let settle = self.config.settle_delay();
        let (player, treasures) = match role {
            Role::Robber => (&mut self.robber, &mut self.treasures),
            Role::Cop => (&mut self.cop, &mut self.treasures),
        };
        let from = player.cell();
        let collected = player.move_to(target, settle, treasures);
        let collected_coins = player.collected_coins();

        let actual = Direction::between(from, target).unwrap_or(direction);
        let recorded = match self.lies.consume_active_lie() {
            Some(fabricated) => {
                out_events.push(Event::LieConsumed {
                    role,
                    recorded: fabricated,
                    actual,
                });
                fabricated
            }
            None => actual,
        };
        self.ledger.record(role, recorded);

        out_events.push(Event::PlayerMoved {
            role,
            from,
            to: target,
        });

        if let Some(cell) = collected {
            info!(
                column = cell.column(),
                row = cell.row(),
                collected_coins,
                "treasure collected"
            );
            out_events.push(Event::TreasureCollected {
                cell,
                collected_coins,
            });
        }

        self.evaluate_outcome(out_events);
    }

    fn check_move(&self, role: Role, direction: Direction) -> Result<CellCoord, MoveError> {
        if self.outcome.is_some() {
            return Err(MoveError::GameOver);
        }
        if role != self.turns.active_role() {
            return Err(MoveError::NotYourTurn);
        }
        let player = self.player(role);
        if player.is_moving() {
            return Err(MoveError::Settling);
        }
        if !self.turns.can_move() {
            return Err(MoveError::NoStepsRemaining);
        }

        let target = player
            .cell()
            .step(direction)
            .filter(|cell| self.board.is_passable(*cell))
            .ok_or(MoveError::Blocked)?;

        if self.config.cop_final_step_guards_treasure
            && role == Role::Cop
            && self.turns.steps_remaining() == 1
            && self
                .treasures
                .iter()
                .any(|treasure| treasure.cell() == target && !treasure.is_collected())
        {
            return Err(MoveError::TreasureGuarded);
        }

        Ok(target)
    }

    fn evaluate_outcome(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }

        let outcome = if self.robber.cell() == self.cop.cell() {
            GameOutcome {
                winner: Role::Cop,
                reason: VictoryReason::Caught,
            }
        } else if !self.treasures.is_empty() && self.treasures.iter().all(Treasure::is_collected) {
            GameOutcome {
                winner: Role::Robber,
                reason: VictoryReason::TreasureCleared,
            }
        } else {
            return;
        };

        info!(winner = outcome.winner.label(), reason = ?outcome.reason, "game over");
        self.outcome = Some(outcome);
        out_events.push(Event::GameOver { outcome });
    }

    fn move_indicator(&mut self, role: Role, direction: Direction, out_events: &mut Vec<Event>) {
        let outcome = if self.outcome.is_some() {
            Err(MoveError::GameOver)
        } else if role != self.turns.active_role() {
            Err(MoveError::NotYourTurn)
        } else {
            self.indicator(role)
                .cell()
                .step(direction)
                .filter(|cell| self.board.is_passable(*cell))
                .ok_or(MoveError::Blocked)
        };

        match outcome {
            Ok(cell) => {
                let indicator = match role {
                    Role::Robber => &mut self.robber_indicator,
                    Role::Cop => &mut self.cop_indicator,
                };
                indicator.move_to(cell);
                out_events.push(Event::IndicatorMoved {
                    role: indicator.role(),
                    cell,
                });
            }
            Err(reason) => out_events.push(Event::IndicatorRejected {
                role,
                direction,
                reason,
            }),
        }
    }

    fn check_lie_request(&self, role: Role) -> Result<(), LieError> {
        if self.outcome.is_some() {
            return Err(LieError::GameOver);
        }
        if role != self.turns.active_role() {
            return Err(LieError::NotYourTurn);
        }
        if role != self.lies.deceiver() {
            return Err(LieError::NotDeceivingRole);
        }
        Ok(())
    }

    fn begin_lie(&mut self, role: Role, out_events: &mut Vec<Event>) {
        let result = self.check_lie_request(role).and_then(|()| {
            if self.turns.can_move() {
                self.lies.begin_lie()
            } else {
                Err(LieError::NoStepsRemaining)
            }
        });

        match result {
            Ok(()) => out_events.push(Event::LieArmed { role }),
            Err(reason) => out_events.push(Event::LieRejected { role, reason }),
        }
    }

    fn select_lie_direction(
        &mut self,
        role: Role,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) {
        let result = self.check_lie_request(role).and_then(|()| {
            if self.turns.can_move() {
                self.lies.select_direction(direction)
            } else {
                Err(LieError::NoStepsRemaining)
            }
        });

        match result {
            Ok(()) => {
                let budget = self.lies.budget();
                out_events.push(Event::LieSelected {
                    role,
                    direction,
                    total_used: budget.total_used,
                    max_total: budget.max_total,
                });
            }
            Err(reason) => out_events.push(Event::LieRejected { role, reason }),
        }
    }

    fn cancel_lie(&mut self, role: Role, out_events: &mut Vec<Event>) {
        let result = self
            .check_lie_request(role)
            .and_then(|()| self.lies.cancel_lie());

        match result {
            Ok(()) => out_events.push(Event::LieCancelled { role }),
            Err(reason) => out_events.push(Event::LieRejected { role, reason }),
        }
    }

    fn end_turn(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            out_events.push(Event::TurnEndRejected {
                reason: TurnEndError::GameOver,
            });
            return;
        }

        let change = match self.turns.end_turn() {
            Ok(change) => change,
            Err(reason) => {
                out_events.push(Event::TurnEndRejected { reason });
                return;
            }
        };

        let revealed = self.ledger.moves_for(change.outgoing);
        self.ledger.clear_for(change.outgoing);
        self.lies.on_turn_changed();
        self.robber.clear_settle();
        self.cop.clear_settle();
        self.revealed = revealed.clone();

        out_events.push(Event::TurnChanged {
            round: change.round,
            active_role: change.incoming,
            steps_allowed: change.steps_allowed,
            revealed,
        });
    }

    fn advance_time(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });
        for player in [&mut self.robber, &mut self.cop] {
            if player.settle(dt) {
                out_events.push(Event::PlayerSettled {
                    role: player.role(),
                });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.advance_time(dt, out_events),
        Command::MovePlayer { role, direction } => world.move_player(role, direction, out_events),
        Command::MoveIndicator { role, direction } => {
            world.move_indicator(role, direction, out_events)
        }
        Command::BeginLie { role } => world.begin_lie(role, out_events),
        Command::SelectLieDirection { role, direction } => {
            world.select_lie_direction(role, direction, out_events)
        }
        Command::CancelLie { role } => world.cancel_lie(role, out_events),
        Command::EndTurn => world.end_turn(out_events),
        Command::RestartGame { layout } => match World::new(world.config.clone(), &layout) {
            Ok(fresh) => {
                *world = fresh;
                let state = world.turns.state();
                out_events.push(Event::SessionStarted {
                    round: state.round,
                    active_role: state.active_role,
                    steps_allowed: state.steps_allowed,
                });
            }
            Err(error) => {
                warn!(%error, "restart layout rejected");
                out_events.push(Event::RestartRejected);
            }
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Board, Indicator, Player, Treasure, World};
    use cop_and_robber_core::{GameConfig, GameOutcome, LieBudget, MoveRecord, Role, TurnState};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the session runs with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Snapshot of the turn state machine.
    #[must_use]
    pub fn turn_state(world: &World) -> TurnState {
        world.turns.state()
    }

    /// Snapshot of the lie budget.
    #[must_use]
    pub fn lie_budget(world: &World) -> LieBudget {
        world.lies.budget()
    }

    /// Current move history of a role.
    #[must_use]
    pub fn moves_for(world: &World, role: Role) -> Vec<MoveRecord> {
        world.ledger.moves_for(role)
    }

    /// Moves revealed to the active role by the last hand-over.
    #[must_use]
    pub fn revealed_moves(world: &World) -> &[MoveRecord] {
        &world.revealed
    }

    /// Player holding the role.
    #[must_use]
    pub fn player(world: &World, role: Role) -> &Player {
        world.player(role)
    }

    /// Every treasure, collected or not.
    #[must_use]
    pub fn treasures(world: &World) -> &[Treasure] {
        &world.treasures
    }

    /// Number of treasures still on the board.
    #[must_use]
    pub fn remaining_treasures(world: &World) -> usize {
        world
            .treasures
            .iter()
            .filter(|treasure| !treasure.is_collected())
            .count()
    }

    /// Reports whether the active role could start a lie right now.
    #[must_use]
    pub fn lie_available(world: &World) -> bool {
        let role = world.turns.active_role();
        world.check_lie_request(role).is_ok()
            && world.turns.can_move()
            && world.lies.can_use_lie()
    }

    /// Guess marker owned by the role.
    #[must_use]
    pub fn indicator(world: &World, role: Role) -> &Indicator {
        world.indicator(role)
    }

    /// Winner of the match, once decided.
    #[must_use]
    pub fn outcome(world: &World) -> Option<GameOutcome> {
        world.outcome
    }
}
