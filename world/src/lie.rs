//! Budgeted deception: a lie replaces the next recorded direction.

use cop_and_robber_core::{Direction, LieBudget, LieConfig, LieError, Role};
use tracing::debug;

/// Progress of the current lie.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LiePhase {
    /// No lie in progress.
    #[default]
    Idle,
    /// Waiting for the fabricated direction.
    ArmingDirection,
    /// Fabricated direction waiting for the next real move.
    Pending(Direction),
}

/// Tracks lie budgets and the lie currently in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LieEngine {
    config: LieConfig,
    total_used: u32,
    used_this_turn: u32,
    phase: LiePhase,
}

impl LieEngine {
    /// Creates an engine with a full budget.
    #[must_use]
    pub fn new(config: LieConfig) -> Self {
        Self {
            config,
            total_used: 0,
            used_this_turn: 0,
            phase: LiePhase::Idle,
        }
    }

    /// Role allowed to lie.
    #[must_use]
    pub const fn deceiver(&self) -> Role {
        self.config.deceiver
    }

    /// Reports whether a new lie may begin.
    #[must_use]
    pub fn can_use_lie(&self) -> bool {
        self.check_budget().is_ok()
    }

    /// Starts arming a lie.
    pub fn begin_lie(&mut self) -> Result<(), LieError> {
        self.check_budget()?;
        self.phase = LiePhase::ArmingDirection;
        debug!("lie armed");
        Ok(())
    }

    /// Abandons an armed lie without spending the budget.
    pub fn cancel_lie(&mut self) -> Result<(), LieError> {
        if self.phase != LiePhase::ArmingDirection {
            return Err(LieError::NotArming);
        }
        self.phase = LiePhase::Idle;
        Ok(())
    }

    /// Chooses the fabricated direction and spends the lie.
    pub fn select_direction(&mut self, direction: Direction) -> Result<(), LieError> {
        if self.phase != LiePhase::ArmingDirection {
            return Err(LieError::NotArming);
        }
        self.phase = LiePhase::Pending(direction);
        self.total_used = self.total_used.saturating_add(1);
        self.used_this_turn = self.used_this_turn.saturating_add(1);
        debug!(
            ?direction,
            total_used = self.total_used,
            max_total = self.config.max_total,
            "lie direction selected"
        );
        Ok(())
    }

    /// Takes the pending fabricated direction, returning the engine to idle.
    pub fn consume_active_lie(&mut self) -> Option<Direction> {
        match self.phase {
            LiePhase::Pending(direction) => {
                self.phase = LiePhase::Idle;
                Some(direction)
            }
            LiePhase::Idle | LiePhase::ArmingDirection => None,
        }
    }

    /// Resets per-turn state. Spent lies are never refunded.
    pub fn on_turn_changed(&mut self) {
        if self.phase != LiePhase::Idle {
            debug!(phase = ?self.phase, "discarding unfinished lie at turn change");
        }
        self.used_this_turn = 0;
        self.phase = LiePhase::Idle;
    }

    /// Snapshot of the budget.
    #[must_use]
    pub fn budget(&self) -> LieBudget {
        LieBudget {
            deceiver: self.config.deceiver,
            total_used: self.total_used,
            used_this_turn: self.used_this_turn,
            max_total: self.config.max_total,
            max_per_turn: self.config.max_per_turn,
            arming: self.phase == LiePhase::ArmingDirection,
            pending_direction: match self.phase {
                LiePhase::Pending(direction) => Some(direction),
                LiePhase::Idle | LiePhase::ArmingDirection => None,
            },
        }
    }

    fn check_budget(&self) -> Result<(), LieError> {
        if self.phase != LiePhase::Idle {
            return Err(LieError::AlreadyActive);
        }
        if self.total_used >= self.config.max_total
            || self.used_this_turn >= self.config.max_per_turn
        {
            return Err(LieError::BudgetExhausted);
        }
        Ok(())
    }
}
