//! Whose turn it is and how many steps remain.

use cop_and_robber_core::{Role, TurnConfig, TurnEndError, TurnState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Summary of a successful hand-over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnChange {
    /// Round counter after the hand-over.
    pub round: u32,
    /// Role that just finished its turn.
    pub outgoing: Role,
    /// Role that moves next.
    pub incoming: Role,
    /// Step budget rolled for the incoming role.
    pub steps_allowed: u32,
}

/// Turn state machine driving the alternation between roles.
#[derive(Clone, Debug)]
pub struct TurnController {
    range: TurnConfig,
    rng: ChaCha8Rng,
    round: u32,
    active_role: Role,
    steps_taken: u32,
    steps_allowed: u32,
}

impl TurnController {
    /// Creates a controller in round 1 with the robber to move and a freshly
    /// rolled budget.
    #[must_use]
    pub fn new(range: TurnConfig, seed: u64) -> Self {
        let mut controller = Self {
            range,
            rng: ChaCha8Rng::seed_from_u64(seed),
            round: 1,
            active_role: Role::Robber,
            steps_taken: 0,
            steps_allowed: 0,
        };
        controller.start_turn();
        controller
    }

    /// Rolls a new step budget and resets the steps taken.
    pub fn start_turn(&mut self) {
        let min = self.range.min_steps.max(1);
        let max = self.range.max_steps.max(min);
        self.steps_allowed = self.rng.gen_range(min..=max);
        self.steps_taken = 0;
        info!(
            round = self.round,
            role = self.active_role.label(),
            steps = self.steps_allowed,
            "turn started"
        );
    }

    /// Reports whether the active role still has steps available.
    #[must_use]
    pub fn can_move(&self) -> bool {
        self.steps_taken < self.steps_allowed
    }

    /// Steps left in the current turn.
    #[must_use]
    pub fn steps_remaining(&self) -> u32 {
        self.steps_allowed.saturating_sub(self.steps_taken)
    }

    /// Role allowed to move.
    #[must_use]
    pub const fn active_role(&self) -> Role {
        self.active_role
    }

    /// Spends one step. Returns `false` without changing anything when the
    /// budget is already exhausted.
    pub fn on_move_consumed(&mut self) -> bool {
        if !self.can_move() {
            debug!(
                taken = self.steps_taken,
                allowed = self.steps_allowed,
                "step budget exhausted, move not counted"
            );
            return false;
        }

        self.steps_taken += 1;
        if !self.can_move() {
            debug!(role = self.active_role.label(), "no steps left this turn");
        }
        true
    }

    /// Hands the turn to the opponent once every step has been spent.
    pub fn end_turn(&mut self) -> Result<TurnChange, TurnEndError> {
        if self.can_move() {
            return Err(TurnEndError::StepsRemaining {
                taken: self.steps_taken,
                allowed: self.steps_allowed,
            });
        }

        let outgoing = self.active_role;
        self.round = self.round.saturating_add(1);
        self.active_role = outgoing.opponent();
        self.start_turn();

        Ok(TurnChange {
            round: self.round,
            outgoing,
            incoming: self.active_role,
            steps_allowed: self.steps_allowed,
        })
    }

    /// Snapshot of the controller.
    #[must_use]
    pub fn state(&self) -> TurnState {
        TurnState {
            round: self.round,
            active_role: self.active_role,
            steps_taken: self.steps_taken,
            steps_allowed: self.steps_allowed,
        }
    }
}
