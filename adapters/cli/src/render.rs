//! Text output for the terminal session.

use std::fmt::Write as _;

use cop_and_robber_core::{
    CellCoord, Event, LieError, MoveError, MoveRecord, Role, TurnEndError, VictoryReason,
};
use cop_and_robber_world::{query, World};

/// Terminal escape that wipes the screen and scrollback between players.
pub(crate) const HAND_OVER: &str = "\x1b[2J\x1b[3J\x1b[H";

/// Draws the board as seen by `viewer`: its own token, its guess marker for
/// the opponent, remaining treasure and the terrain. North is up.
pub(crate) fn board(world: &World, viewer: Role) -> String {
    let board = query::board(world);
    let own = query::player(world, viewer).cell();
    let guess = query::indicator(world, viewer).cell();
    let treasures: Vec<CellCoord> = query::treasures(world)
        .iter()
        .filter(|treasure| !treasure.is_collected())
        .map(|treasure| treasure.cell())
        .collect();

    let mut out = String::new();
    for row in (0..board.rows()).rev() {
        for column in 0..board.columns() {
            let cell = CellCoord::new(column, row);
            let glyph = if cell == own {
                token(viewer)
            } else if cell == guess {
                '?'
            } else if treasures.contains(&cell) {
                '$'
            } else if board.is_passable(cell) {
                '.'
            } else {
                '#'
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// Renders a move history as arrows.
pub(crate) fn arrows(moves: &[MoveRecord]) -> String {
    if moves.is_empty() {
        return "(none)".to_owned();
    }
    moves
        .iter()
        .map(|record| record.direction().arrow().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn status(world: &World) -> String {
    let state = query::turn_state(world);
    let mut line = format!(
        "round {}: {} to move, {} of {} steps taken",
        state.round,
        state.active_role.label(),
        state.steps_taken,
        state.steps_allowed
    );
    let budget = query::lie_budget(world);
    if state.active_role == budget.deceiver {
        let _ = write!(
            line,
            ", lies {}/{} this game",
            budget.total_used, budget.max_total
        );
        if query::lie_available(world) {
            line.push_str(" (lie ready)");
        }
    }
    if state.active_role == Role::Robber {
        let _ = write!(
            line,
            ", treasure {} collected, {} left",
            query::player(world, Role::Robber).collected_coins(),
            query::remaining_treasures(world)
        );
    }
    line
}

/// Describes an event for the players, or `None` for bookkeeping events.
pub(crate) fn describe(event: &Event) -> Option<String> {
    let text = match event {
        Event::SessionStarted {
            active_role,
            steps_allowed,
            ..
        } => format!(
            "new game: {} moves first with {steps_allowed} steps",
            active_role.label()
        ),
        Event::TimeAdvanced { .. } | Event::PlayerSettled { .. } => return None,
        Event::PlayerMoved { .. } => "step taken".to_owned(),
        Event::MoveRejected { reason, .. } => format!("cannot move: {}", move_reason(*reason)),
        Event::TreasureCollected {
            collected_coins, ..
        } => format!("treasure collected ({collected_coins} so far)"),
        Event::IndicatorMoved { cell, .. } => {
            format!("marker moved to ({}, {})", cell.column(), cell.row())
        }
        Event::IndicatorRejected { reason, .. } => {
            format!("cannot move marker: {}", move_reason(*reason))
        }
        Event::LieArmed { .. } => "lie armed, choose a direction with `fake <dir>`".to_owned(),
        Event::LieSelected {
            direction,
            total_used,
            max_total,
            ..
        } => format!(
            "your next move will be shown as {} ({total_used}/{max_total} lies used)",
            direction.arrow()
        ),
        Event::LieCancelled { .. } => "lie cancelled".to_owned(),
        Event::LieConsumed { recorded, .. } => {
            format!("the history shows {} instead", recorded.arrow())
        }
        Event::LieRejected { reason, .. } => format!("cannot lie: {}", lie_reason(*reason)),
        Event::TurnEndRejected { reason } => match reason {
            TurnEndError::GameOver => "the game is over".to_owned(),
            TurnEndError::StepsRemaining { taken, allowed } => {
                format!("take every step first ({taken}/{allowed})")
            }
        },
        Event::TurnChanged {
            round,
            active_role,
            steps_allowed,
            revealed,
        } => {
            let role = active_role.label();
            format!(
                "{HAND_OVER}--- round {round}: pass the device to the {role} ---\n\
                 {role} rolled {steps_allowed} steps\n\
                 opponent moved: {}",
                arrows(revealed)
            )
        }
        Event::GameOver { outcome } => match outcome.reason {
            VictoryReason::Caught => {
                format!("{} wins: the robber was caught", outcome.winner.label())
            }
            VictoryReason::TreasureCleared => {
                format!("{} wins: every treasure collected", outcome.winner.label())
            }
        },
        Event::RestartRejected => "restart failed, keeping the current game".to_owned(),
    };
    Some(text)
}

fn token(role: Role) -> char {
    match role {
        Role::Robber => 'R',
        Role::Cop => 'C',
    }
}

fn move_reason(reason: MoveError) -> &'static str {
    match reason {
        MoveError::GameOver => "the game is over",
        MoveError::NotYourTurn => "not your turn",
        MoveError::Settling => "still moving",
        MoveError::NoStepsRemaining => "no steps left, type `end`",
        MoveError::Blocked => "blocked",
        MoveError::TreasureGuarded => "the cop may not finish on treasure",
    }
}

fn lie_reason(reason: LieError) -> &'static str {
    match reason {
        LieError::GameOver => "the game is over",
        LieError::NotYourTurn => "not your turn",
        LieError::NotDeceivingRole => "only the deceiver may lie",
        LieError::NoStepsRemaining => "no steps left",
        LieError::BudgetExhausted => "no lies left",
        LieError::AlreadyActive => "a lie is already in progress",
        LieError::NotArming => "start a lie with `lie` first",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cop_and_robber_core::{BoardLayout, Direction, GameConfig, SessionLayout};

    #[test]
    fn board_shows_only_the_viewer_and_its_guess() {
        let layout = SessionLayout::new(
            BoardLayout::new(5, 4, 1.0, vec![CellCoord::new(3, 1)]),
            CellCoord::new(1, 1),
            CellCoord::new(3, 2),
            vec![CellCoord::new(2, 2)],
            0,
        );
        let world = World::new(GameConfig::default(), &layout).expect("valid layout");

        assert_eq!(board(&world, Role::Robber), "#####\n#.$?#\n#R.##\n#####\n");
        assert_eq!(board(&world, Role::Cop), "#####\n#.$C#\n#?.##\n#####\n");
    }

    #[test]
    fn arrows_follow_history_order() {
        let moves = [
            MoveRecord::new(Role::Robber, Direction::Up),
            MoveRecord::new(Role::Robber, Direction::Left),
        ];
        assert_eq!(arrows(&moves), "↑ ←");
        assert_eq!(arrows(&[]), "(none)");
    }

    #[test]
    fn hand_over_hides_the_previous_turn() {
        let moved = describe(&Event::PlayerMoved {
            role: Role::Robber,
            from: CellCoord::new(3, 3),
            to: CellCoord::new(3, 4),
        })
        .expect("moves are announced");
        assert!(!moved.contains('3') && !moved.contains('4'), "{moved}");

        let hand_over = describe(&Event::TurnChanged {
            round: 2,
            active_role: Role::Cop,
            steps_allowed: 2,
            revealed: vec![MoveRecord::new(Role::Robber, Direction::Left)],
        })
        .expect("hand-overs are announced");
        assert!(hand_over.starts_with(HAND_OVER));
        assert!(hand_over.ends_with("opponent moved: ←"));
    }

    #[test]
    fn status_reports_lies_and_treasure() {
        let layout = SessionLayout::new(
            BoardLayout::new(6, 6, 1.0, Vec::new()),
            CellCoord::new(1, 1),
            CellCoord::new(4, 4),
            vec![CellCoord::new(1, 2), CellCoord::new(4, 1)],
            0,
        );
        let world = World::new(GameConfig::default(), &layout).expect("valid layout");
        assert_eq!(
            status(&world),
            format!(
                "round 1: Robber to move, 0 of {} steps taken, lies 0/3 this game (lie ready), \
                 treasure 0 collected, 2 left",
                query::turn_state(&world).steps_allowed
            )
        );
    }

    #[test]
    fn bookkeeping_events_are_silent() {
        assert_eq!(describe(&Event::PlayerSettled { role: Role::Cop }), None);
        assert!(describe(&Event::RestartRejected).is_some());
    }
}
