//! Pass-and-play session state for the terminal.

use anyhow::{Context, Result};
use cop_and_robber_core::{Command, Event, Role};
use cop_and_robber_system_bootstrap::Bootstrap;
use cop_and_robber_system_siren::{Siren, SirenSignal};
use cop_and_robber_world::{apply, query, World};

use crate::{
    input::{parse_action, Action, HELP},
    render,
};

/// Whether the loop should keep reading input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub(crate) struct Session {
    bootstrap: Bootstrap,
    world: World,
    siren: Siren,
}

impl Session {
    pub(crate) fn start(mut bootstrap: Bootstrap) -> Result<Self> {
        let world = bootstrap
            .start_session()
            .context("failed to start a session")?;
        Ok(Self {
            bootstrap,
            world,
            siren: Siren::new(),
        })
    }

    pub(crate) fn intro(&self) -> Vec<String> {
        vec![
            query::welcome_banner(&self.world).to_owned(),
            "type `help` for commands".to_owned(),
            render::status(&self.world),
            render::board(&self.world, self.active_role()),
        ]
    }

    pub(crate) fn handle_line(&mut self, line: &str) -> Result<(Flow, Vec<String>)> {
        match parse_action(line) {
            Ok(action) => self.handle(action),
            Err(error) => Ok((Flow::Continue, vec![format!("{error:#}")])),
        }
    }

    fn active_role(&self) -> Role {
        query::turn_state(&self.world).active_role
    }

    fn handle(&mut self, action: Action) -> Result<(Flow, Vec<String>)> {
        let role = self.active_role();
        let command = match action {
            Action::Move(direction) => Command::MovePlayer { role, direction },
            Action::Indicator(direction) => Command::MoveIndicator { role, direction },
            Action::BeginLie => Command::BeginLie { role },
            Action::Fake(direction) => Command::SelectLieDirection { role, direction },
            Action::CancelLie => Command::CancelLie { role },
            Action::EndTurn => Command::EndTurn,
            Action::Restart => self
                .bootstrap
                .restart_command()
                .context("failed to generate a new board")?,
            Action::Board => return Ok((Flow::Continue, vec![render::board(&self.world, role)])),
            Action::History => {
                let own = render::arrows(&query::moves_for(&self.world, role));
                let seen = render::arrows(query::revealed_moves(&self.world));
                return Ok((
                    Flow::Continue,
                    vec![
                        format!("your moves this turn: {own}"),
                        format!("opponent's last turn: {seen}"),
                    ],
                ));
            }
            Action::Status => return Ok((Flow::Continue, vec![render::status(&self.world)])),
            Action::Help => return Ok((Flow::Continue, vec![HELP.to_owned()])),
            Action::Quit => return Ok((Flow::Quit, vec!["bye".to_owned()])),
        };

        let is_restart = matches!(command, Command::RestartGame { .. });
        let events = self.submit(command);
        let mut messages: Vec<String> = events.iter().filter_map(render::describe).collect();

        if is_restart {
            if let Some(signal) = self.siren.reset() {
                messages.push(siren_message(signal).to_owned());
            }
        }
        if Siren::is_relevant(&events) {
            let board = query::board(&self.world);
            let signal = self.siren.handle(
                query::turn_state(&self.world).active_role,
                query::player(&self.world, Role::Cop).cell(),
                query::player(&self.world, Role::Robber).cell(),
                |from, to| board.has_clear_line_of_sight(from, to),
            );
            if let Some(signal) = signal {
                messages.push(siren_message(signal).to_owned());
            }
        }

        let changed_hands = events
            .iter()
            .any(|event| matches!(event, Event::TurnChanged { .. } | Event::SessionStarted { .. }));
        if changed_hands && query::outcome(&self.world).is_none() {
            messages.push(render::status(&self.world));
            messages.push(render::board(&self.world, self.active_role()));
        }

        Ok((Flow::Continue, messages))
    }

    /// Lets pending move animations finish, then applies the command.
    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        let dt = query::config(&self.world).settle_delay();
        apply(&mut self.world, Command::Tick { dt }, &mut events);
        events.clear();
        apply(&mut self.world, command, &mut events);
        events
    }
}

fn siren_message(signal: SirenSignal) -> &'static str {
    match signal {
        SirenSignal::Started => "*** siren: the cop has a clear line of sight ***",
        SirenSignal::Stopped => "the siren falls silent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cop_and_robber_core::{BoardLayout, CellCoord, GameConfig, SessionLayout, TurnConfig};

    fn session(seed: u64) -> Session {
        let config = GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        };
        Session::start(Bootstrap::new(config).expect("config")).expect("session")
    }

    #[test]
    fn early_end_is_refused_with_a_hint() {
        let mut session = session(17);
        let (flow, messages) = session.handle_line("end").expect("handled");
        assert_eq!(flow, Flow::Continue);
        assert!(messages.iter().any(|m| m.contains("take every step first")));
        assert_eq!(query::turn_state(&session.world).active_role, Role::Robber);
    }

    #[test]
    fn cop_cannot_start_a_lie() {
        let config = GameConfig {
            turns: TurnConfig {
                min_steps: 1,
                max_steps: 1,
            },
            ..GameConfig::default()
        };
        let layout = SessionLayout::new(
            BoardLayout::new(10, 10, 1.0, Vec::new()),
            CellCoord::new(2, 2),
            CellCoord::new(7, 7),
            vec![CellCoord::new(5, 8)],
            0,
        );
        let mut session = Session {
            bootstrap: Bootstrap::new(config.clone()).expect("config"),
            world: World::new(config, &layout).expect("valid layout"),
            siren: Siren::new(),
        };

        let _ = session.handle_line("w").expect("handled");
        assert_eq!(
            query::player(&session.world, Role::Robber).cell(),
            CellCoord::new(2, 3)
        );
        let _ = session.handle_line("end").expect("handled");
        assert_eq!(query::outcome(&session.world), None);
        assert_eq!(session.active_role(), Role::Cop);

        let (_, messages) = session.handle_line("lie").expect("handled");
        assert_eq!(messages, vec!["cannot lie: only the deceiver may lie".to_owned()]);
    }

    #[test]
    fn restart_resets_the_round() {
        let mut session = session(8);
        let (_, messages) = session.handle_line("restart").expect("handled");
        assert!(messages.iter().any(|m| m.starts_with("new game")));
        assert_eq!(query::turn_state(&session.world).round, 1);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut session = session(1);
        let (flow, _) = session.handle_line("quit").expect("handled");
        assert_eq!(flow, Flow::Quit);
    }
}
