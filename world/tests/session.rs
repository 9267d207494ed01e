use cop_and_robber_core::{
    BoardLayout, CellCoord, Command, Direction, Event, GameConfig, GameOutcome, LieError,
    MoveError, Role, SessionLayout, TurnConfig, TurnEndError, VictoryReason,
};
use cop_and_robber_world::{apply, query, World, WorldError};

fn config(steps: u32) -> GameConfig {
    GameConfig {
        turns: TurnConfig {
            min_steps: steps,
            max_steps: steps,
        },
        settle_delay_ms: 0,
        ..GameConfig::default()
    }
}

fn layout(robber: CellCoord, cop: CellCoord, treasures: Vec<CellCoord>) -> SessionLayout {
    SessionLayout::new(
        BoardLayout::new(8, 8, 1.0, vec![CellCoord::new(5, 5)]),
        robber,
        cop,
        treasures,
        21,
    )
}

fn run(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        apply(world, command, &mut events);
    }
    events
}

fn step(role: Role, direction: Direction) -> Command {
    Command::MovePlayer { role, direction }
}

#[test]
fn robber_wins_by_collecting_every_treasure() {
    let mut world = World::new(
        config(2),
        &layout(
            CellCoord::new(1, 1),
            CellCoord::new(6, 6),
            vec![CellCoord::new(2, 1), CellCoord::new(3, 1)],
        ),
    )
    .expect("valid layout");

    let events = run(
        &mut world,
        [step(Role::Robber, Direction::Right), step(Role::Robber, Direction::Right)],
    );

    assert!(events.contains(&Event::TreasureCollected {
        cell: CellCoord::new(3, 1),
        collected_coins: 2,
    }));
    let expected = GameOutcome {
        winner: Role::Robber,
        reason: VictoryReason::TreasureCleared,
    };
    assert_eq!(events.last(), Some(&Event::GameOver { outcome: expected }));
    assert_eq!(query::outcome(&world), Some(expected));
    assert_eq!(query::remaining_treasures(&world), 0);
    assert_eq!(query::player(&world, Role::Robber).collected_coins(), 2);

    let events = run(&mut world, [Command::EndTurn]);
    assert_eq!(
        events,
        vec![Event::TurnEndRejected {
            reason: TurnEndError::GameOver
        }]
    );
}

#[test]
fn cop_wins_by_reaching_the_robber() {
    let mut world = World::new(
        config(1),
        &layout(
            CellCoord::new(2, 2),
            CellCoord::new(2, 4),
            vec![CellCoord::new(6, 1)],
        ),
    )
    .expect("valid layout");

    let events = run(
        &mut world,
        [
            step(Role::Robber, Direction::Up),
            Command::EndTurn,
            step(Role::Cop, Direction::Down),
        ],
    );

    assert_eq!(
        events.last(),
        Some(&Event::GameOver {
            outcome: GameOutcome {
                winner: Role::Cop,
                reason: VictoryReason::Caught,
            }
        })
    );

    let events = run(
        &mut world,
        [
            step(Role::Cop, Direction::Down),
            Command::BeginLie { role: Role::Cop },
        ],
    );
    assert_eq!(
        events,
        vec![
            Event::MoveRejected {
                role: Role::Cop,
                direction: Direction::Down,
                reason: MoveError::GameOver,
            },
            Event::LieRejected {
                role: Role::Cop,
                reason: LieError::GameOver,
            },
        ]
    );
}

#[test]
fn robber_walking_into_the_cop_is_caught() {
    let mut world = World::new(
        config(1),
        &layout(
            CellCoord::new(2, 2),
            CellCoord::new(3, 2),
            vec![CellCoord::new(6, 1)],
        ),
    )
    .expect("valid layout");

    let events = run(&mut world, [step(Role::Robber, Direction::Right)]);
    assert!(matches!(
        events.last(),
        Some(Event::GameOver {
            outcome: GameOutcome {
                winner: Role::Cop,
                ..
            }
        })
    ));
}

#[test]
fn cop_final_step_may_not_land_on_treasure_when_guarded() {
    let mut guarded = config(1);
    guarded.cop_final_step_guards_treasure = true;
    let session = layout(
        CellCoord::new(1, 1),
        CellCoord::new(4, 3),
        vec![CellCoord::new(4, 2)],
    );

    let mut world = World::new(guarded, &session).expect("valid layout");
    let events = run(
        &mut world,
        [
            step(Role::Robber, Direction::Up),
            Command::EndTurn,
            step(Role::Cop, Direction::Down),
        ],
    );
    assert_eq!(
        events.last(),
        Some(&Event::MoveRejected {
            role: Role::Cop,
            direction: Direction::Down,
            reason: MoveError::TreasureGuarded,
        })
    );

    let mut world = World::new(config(1), &session).expect("valid layout");
    let events = run(
        &mut world,
        [
            step(Role::Robber, Direction::Up),
            Command::EndTurn,
            step(Role::Cop, Direction::Down),
        ],
    );
    assert!(matches!(events.last(), Some(Event::PlayerMoved { .. })));
    assert_eq!(query::remaining_treasures(&world), 1);
}

#[test]
fn invalid_layouts_are_refused() {
    let blocked = layout(CellCoord::new(5, 5), CellCoord::new(2, 2), Vec::new());
    assert_eq!(
        World::new(config(1), &blocked).err(),
        Some(WorldError::BlockedSpawn {
            role: Role::Robber,
            cell: CellCoord::new(5, 5),
        })
    );

    let shared = layout(CellCoord::new(2, 2), CellCoord::new(2, 2), Vec::new());
    assert_eq!(
        World::new(config(1), &shared).err(),
        Some(WorldError::SharedSpawn(CellCoord::new(2, 2)))
    );

    let on_wall = layout(
        CellCoord::new(2, 2),
        CellCoord::new(3, 3),
        vec![CellCoord::new(0, 3)],
    );
    assert_eq!(
        World::new(config(1), &on_wall).err(),
        Some(WorldError::InvalidTreasure(CellCoord::new(0, 3)))
    );
}

#[test]
fn restart_matches_a_fresh_session() {
    let first = layout(
        CellCoord::new(1, 1),
        CellCoord::new(6, 6),
        vec![CellCoord::new(2, 1), CellCoord::new(6, 1)],
    );
    let mut world = World::new(config(2), &first).expect("valid layout");

    let _ = run(
        &mut world,
        [
            Command::BeginLie { role: Role::Robber },
            Command::SelectLieDirection {
                role: Role::Robber,
                direction: Direction::Down,
            },
            step(Role::Robber, Direction::Right),
            step(Role::Robber, Direction::Up),
            Command::EndTurn,
            step(Role::Cop, Direction::Left),
            Command::MoveIndicator {
                role: Role::Cop,
                direction: Direction::Up,
            },
        ],
    );

    let second = SessionLayout::new(
        BoardLayout::new(8, 8, 1.0, vec![CellCoord::new(3, 3), CellCoord::new(3, 4)]),
        CellCoord::new(1, 6),
        CellCoord::new(6, 1),
        vec![CellCoord::new(4, 4)],
        99,
    );
    let events = run(
        &mut world,
        [Command::RestartGame {
            layout: second.clone(),
        }],
    );
    let fresh = World::new(config(2), &second).expect("valid layout");

    assert!(matches!(
        events.as_slice(),
        [Event::SessionStarted {
            round: 1,
            active_role: Role::Robber,
            steps_allowed: 2,
        }]
    ));
    assert_eq!(query::board(&world), query::board(&fresh));
    assert_eq!(query::turn_state(&world), query::turn_state(&fresh));
    assert_eq!(query::lie_budget(&world), query::lie_budget(&fresh));
    for role in Role::ALL {
        assert!(query::moves_for(&world, role).is_empty());
        assert_eq!(query::player(&world, role), query::player(&fresh, role));
        assert_eq!(query::indicator(&world, role), query::indicator(&fresh, role));
    }
    assert!(query::revealed_moves(&world).is_empty());
    assert_eq!(query::treasures(&world), query::treasures(&fresh));
    assert_eq!(query::outcome(&world), None);
}

#[test]
fn restart_with_bad_layout_keeps_current_session() {
    let session = layout(CellCoord::new(1, 1), CellCoord::new(6, 6), Vec::new());
    let mut world = World::new(config(2), &session).expect("valid layout");
    let _ = run(&mut world, [step(Role::Robber, Direction::Up)]);

    let broken = SessionLayout::new(
        BoardLayout::new(2, 2, 1.0, Vec::new()),
        CellCoord::new(1, 1),
        CellCoord::new(1, 1),
        Vec::new(),
        0,
    );
    let events = run(&mut world, [Command::RestartGame { layout: broken }]);

    assert_eq!(events, vec![Event::RestartRejected]);
    assert_eq!(query::player(&world, Role::Robber).cell(), CellCoord::new(1, 2));
    assert_eq!(query::turn_state(&world).steps_taken, 1);
}
