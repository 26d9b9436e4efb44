//! End-to-end tests driving the runtime through its handle.

use skirmish_core::{
    ActionResponse, Command, FighterClass, Game, GameConfig, Position, TeamId, TeamSetup, UnitId,
};
use skirmish_runtime::{
    Event, GameStateEvent, IdleProvider, InMemorySnapshotStore, InMemoryTurnLog, Runtime,
    RuntimeConfig, RuntimeError, ScriptedProvider, SnapshotRepository, Topic, TurnEvent,
    TurnLogRepository,
};

struct Setup {
    game: Game,
    red_hq: UnitId,
    blue_hq: UnitId,
}

/// Red HQ in the top-left corner, blue HQ (fragile) in the bottom-right.
fn setup(food: u32) -> Setup {
    let config = GameConfig::default().with_starting_food(food);
    let mut game = Game::with_config(&config);
    let red_hq = game
        .add_team(TeamSetup::from_config(TeamId(0), Position::new(0, 0), &config))
        .unwrap();
    let mut blue = TeamSetup::from_config(TeamId(1), Position::new(8, 8), &config);
    blue.settings.hq.base_hp = 4;
    let blue_hq = game.add_team(blue).unwrap();
    Setup {
        game,
        red_hq,
        blue_hq,
    }
}

#[tokio::test]
async fn execute_turn_returns_record_and_updates_game() {
    let Setup { game, red_hq, .. } = setup(20);
    let runtime = Runtime::builder().initial_game(game).build().await.unwrap();
    let handle = runtime.handle();

    let record = handle
        .execute_turn(vec![Command::spawn_citizen(red_hq)])
        .await
        .unwrap();

    assert_eq!(record.turn, 0);
    assert_eq!(record.successes(), 1);
    let Some(ActionResponse::Spawned(spawned)) = &record.actions[0].response else {
        panic!("expected spawn response, got {:?}", record.actions[0]);
    };
    assert_eq!(spawned.food_count, 15);

    let game = handle.game().await.unwrap();
    assert_eq!(game.turn(), 1);
    assert_eq!(record.state_root, hex::encode(game.state_root()));
    assert_eq!(handle.history(0).await.unwrap(), record.actions);
    assert!(handle.history(7).await.unwrap().is_empty());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn failed_commands_do_not_fail_the_turn() {
    let Setup { game, red_hq, .. } = setup(0);
    let runtime = Runtime::builder().initial_game(game).build().await.unwrap();
    let handle = runtime.handle();
    let before = handle.snapshot().await.unwrap();

    let record = handle
        .execute_turn(vec![
            Command::spawn_citizen(red_hq),
            Command::move_to(UnitId(42), Position::new(1, 1)),
        ])
        .await
        .unwrap();

    assert_eq!(record.actions.len(), 2);
    assert_eq!(record.successes(), 0);
    let after = handle.snapshot().await.unwrap();
    assert_eq!(after.teams, before.teams);
    assert_eq!(after.turn, before.turn + 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn turn_events_are_published() {
    let Setup { game, red_hq, .. } = setup(5);
    let runtime = Runtime::builder().initial_game(game).build().await.unwrap();
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);

    handle
        .execute_turn(vec![Command::spawn_citizen(red_hq)])
        .await
        .unwrap();

    let Event::Turn(TurnEvent::Executed { turn, actions }) = turns.recv().await.unwrap() else {
        panic!("expected an executed turn event");
    };
    assert_eq!(turn, 0);
    assert_eq!(actions.len(), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn destroying_an_hq_defeats_the_team_and_ends_the_match() {
    let Setup {
        mut game, blue_hq, ..
    } = setup(0);
    let infantry = game
        .add_fighter(TeamId(0), FighterClass::Infantry, Position::new(7, 8))
        .unwrap();
    let runtime = Runtime::builder().initial_game(game).build().await.unwrap();
    let handle = runtime.handle();
    let mut state_events = handle.subscribe(Topic::GameState);

    let record = handle
        .execute_turn(vec![Command::attack(infantry, Position::new(8, 8))])
        .await
        .unwrap();
    assert_eq!(record.successes(), 1);

    let mut received = Vec::new();
    for _ in 0..3 {
        let Event::GameState(event) = state_events.recv().await.unwrap() else {
            panic!("unexpected topic");
        };
        received.push(event);
    }

    assert!(matches!(
        &received[0],
        GameStateEvent::UnitKilled { turn: 0, unit } if unit.id() == blue_hq
    ));
    assert_eq!(
        received[1],
        GameStateEvent::TeamDefeated {
            turn: 0,
            team: TeamId(1)
        }
    );
    assert_eq!(
        received[2],
        GameStateEvent::GameWon {
            turn: 0,
            team: TeamId(0)
        }
    );
    assert_eq!(handle.game().await.unwrap().winner(), Some(TeamId(0)));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn step_collects_commands_from_every_provider() {
    let Setup {
        game,
        red_hq,
        blue_hq,
    } = setup(10);
    let mut runtime = Runtime::builder()
        .initial_game(game)
        .provider(TeamId(1), ScriptedProvider::new([vec![Command::spawn_citizen(blue_hq)]]))
        .provider(TeamId(0), ScriptedProvider::new([vec![Command::spawn_citizen(red_hq)]]))
        .build()
        .await
        .unwrap();

    let record = runtime.step().await.unwrap();

    // Team order, not registration order.
    assert_eq!(record.actions.len(), 2);
    assert_eq!(record.actions[0].unit.id, red_hq);
    assert_eq!(record.actions[1].unit.id, blue_hq);
    assert_eq!(record.successes(), 2);

    let record = runtime.step().await.unwrap();
    assert!(record.actions.is_empty());
    assert_eq!(record.turn, 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn step_drops_commands_for_units_of_other_teams() {
    let Setup {
        game,
        red_hq,
        blue_hq,
    } = setup(10);
    let mut runtime = Runtime::builder()
        .initial_game(game)
        .provider(
            TeamId(1),
            ScriptedProvider::new([vec![
                Command::spawn_citizen(red_hq),
                Command::spawn_citizen(blue_hq),
                Command::move_to(UnitId(99), Position::new(1, 1)),
            ]]),
        )
        .build()
        .await
        .unwrap();

    let record = runtime.step().await.unwrap();

    assert_eq!(record.actions.len(), 2);
    assert_eq!(record.actions[0].unit.id, blue_hq);
    assert_eq!(record.actions[1].unit.id, UnitId(99));
    assert_eq!(record.successes(), 1);
    let game = runtime.handle().game().await.unwrap();
    assert_eq!(game.team(TeamId(0)).unwrap().pop(), 0);
    assert_eq!(game.team(TeamId(0)).unwrap().food_count, 10);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn run_until_winner_stops_at_the_turn_limit() {
    let Setup { game, .. } = setup(0);
    let mut runtime = Runtime::builder()
        .initial_game(game)
        .provider(TeamId(0), IdleProvider)
        .provider(TeamId(1), IdleProvider)
        .build()
        .await
        .unwrap();

    let winner = runtime.run_until_winner(3).await.unwrap();

    assert_eq!(winner, None);
    assert_eq!(runtime.handle().game().await.unwrap().turn(), 3);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn step_without_providers_is_an_error() {
    let Setup { game, .. } = setup(0);
    let mut runtime = Runtime::builder().initial_game(game).build().await.unwrap();

    assert!(matches!(runtime.step().await, Err(RuntimeError::NoProviders)));
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn build_requires_an_initial_game() {
    let result = Runtime::builder().build().await;

    assert!(matches!(result, Err(RuntimeError::MissingInitialGame)));
}

#[tokio::test]
async fn import_turn_rejects_the_wrong_turn_and_keeps_state() {
    let Setup { game, red_hq, .. } = setup(10);
    let mut source = game.clone();
    let actions = source.execute_turn([Command::spawn_citizen(red_hq)]);

    let runtime = Runtime::builder().initial_game(game).build().await.unwrap();
    let handle = runtime.handle();
    let before = handle.snapshot().await.unwrap();

    let result = handle.import_turn(5, actions.clone()).await;
    assert!(matches!(result, Err(RuntimeError::Import(_))));
    assert_eq!(handle.snapshot().await.unwrap(), before);

    handle.import_turn(0, actions).await.unwrap();
    assert_eq!(
        handle.game().await.unwrap().state_root(),
        source.state_root()
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn turns_are_persisted_with_snapshots_at_the_interval() {
    let Setup { game, red_hq, .. } = setup(10);
    let log = InMemoryTurnLog::new();
    let snapshots = std::sync::Arc::new(InMemorySnapshotStore::new());

    let runtime = Runtime::builder()
        .initial_game(game)
        .config(RuntimeConfig::default().with_snapshot_interval(2))
        .turn_log(log.clone())
        .snapshot_store(snapshots.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle
        .execute_turn(vec![Command::spawn_citizen(red_hq)])
        .await
        .unwrap();
    handle.execute_turn(Vec::new()).await.unwrap();
    handle.execute_turn(Vec::new()).await.unwrap();
    runtime.shutdown().await.unwrap();

    assert_eq!(log.len(), 3);
    assert_eq!(log.last_turn(), Some(2));
    assert_eq!(snapshots.list_turns().unwrap(), vec![0, 2]);
}
