//! Persisting a match to disk and rebuilding it from the stored files.

use std::sync::Arc;

use skirmish_core::{
    Command, FighterClass, FoodSource, Game, GameConfig, GameSnapshot, Position, TeamId,
    TeamSetup, UnitId,
};
use skirmish_runtime::repository::{FileSnapshotStore, FileTurnLog};
use skirmish_runtime::{
    InMemorySnapshotStore, InMemoryTurnLog, ReplayError, Runtime, RuntimeConfig, RuntimeError,
    SnapshotRepository, TurnLogRepository, replay,
};
use tempfile::TempDir;

fn new_game() -> (Game, UnitId) {
    let config = GameConfig::default().with_starting_food(40);
    let mut game = Game::with_config(&config);
    let red_hq = game
        .add_team(TeamSetup::from_config(TeamId(0), Position::new(0, 0), &config))
        .unwrap();
    game.add_team(TeamSetup::from_config(TeamId(1), Position::new(8, 8), &config))
        .unwrap();
    game.add_food_source(FoodSource::new(Position::new(3, 0), 20))
        .unwrap();
    (game, red_hq)
}

/// Spawns units, walks a citizen to the food and back.
///
/// Ids are handed out in order (HQs take 0 and 1), and spawns fill the HQ
/// footprint column by column.
fn script(red_hq: UnitId) -> Vec<Vec<Command>> {
    let citizen = UnitId(2);
    let cavalry = UnitId(3);
    vec![
        vec![
            Command::spawn_citizen(red_hq),
            Command::spawn_fighter(red_hq, FighterClass::Cavalry),
        ],
        vec![
            Command::move_to(citizen, Position::new(1, 0)),
            Command::move_to(cavalry, Position::new(2, 1)),
        ],
        vec![
            Command::move_to(citizen, Position::new(2, 0)),
            Command::pick_up_food(citizen),
        ],
        vec![
            Command::move_to(citizen, Position::new(1, 0)),
            // Out of range: recorded as a failure and replayed as one.
            Command::attack(cavalry, Position::new(9, 9)),
        ],
        vec![Command::drop_off_food(citizen)],
    ]
}

#[tokio::test]
async fn file_backed_match_rebuilds_to_the_same_state() {
    let temp_dir = TempDir::new().unwrap();
    let (game, red_hq) = new_game();

    let runtime = Runtime::builder()
        .initial_game(game)
        .config(RuntimeConfig::default().with_data_dir(temp_dir.path()))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    for commands in script(red_hq) {
        handle.execute_turn(commands).await.unwrap();
    }
    let live = handle.game().await.unwrap();
    runtime.shutdown().await.unwrap();
    assert_eq!(live.team(TeamId(0)).unwrap().food_count, 25);

    let snapshot =
        FileSnapshotStore::read_file(temp_dir.path().join("snapshots").join("snapshot_0.json"))
            .unwrap();
    let records = FileTurnLog::read_file(temp_dir.path().join(FileTurnLog::DEFAULT_FILENAME))
        .unwrap();
    assert_eq!(records.len(), 5);

    let rebuilt = replay::rebuild(snapshot, &records).unwrap();

    assert_eq!(rebuilt.turn(), 5);
    assert_eq!(rebuilt.state_root(), live.state_root());
    assert_eq!(rebuilt.history(), live.history());
}

#[tokio::test]
async fn restore_latest_resumes_from_the_newest_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let (game, red_hq) = new_game();

    let runtime = Runtime::builder()
        .initial_game(game)
        .config(
            RuntimeConfig::default()
                .with_data_dir(temp_dir.path())
                .with_snapshot_interval(3),
        )
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    for commands in script(red_hq) {
        handle.execute_turn(commands).await.unwrap();
    }
    let live = handle.game().await.unwrap();
    runtime.shutdown().await.unwrap();

    let snapshots = FileSnapshotStore::new(temp_dir.path().join("snapshots")).unwrap();
    assert_eq!(snapshots.list_turns().unwrap(), vec![0, 3]);
    let log = FileTurnLog::open_or_create(temp_dir.path(), FileTurnLog::DEFAULT_FILENAME).unwrap();

    let restored = replay::restore_latest(&snapshots, &log).unwrap();

    assert_eq!(restored.turn(), 5);
    assert_eq!(restored.state_root(), live.state_root());
    // Only the turns after the snapshot are in the restored history.
    assert!(restored.history().actions(1).is_empty());
    assert_eq!(restored.history().actions(4), live.history().actions(4));
}

#[tokio::test]
async fn tampered_log_is_detected() {
    let (game, red_hq) = new_game();
    let log = InMemoryTurnLog::new();
    let snapshots = Arc::new(InMemorySnapshotStore::new());

    let runtime = Runtime::builder()
        .initial_game(game)
        .turn_log(log.clone())
        .snapshot_store(snapshots.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    for commands in script(red_hq).into_iter().take(2) {
        handle.execute_turn(commands).await.unwrap();
    }
    runtime.shutdown().await.unwrap();

    let mut records = log.read_all().unwrap();
    records[1].state_root = "00".repeat(32);
    let snapshot = snapshots.load(0).unwrap().unwrap();

    let result = replay::rebuild(snapshot, &records);

    assert!(matches!(result, Err(ReplayError::Diverged { turn: 1, .. })));
}

#[test]
fn restore_without_snapshot_fails() {
    let snapshots = InMemorySnapshotStore::new();
    let log = InMemoryTurnLog::new();

    let result = replay::restore_latest(&snapshots, &log);

    assert!(matches!(result, Err(ReplayError::NoSnapshot)));
}

#[tokio::test]
async fn replayed_kill_removes_the_unit() {
    let (mut game, _) = new_game();
    let cavalry = game
        .add_fighter(TeamId(0), FighterClass::Cavalry, Position::new(4, 4))
        .unwrap();
    let archer = game
        .add_fighter(TeamId(1), FighterClass::Ranged, Position::new(4, 5))
        .unwrap();
    let log = InMemoryTurnLog::new();
    let snapshots = Arc::new(InMemorySnapshotStore::new());

    let runtime = Runtime::builder()
        .initial_game(game)
        .turn_log(log.clone())
        .snapshot_store(snapshots.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let hit = handle
        .execute_turn(vec![Command::attack(cavalry, Position::new(4, 5))])
        .await
        .unwrap();
    let kill = handle
        .execute_turn(vec![Command::attack(cavalry, Position::new(4, 5))])
        .await
        .unwrap();
    let live = handle.game().await.unwrap();
    runtime.shutdown().await.unwrap();
    assert_eq!((hit.successes(), kill.successes()), (1, 1));
    assert!(!live.lookup().contains(archer));

    let rebuilt = replay::restore_latest(snapshots.as_ref(), &log).unwrap();

    assert!(rebuilt.unit(archer).is_none());
    assert!(!rebuilt.lookup().contains(archer));
    assert_eq!(rebuilt.state_root(), live.state_root());
}

#[tokio::test]
async fn data_dir_of_a_later_match_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let (game, red_hq) = new_game();

    let runtime = Runtime::builder()
        .initial_game(game)
        .config(RuntimeConfig::default().with_data_dir(temp_dir.path()))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    for commands in script(red_hq).into_iter().take(2) {
        handle.execute_turn(commands).await.unwrap();
    }
    runtime.shutdown().await.unwrap();

    let (fresh, _) = new_game();
    let result = Runtime::builder()
        .initial_game(fresh)
        .config(RuntimeConfig::default().with_data_dir(temp_dir.path()))
        .build()
        .await;

    assert!(matches!(
        result,
        Err(RuntimeError::TurnLogAhead { last: 1, turn: 0 })
    ));
    let records = FileTurnLog::read_file(temp_dir.path().join(FileTurnLog::DEFAULT_FILENAME))
        .unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn restored_match_keeps_appending_to_its_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    let (game, red_hq) = new_game();
    let mut turns = script(red_hq).into_iter();

    let runtime = Runtime::builder()
        .initial_game(game)
        .config(RuntimeConfig::default().with_data_dir(temp_dir.path()))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    for commands in turns.by_ref().take(3) {
        handle.execute_turn(commands).await.unwrap();
    }
    runtime.shutdown().await.unwrap();

    let resumed = replay::restore_saved(temp_dir.path()).unwrap();
    assert_eq!(resumed.turn(), 3);

    let runtime = Runtime::builder()
        .initial_game(resumed)
        .config(RuntimeConfig::default().with_data_dir(temp_dir.path()))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    for commands in turns {
        handle.execute_turn(commands).await.unwrap();
    }
    let live = handle.game().await.unwrap();
    runtime.shutdown().await.unwrap();
    assert_eq!(live.team(TeamId(0)).unwrap().food_count, 25);

    let snapshots = FileSnapshotStore::open(temp_dir.path().join(FileSnapshotStore::DIR_NAME))
        .unwrap();
    assert_eq!(snapshots.list_turns().unwrap(), vec![0, 3]);

    let restored = replay::restore_saved(temp_dir.path()).unwrap();
    assert_eq!(restored.turn(), 5);
    assert_eq!(restored.state_root(), live.state_root());
}

#[tokio::test]
async fn snapshots_of_another_match_are_replaced() {
    let (game, _) = new_game();
    let initial = game.to_snapshot();
    let snapshots = Arc::new(InMemorySnapshotStore::new());
    let foreign = Game::new(4, 4).to_snapshot();
    snapshots.save(&foreign).unwrap();
    snapshots
        .save(&GameSnapshot {
            turn: 5,
            ..foreign.clone()
        })
        .unwrap();

    let runtime = Runtime::builder()
        .initial_game(game)
        .snapshot_store(snapshots.clone())
        .build()
        .await
        .unwrap();
    runtime.shutdown().await.unwrap();

    assert_eq!(snapshots.list_turns().unwrap(), vec![0]);
    assert_eq!(snapshots.load(0).unwrap(), Some(initial));
}

#[test]
fn restore_saved_leaves_an_empty_dir_untouched() {
    let temp_dir = TempDir::new().unwrap();

    let result = replay::restore_saved(temp_dir.path());

    assert!(matches!(result, Err(ReplayError::Repository(_))));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}
