//! Integration tests for the game state machine

use std::sync::{Arc, Mutex};

use blockfall::core::GameState;
use blockfall::types::{Direction, GameConfig, DROP_INTERVALS};

fn seeded(seed: u32) -> GameState {
    GameState::new(GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    })
}

/// Hard drop until the stack reaches the spawn rows
fn play_until_game_over(state: &mut GameState) -> usize {
    let mut drops = 0;
    while !state.game_over() {
        assert!(state.hard_drop());
        drops += 1;
        assert!(drops < 500, "game never ended");
    }
    drops
}

#[test]
fn test_game_lifecycle() {
    let state = seeded(12345);
    let snapshot = state.state();

    assert!(snapshot.active.is_some());
    assert!(!snapshot.game_over);
    assert!(!snapshot.paused);
    assert!(snapshot.can_hold);
    assert_eq!(snapshot.hold, None);
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.lines, 0);
    assert_eq!(snapshot.drop_interval_ms, 800);
    assert_eq!(snapshot.board.filled_count(), 0);
}

#[test]
fn test_same_seed_same_sequence() {
    let mut a = seeded(777);
    let mut b = seeded(777);

    for _ in 0..30 {
        assert_eq!(a.active().map(|p| p.kind), b.active().map(|p| p.kind));
        assert_eq!(a.next_piece(), b.next_piece());
        a.hard_drop();
        b.hard_drop();
    }
    assert_eq!(a.board(), b.board());
    assert_eq!(a.score(), b.score());
}

#[test]
fn test_movement_and_soft_drop_scoring() {
    let mut state = seeded(1);
    let start = state.active().unwrap();

    assert!(state.move_piece(Direction::Left));
    assert_eq!(state.active().unwrap().x, start.x - 1);
    assert!(state.move_piece(Direction::Right));
    assert!(state.move_piece(Direction::Right));
    assert_eq!(state.active().unwrap().x, start.x + 1);
    assert_eq!(state.score(), 0);

    assert!(state.move_piece(Direction::Down));
    assert!(state.move_piece(Direction::Down));
    assert_eq!(state.active().unwrap().y, start.y + 2);
    assert_eq!(state.score(), 2);
}

#[test]
fn test_walls_stop_horizontal_moves() {
    let mut state = seeded(2);
    let mut moves = 0;
    while state.move_piece(Direction::Left) {
        moves += 1;
        assert!(moves < 10);
    }
    let x = state.active().unwrap().x;
    let min_x = state
        .active()
        .unwrap()
        .cells()
        .iter()
        .map(|&(cx, _)| cx)
        .min()
        .unwrap();
    assert_eq!(min_x, 0);

    // A refused move changes nothing
    assert!(!state.move_piece(Direction::Left));
    assert_eq!(state.active().unwrap().x, x);
}

#[test]
fn test_hard_drop_scores_two_per_row_and_locks() {
    let mut state = seeded(3);
    let ghost = state.ghost_position().unwrap();
    let active = state.active().unwrap();
    let distance = (ghost.y - active.y) as u32;

    assert!(state.hard_drop());
    assert_eq!(state.score(), distance * 2);
    assert_eq!(state.board().filled_count(), 4);
    assert!(state.active().is_some());
}

#[test]
fn test_down_into_floor_locks_and_spawns() {
    let mut state = seeded(4);
    let distance = state.ghost_y().unwrap() - state.active().unwrap().y;
    for _ in 0..distance {
        assert!(state.move_piece(Direction::Down));
    }
    let next = state.next_piece();

    // Blocked move down locks the piece
    assert!(!state.move_piece(Direction::Down));
    assert_eq!(state.board().filled_count(), 4);
    assert_eq!(state.active().unwrap().kind, next);
    assert_eq!(state.score(), distance as u32);
}

#[test]
fn test_hold_once_per_piece() {
    let mut state = seeded(5);
    let first = state.active().unwrap().kind;
    let queued = state.next_piece();

    assert!(state.hold());
    assert_eq!(state.hold_piece(), Some(first));
    assert_eq!(state.active().unwrap().kind, queued);
    assert!(!state.can_hold());

    // Second hold before locking is refused
    assert!(!state.hold());
    assert_eq!(state.hold_piece(), Some(first));

    state.hard_drop();
    assert!(state.can_hold());
    let current = state.active().unwrap().kind;
    let queued = state.next_piece();

    // Swap leaves the queue alone
    assert!(state.hold());
    assert_eq!(state.hold_piece(), Some(current));
    assert_eq!(state.active().unwrap().kind, first);
    assert_eq!(state.next_piece(), queued);
}

#[test]
fn test_pause_blocks_commands_and_gravity() {
    let mut state = seeded(6);
    let before = state.active().unwrap();

    assert!(state.toggle_pause());
    assert!(state.paused());
    assert!(!state.move_piece(Direction::Left));
    assert!(!state.rotate(true));
    assert!(!state.hard_drop());
    assert!(!state.hold());
    assert!(!state.tick(10_000));
    assert_eq!(state.active().unwrap(), before);

    assert!(state.toggle_pause());
    assert!(!state.paused());
    assert!(state.move_piece(Direction::Down));
}

#[test]
fn test_gravity_follows_level_interval() {
    let mut state = seeded(7);
    let y = state.active().unwrap().y;

    assert!(!state.tick(DROP_INTERVALS[0] - 1));
    assert_eq!(state.active().unwrap().y, y);

    assert!(state.tick(1));
    assert_eq!(state.active().unwrap().y, y + 1);

    // Several periods in one call
    assert!(state.tick(DROP_INTERVALS[0] * 3));
    assert_eq!(state.active().unwrap().y, y + 4);

    // Gravity is free
    assert_eq!(state.score(), 0);
}

#[test]
fn test_initial_level_sets_speed() {
    let state = GameState::new(GameConfig {
        initial_level: 5,
        seed: Some(8),
        ..GameConfig::default()
    });
    assert_eq!(state.level(), 5);
    assert_eq!(state.drop_interval_ms(), DROP_INTERVALS[4]);
    assert_eq!(state.scheduler().interval_ms(), DROP_INTERVALS[4]);
}

#[test]
fn test_game_over_freezes_session() {
    let mut state = seeded(9);
    play_until_game_over(&mut state);

    let snapshot = state.state();
    assert!(snapshot.game_over);
    assert!(snapshot.active.is_none());
    assert!(!snapshot.playable());
    assert!(!state.scheduler().is_running());

    // No command is accepted after game over
    assert!(!state.move_piece(Direction::Down));
    assert!(!state.rotate(false));
    assert!(!state.hard_drop());
    assert!(!state.hold());
    assert!(!state.toggle_pause());
    assert!(!state.tick(60_000));
    assert_eq!(state.state(), snapshot);
}

#[test]
fn test_new_game_resets_but_keeps_callbacks() {
    let mut state = seeded(10);
    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        state.on_state_change(move |snapshot| seen.lock().unwrap().push(snapshot.score));
    }

    play_until_game_over(&mut state);
    assert!(state.score() > 0);

    seen.lock().unwrap().clear();
    state.new_game(Some(GameConfig {
        width: 12,
        height: 24,
        initial_level: 1,
        seed: Some(11),
    }));

    assert!(!state.game_over());
    assert_eq!(state.score(), 0);
    assert_eq!(state.board().width(), 12);
    assert_eq!(state.board().height(), 24);
    assert_eq!(state.board().filled_count(), 0);
    assert_eq!(*seen.lock().unwrap(), vec![0]);
}

#[test]
fn test_new_game_normalizes_config() {
    let mut state = seeded(12);
    state.new_game(Some(GameConfig {
        width: 1,
        height: 200,
        initial_level: 99,
        seed: Some(12),
    }));

    let config = state.config();
    assert_eq!(config.width, 4);
    assert_eq!(config.height, 40);
    assert_eq!(config.initial_level, 20);
    assert_eq!(state.level(), 20);
}

#[test]
fn test_state_change_fires_for_accepted_commands() {
    let mut state = seeded(13);
    let count = Arc::new(Mutex::new(0));
    {
        let count = Arc::clone(&count);
        state.on_state_change(move |_| *count.lock().unwrap() += 1);
    }

    state.move_piece(Direction::Right);
    state.hard_drop();
    state.toggle_pause();
    state.toggle_pause();
    assert_eq!(*count.lock().unwrap(), 4);
}

#[test]
fn test_line_clear_callback_on_narrow_board() {
    // On a 4-wide board every flat I fills the row it lands on
    let cleared = Arc::new(Mutex::new(Vec::new()));
    let mut total_lines = 0;

    for seed in 0..20 {
        let mut state = GameState::new(GameConfig {
            width: 4,
            height: 8,
            initial_level: 1,
            seed: Some(seed),
        });
        {
            let cleared = Arc::clone(&cleared);
            state.on_line_clear(move |n| cleared.lock().unwrap().push(n));
        }
        play_until_game_over(&mut state);
        total_lines += state.lines();
    }

    let cleared = cleared.lock().unwrap();
    assert!(total_lines > 0);
    assert_eq!(cleared.iter().sum::<u32>(), total_lines);
    assert!(cleared.iter().all(|&n| (1..=4).contains(&n)));
}

#[test]
fn test_snapshot_is_detached() {
    let mut state = seeded(14);
    let mut snapshot = state.state();
    snapshot.score = 9999;
    snapshot.board.clear();
    snapshot.active = None;

    assert_eq!(state.score(), 0);
    assert!(state.active().is_some());

    state.hard_drop();
    assert_ne!(state.state(), snapshot);
}

#[test]
fn test_snapshot_serializes() {
    let state = seeded(15);
    let json = serde_json::to_value(state.state()).unwrap();

    assert_eq!(json["score"], 0);
    assert_eq!(json["level"], 1);
    assert_eq!(json["game_over"], false);
    assert_eq!(json["board"]["width"], 10);
    assert_eq!(json["board"]["cells"].as_array().unwrap().len(), 200);
    assert_eq!(json["active"]["cells"].as_array().unwrap().len(), 4);
}
