//! End-to-end sessions driven only through the public surface.

use neori_common::{GameConfig, GameParams, SessionMode, Vec2i};
use neori_engine::{Cell, Food, Fruit, GameOver, GameSession, Intent, Snake};

const CONFIG: &str = r#"
[grid]
width_px = 300
height_px = 200
cell_resolution_px = 10

[timing]
frame_dt_s = 0.1
total_time_s = 30.0
record_interval_s = 1.0

[initial_conditions]
seed = 1234
initial_density = 0.4
initial_infections = 1

[output]
base_filename = "scenario"
save_stats = false
"#;

fn params_from_config() -> GameParams {
    GameConfig::from_toml_str(CONFIG).unwrap().get_game_params().unwrap()
}

fn empty_play_session(cols: u32, rows: u32) -> GameSession {
    let mut params = GameParams::for_grid(cols, rows, 1).unwrap();
    params.initial.initial_density = 0.0;
    params.initial.seed = Some(3);
    GameSession::new(params).unwrap()
}

#[test]
fn same_seed_same_intents_same_session() {
    let script = [
        (0, Intent::ChangeDirection(Vec2i::RIGHT)),
        (12, Intent::ChangeDirection(Vec2i::DOWN)),
        (25, Intent::UseCharge),
        (40, Intent::ChangeDirection(Vec2i::LEFT)),
    ];
    let run = || {
        let mut session = GameSession::new(params_from_config()).unwrap();
        for tick in 0..80 {
            for (_, intent) in script.iter().filter(|(at, _)| *at == tick) {
                session.apply(*intent).unwrap();
            }
            session.tick(0.1);
        }
        serde_json::to_string(&session.snapshot(true)).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn config_seeds_the_world_and_an_infection_ring() {
    let session = GameSession::new(params_from_config()).unwrap();
    assert_eq!(session.size(), (30, 20));
    assert_eq!(session.mode(), SessionMode::Play);
    let counts = session.cell_counts();
    assert!(counts.infected() > 0);
    assert!(counts.healthy() > 0);
    assert_eq!(counts.total(), 30 * 20);
    assert_eq!(session.snake_body().count(), 5);
}

#[test]
fn steering_off_the_edge_ends_the_session() {
    let mut session = empty_play_session(10, 10);
    session.state.snake = Snake::new(Vec2i::new(1, 4), 3);
    session.apply(Intent::ChangeDirection(Vec2i::LEFT)).unwrap();

    session.tick(0.1);
    assert_eq!(session.game_over(), None);
    session.tick(0.1);
    assert_eq!(session.game_over(), Some(GameOver::LeftMap));
    assert_eq!(session.game_over().map(|g| g.to_string()).as_deref(), Some("left the map"));

    // A finished session ignores further ticks and steering
    let ticks = session.tick_count();
    session.tick(0.1);
    assert_eq!(session.tick_count(), ticks);
    assert!(!session.change_direction(Vec2i::UP));

    let snap = session.snapshot(false);
    assert_eq!(snap.game_over.as_deref(), Some("left the map"));
    assert!(snap.cells.is_none());
}

#[test]
fn diagonal_or_long_steering_is_ignored() {
    let mut session = empty_play_session(10, 10);
    session.state.snake = Snake::new(Vec2i::new(4, 4), 2);
    session.apply(Intent::ChangeDirection(Vec2i::DOWN)).unwrap();
    session.apply(Intent::ChangeDirection(Vec2i::new(3, 1))).unwrap();
    assert!(!session.change_direction(Vec2i::new(1, 1)));

    session.tick(0.1);
    assert_eq!(session.state.snake.head(), Vec2i::new(4, 5));
    assert_eq!(session.state.snake.direction(), Vec2i::DOWN);
}

#[test]
fn pause_intent_freezes_everything() {
    let mut session = GameSession::new(params_from_config()).unwrap();
    session.state.snake = Snake::new(Vec2i::new(15, 10), 5);
    session.apply(Intent::ChangeDirection(Vec2i::UP)).unwrap();
    session.tick(0.1);
    let before = serde_json::to_string(&session.snapshot(true)).unwrap();

    session.apply(Intent::TogglePause).unwrap();
    assert!(session.is_paused());
    for _ in 0..20 {
        session.tick(0.1);
    }
    let mut after = session.snapshot(true);
    assert!(after.paused);
    after.paused = false;
    assert_eq!(before, serde_json::to_string(&after).unwrap());

    session.apply(Intent::TogglePause).unwrap();
    session.tick(0.1);
    assert_eq!(session.tick_count(), 2);
}

#[test]
fn menu_runs_without_a_player_and_start_begins_play() {
    let mut session = GameSession::new(params_from_config()).unwrap();
    session.apply(Intent::ReturnToMenu).unwrap();
    assert_eq!(session.mode(), SessionMode::Attract);

    // Attract mode never ends and never moves the snake
    let head = session.state.snake.head();
    assert!(!session.use_charge());
    for _ in 0..300 {
        session.tick(0.1);
    }
    assert_eq!(session.game_over(), None);
    assert_eq!(session.state.snake.head(), head);
    assert!(session.foods().is_empty());

    session.apply(Intent::StartGame).unwrap();
    assert_eq!(session.mode(), SessionMode::Play);
    assert_eq!(session.tick_count(), 0);
    assert_eq!(session.elapsed(), 0.0);
}

#[test]
fn reset_resizes_and_rejects_empty_canvases() {
    let mut session = GameSession::new(params_from_config()).unwrap();
    session
        .apply(Intent::ResetSession { width_px: 400, height_px: 120, resolution_px: 20 })
        .unwrap();
    assert_eq!(session.size(), (20, 6));

    let err = session.apply(Intent::ResetSession { width_px: 10, height_px: 10, resolution_px: 20 });
    assert!(err.is_err());
    assert_eq!(session.size(), (20, 6));
}

#[test]
fn charge_burst_shields_the_head_then_wears_off() {
    let mut session = empty_play_session(30, 30);
    let head = Vec2i::new(5, 5);
    session.state.snake = Snake::new(head, 1);
    session.state.charge = 1.5;
    // A pending food far away keeps the board from being restocked
    session.state.foods.push(Food { pos: Vec2i::new(29, 29), kind: Fruit::Apple });

    session.apply(Intent::UseCharge).unwrap();
    assert!((session.charge() - 0.5).abs() < 1e-6);
    assert_eq!(session.state.world.get(head), Some(Cell::SpawnImmune));

    session.tick(0.1);
    assert_eq!(session.state.world.get(head), Some(Cell::SpawnImmune));
    session.tick(0.1);
    assert_eq!(session.state.world.get(head), Some(Cell::Immune));

    // Swap the crowded burst for a still-life block so only the flame timer acts on it
    session.state.world.set_square_region(Vec2i::new(15, 15), Cell::Dead, 15);
    let block = [Vec2i::new(20, 20), Vec2i::new(21, 20), Vec2i::new(20, 21), Vec2i::new(21, 21)];
    for &pos in &block {
        session.state.world.set_cell(pos, Cell::Immune);
    }

    for _ in 0..4 {
        session.tick(1.0);
        assert!(block.iter().all(|&pos| session.state.world.get(pos) == Some(Cell::Immune)));
    }
    session.tick(1.0);
    assert!(session.events.flames.time() >= 5.0);
    assert!(block.iter().all(|&pos| session.state.world.get(pos) == Some(Cell::Healthy)));
    assert_eq!(session.cell_counts().immune(), 0);
    assert_eq!(session.cell_counts().healthy(), 4);
}
