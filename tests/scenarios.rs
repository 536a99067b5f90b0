//! End-to-end game scenarios through the public API

use snake_rush::consts::*;
use snake_rush::sim::food::FakeFood;
use snake_rush::sim::opponent::Opponent;
use snake_rush::sim::{
    DeathReason, Direction, GameEvent, GameState, OpponentKind, Position, PowerUpKind,
    SequenceRng, TickInput, TriviaPhase, create_new_game, revive_snake, tick,
};
use snake_rush::{GameSession, Settings};

fn new_game(snake: Vec<Position>) -> GameState {
    create_new_game(snake, &mut SequenceRng::constant(0.0))
}

#[test]
fn eats_food_on_first_tick() {
    let mut state = new_game(vec![Position::new(5, 5)]);
    state.food = Position::new(6, 5);
    let next = tick(&state, &TickInput::new(Direction::Right), &mut SequenceRng::constant(0.99));

    assert_eq!(next.food_eaten, 1);
    assert_eq!(next.score, POINTS_PER_FOOD);
    assert_eq!(next.head(), Position::new(6, 5));
    assert!(matches!(next.events.first(), Some(GameEvent::FoodEaten { .. })));
}

#[test]
fn wall_death_keeps_counters() {
    let mut state = new_game(vec![Position::new(0, 0)]);
    state.food = Position::new(10, 10);
    state.food_eaten = 5;
    let next = tick(&state, &TickInput::new(Direction::Left), &mut SequenceRng::constant(0.5));

    assert!(next.game_over);
    assert_eq!(next.food_eaten, 5);
    assert_eq!(next.death_reason, Some(DeathReason::Wall));
    assert_eq!(next.events, vec![GameEvent::Died(DeathReason::Wall)]);
}

#[test]
fn revive_halves_snake() {
    let snake: Vec<Position> = (0..10).map(|i| Position::new(12 - i, 7)).collect();
    let mut state = new_game(snake);
    state.game_over = true;
    state.active_power_ups =
        snake_rush::sim::powerup::activate_power_up(&[], PowerUpKind::Invincibility, 0, 50);

    let revived = revive_snake(&state, &mut SequenceRng::new(vec![0.42, 0.17, 0.88]));
    assert_eq!(revived.snake.len(), 5);
    assert!(!revived.game_over);
    assert!(revived.active_power_ups.is_empty());
    assert!(!revived.snake.contains(&revived.food));
}

#[test]
fn penalties_clamp_score_at_zero() {
    let mut state = new_game(vec![Position::new(5, 5), Position::new(4, 5)]);
    state.food = Position::new(15, 15);
    state.score = 10;
    state.food_eaten = 4;
    state.fake_foods.push(FakeFood {
        position: Position::new(6, 5),
        spawn_tick: 0,
        lifetime: FAKE_FOOD_LIFETIME,
        mimic_index: 2,
    });
    // Police one step from the player after the player's move
    state.police.body = Opponent {
        segments: vec![Position::new(7, 5), Position::new(8, 5)],
        direction: Direction::Left,
        active: true,
        move_timer: 2,
        spawn_cooldown: 0,
        spawned_at: 0,
    };

    let next = tick(&state, &TickInput::new(Direction::Right), &mut SequenceRng::constant(0.99));
    assert_eq!(next.score, 0);
    assert!(next.events.contains(&GameEvent::FakeFoodEaten));
}

#[test]
fn police_catch_costs_points() {
    let mut state = new_game(vec![Position::new(5, 5), Position::new(4, 5)]);
    state.food = Position::new(15, 15);
    state.score = 120;
    state.police.body = Opponent {
        segments: vec![Position::new(7, 5), Position::new(8, 5)],
        direction: Direction::Left,
        active: true,
        move_timer: 2,
        spawn_cooldown: 0,
        spawned_at: 0,
    };

    let next = tick(&state, &TickInput::new(Direction::Right), &mut SequenceRng::constant(0.99));
    assert_eq!(next.score, 120 - POLICE_PENALTY);
    assert_eq!(next.police.catches, 1);
    assert!(!next.police.body.active);
    assert!(next.events.contains(&GameEvent::PoliceCatch { penalty: POLICE_PENALTY }));
}

#[test]
fn opponent_spawns_after_threshold() {
    let mut state = new_game(vec![Position::new(10, 10), Position::new(9, 10)]);
    state.food = Position::new(15, 3);
    state.food_eaten = OpponentKind::Phantom.profile().spawn_threshold;
    state.phantom.body.spawn_cooldown = 0;

    let next = tick(&state, &TickInput::new(Direction::Right), &mut SequenceRng::constant(0.99));
    assert!(next.phantom.body.active);
    assert!(next.phantom.body.segments.len() >= 2);
    assert!(next.events.contains(&GameEvent::OpponentSpawned(OpponentKind::Phantom)));
}

#[test]
fn session_plays_a_full_game() {
    let settings = Settings {
        trivia_enabled: false,
        ..Settings::default()
    };
    let mut session = GameSession::new(settings, 2024);
    assert!(session.handle_host_json(r#"{"type":"START_GAME","timestamp":0}"#));

    let mut clock = 0.0;
    for _ in 0..40 {
        if session.state().game_over {
            break;
        }
        clock += session.tick_interval_ms() as f64;
        session.step(clock);
    }

    let state = session.state();
    assert!(state.game_over);
    assert_eq!(state.trivia.phase, TriviaPhase::Resolved { revived: false });

    let json: Vec<String> = session
        .drain_messages(clock)
        .iter()
        .filter_map(|m| m.to_json())
        .collect();
    assert!(json[0].contains("GAME_READY"));
    assert!(json.last().is_some_and(|m| m.contains(r#""gameOver":true"#)));
}
