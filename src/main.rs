//! Snake Rush entry point
//!
//! On the web: wires keyboard, host postMessage and a tick timer to a
//! `GameSession`. Natively: plays one seeded game on autopilot and prints a
//! summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MessageEvent};

    use snake_rush::protocol::GameMessage;
    use snake_rush::sim::{Direction, TriviaPhase};
    use snake_rush::{GameSession, Settings};

    type Shared = Rc<RefCell<GameSession>>;

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Snake Rush starting...");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let session = Rc::new(RefCell::new(GameSession::new(settings, seed)));

        setup_host_listener(session.clone());
        setup_keyboard(session.clone());
        flush_messages(&session);
        schedule_tick(session);
    }

    /// Inbound postMessage from the host frame; any origin, shape-checked
    fn setup_host_listener(session: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MessageEvent| {
            let json = js_sys::JSON::stringify(&event.data())
                .ok()
                .and_then(|s| s.as_string());
            let Some(json) = json else {
                return;
            };
            let handled = session.borrow_mut().handle_host_json(&json);
            if handled {
                flush_messages(&session);
            }
        });
        let _ = window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(session: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            {
                let mut s = session.borrow_mut();
                let trivia_open = matches!(s.state().trivia.phase, TriviaPhase::Active { .. });
                match key.as_str() {
                    "ArrowUp" | "w" | "W" => {
                        s.change_direction(Direction::Up);
                    }
                    "ArrowDown" | "s" | "S" => {
                        s.change_direction(Direction::Down);
                    }
                    "ArrowLeft" | "a" | "A" => {
                        s.change_direction(Direction::Left);
                    }
                    "ArrowRight" | "d" | "D" => {
                        s.change_direction(Direction::Right);
                    }
                    " " | "Enter" => s.start_game(),
                    "r" | "R" => s.reset_game(),
                    "1" | "2" | "3" | "4" if trivia_open => {
                        if let Ok(n) = key.parse::<usize>() {
                            s.answer_trivia(n - 1);
                        }
                    }
                    _ => return,
                }
            }
            event.prevent_default();
            flush_messages(&session);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn schedule_tick(session: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let interval = session.borrow().tick_interval_ms();
        let closure = Closure::once(move || {
            game_loop(session);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval as i32,
        );
        closure.forget();
    }

    fn game_loop(session: Shared) {
        session.borrow_mut().step(js_sys::Date::now());
        flush_messages(&session);
        schedule_tick(session);
    }

    /// Post pending GAME_READY / GAME_STATE to the parent frame
    fn flush_messages(session: &Shared) {
        let messages = session.borrow_mut().drain_messages(js_sys::Date::now());
        if messages.is_empty() {
            return;
        }
        let Some(parent) = web_sys::window().and_then(|w| w.parent().ok().flatten()) else {
            return;
        };
        for msg in messages {
            post(&parent, &msg);
        }
    }

    fn post(target: &web_sys::Window, msg: &GameMessage) {
        let Some(json) = msg.to_json() else {
            return;
        };
        match js_sys::JSON::parse(&json) {
            Ok(value) => {
                let _ = target.post_message(&value, "*");
            }
            Err(_) => log::warn!("Could not encode message for host"),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Snake Rush (native) starting...");

    let settings = snake_rush::Settings::load();
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .or(settings.seed)
        .unwrap_or_else(autopilot::clock_seed);
    let max_ticks = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(autopilot::DEFAULT_MAX_TICKS);

    autopilot::run(settings, seed, max_ticks);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless greedy player
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use snake_rush::sim::opponent::{Goal, choose_direction};
    use snake_rush::sim::{Direction, GameState, Position, TriviaPhase};
    use snake_rush::{GameSession, Settings};

    pub const DEFAULT_MAX_TICKS: u64 = 5_000;

    pub fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Head for the food, steering around walls, the body, obstacles and
    /// opponents
    fn pick_direction(state: &GameState, rng: &mut Pcg32) -> Direction {
        let blocked = |p: Position| {
            state.obstacles.iter().any(|o| o.position == p)
                || state.phantom.body.occupies(p)
                || state.police.body.occupies(p)
                || state.rival.body.occupies(p)
        };
        choose_direction(
            &state.snake,
            state.direction,
            Goal::Pursue(state.food),
            state.grow_pending == 0,
            blocked,
            rng,
        )
    }

    pub fn run(settings: Settings, seed: u64, max_ticks: u64) {
        let mut session = GameSession::new(settings, seed);
        // Steering draws come from their own stream
        let mut steer = Pcg32::seed_from_u64(seed ^ 0x5eed);
        session.start_game();

        let mut clock = 0.0;
        let mut steps = 0u64;
        while steps < max_ticks {
            let state = session.state();
            if state.game_over {
                match state.trivia.phase {
                    TriviaPhase::Active { .. } => {
                        let answer = state.trivia.question().map(|q| q.answer).unwrap_or(0);
                        session.answer_trivia(answer);
                    }
                    TriviaPhase::Answered { .. } => {}
                    _ => break,
                }
            } else {
                let dir = pick_direction(state, &mut steer);
                session.change_direction(dir);
            }

            clock += session.tick_interval_ms() as f64;
            session.step(clock);
            for msg in session.drain_messages(clock) {
                if let Some(json) = msg.to_json() {
                    log::debug!("host <- {}", json);
                }
            }
            steps += 1;
        }

        let state = session.state();
        println!("\nSnake Rush autopilot (seed {})", seed);
        println!("  ticks:        {}", state.tick_count);
        println!("  score:        {}", state.score);
        println!("  food eaten:   {}", state.food_eaten);
        println!("  length:       {}", state.snake.len());
        println!("  obstacles:    {}", state.obstacles.len());
        println!("  phantom:      {} steals", state.phantom.steal_count);
        println!("  police:       {} catches", state.police.catches);
        println!("  rival:        {} steals", state.rival.food_eaten);
        match state.death_reason {
            Some(reason) if state.game_over => println!("  died:         {}", reason.as_str()),
            _ => println!("  still alive after {} steps", steps),
        }
        if let Some(top) = session.high_scores().top_score() {
            println!("  best score:   {}", top);
        }
    }
}
