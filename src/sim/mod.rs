//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One grid step per tick
//! - Randomness only through `GameRng`
//! - Stable iteration order (fixed direction and candidate order)
//! - No rendering, timer or platform dependencies

pub mod cash;
pub mod direction_queue;
pub mod food;
pub mod grid;
pub mod growth;
pub mod obstacle;
pub mod opponent;
pub mod phantom;
pub mod police;
pub mod powerup;
pub mod rival;
pub mod rng;
pub mod state;
pub mod tick;
pub mod trivia;

pub use direction_queue::{DirectionQueue, EnqueueResult};
pub use grid::{Direction, Position};
pub use opponent::{Opponent, OpponentKind};
pub use powerup::{ActivePowerUp, PowerUp, PowerUpKind};
pub use rng::{GameRng, RngState, SequenceRng};
pub use state::{DeathReason, GameEvent, GameState, create_new_game, default_snake};
pub use tick::{TickInput, tick};
pub use trivia::{TriviaPhase, TriviaResult, TriviaState, advance_trivia, revive_snake, submit_trivia_answer};
