//! Snake Rush - A grid snake game with AI opponents and a food economy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, spawns, opponents)
//! - `session`: Tick driver holding the direction queue and RNG
//! - `protocol`: Host-frame messages (postMessage JSON)
//! - `settings`: Player/host configuration
//! - `highscores`: Top-10 leaderboard
//! - `storage`: Keyed JSON persistence (LocalStorage / files)

pub mod highscores;
pub mod protocol;
pub mod session;
pub mod settings;
pub mod sim;
pub mod storage;

pub use highscores::HighScores;
pub use session::GameSession;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Grid is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: i32 = 20;

    /// Baseline tick interval in milliseconds
    pub const BASE_TICK_MS: u32 = 150;
    /// Tick interval while the speed power-up is active
    pub const SPEED_TICK_MS: u32 = 80;

    /// Maximum buffered direction changes
    pub const MAX_DIRECTION_QUEUE: usize = 3;

    /// Score for one primary food
    pub const POINTS_PER_FOOD: u32 = 10;

    /// Rejection-sampling budget for every placement search
    pub const PLACEMENT_ATTEMPTS: u32 = 100;

    /// Power-ups
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.02;
    pub const POWERUP_DURATION: u64 = 50;
    pub const POWERUP_DESPAWN_TICKS: u64 = 60;

    /// Bonus food: flat score, shrinks the snake
    pub const BONUS_FOOD_CHANCE: f64 = 0.05;
    pub const BONUS_FOOD_MIN_FOOD: u32 = 3;
    pub const BONUS_FOOD_LIFETIME: u64 = 40;
    pub const BONUS_FOOD_POINTS: u32 = 25;
    pub const BONUS_FOOD_SHRINK: usize = 2;

    /// Flag food: multiplied food score
    pub const FLAG_FOOD_CHANCE: f64 = 0.15;
    pub const FLAG_FOOD_MIN_FOOD: u32 = 5;
    pub const FLAG_FOOD_LIFETIME: u64 = 50;
    pub const FLAG_FOOD_MULTIPLIER: u32 = 3;

    /// Fake food: looks like food, costs score and length
    pub const FAKE_FOOD_CHANCE: f64 = 0.03;
    pub const FAKE_FOOD_MIN_FOOD: u32 = 4;
    pub const MAX_FAKE_FOODS: usize = 3;
    pub const FAKE_FOOD_LIFETIME: u64 = 60;
    pub const FAKE_FOOD_PENALTY: u32 = 15;
    pub const FAKE_FOOD_SHRINK: usize = 1;
    /// Number of food sprites a fake food can mimic
    pub const FAKE_FOOD_MIMIC_VARIANTS: usize = 4;

    /// Cash pickups
    pub const CASH_SPAWN_CHANCE: f64 = 0.04;
    pub const MAX_CASH_ITEMS: usize = 3;
    pub const CASH_LIFETIME: u64 = 70;
    pub const CASH_LOW_VALUE: u32 = 5;
    pub const CASH_HIGH_VALUE: u32 = 20;
    pub const CASH_HIGH_CHANCE: f64 = 0.2;

    /// Obstacles
    pub const OBSTACLE_MIN_FOOD: u32 = 5;
    pub const OBSTACLE_SPAWN_INTERVAL: u32 = 3;
    pub const MAX_OBSTACLES: usize = 24;
    pub const OBSTACLE_CLUSTER_CHANCE: f64 = 0.5;
    pub const OBSTACLE_MIN_HEAD_DISTANCE: i32 = 3;
    pub const OBSTACLE_VARIANTS: usize = 3;

    /// Chance an AI picks its second-best move
    pub const AI_SECOND_BEST_CHANCE: f64 = 0.15;
    /// Cooldown before any opponent's first spawn
    pub const OPPONENT_INITIAL_COOLDOWN: u32 = 20;
    pub const POLICE_PENALTY: u32 = 50;
    pub const RIVAL_GROWTH_PER_STEAL: u32 = 2;

    /// Ticks the trivia result stays on screen before it resolves
    pub const TRIVIA_RESULT_TICKS: u32 = 12;
}
