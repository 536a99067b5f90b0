//! Game state and core simulation types
//!
//! `GameState` is the single root aggregate. It is only ever replaced
//! wholesale: by `create_new_game`, by `tick`, or by the trivia revival.

use serde::{Deserialize, Serialize};

use super::cash::CashItem;
use super::food::{BonusFood, FakeFood, FlagFood, generate_food};
use super::grid::{Direction, Position};
use super::obstacle::Obstacle;
use super::opponent::OpponentKind;
use super::phantom::PhantomState;
use super::police::PoliceState;
use super::powerup::{ActivePowerUp, PowerUp, PowerUpKind};
use super::rival::RivalState;
use super::rng::GameRng;
use super::trivia::TriviaState;
use crate::consts::GRID_SIZE;
use crate::sim::direction_queue::INITIAL_DIRECTION;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathReason {
    Wall,
    SelfCollision,
    Obstacle,
}

impl DeathReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathReason::Wall => "wall",
            DeathReason::SelfCollision => "self",
            DeathReason::Obstacle => "obstacle",
        }
    }
}

/// Things that happened during one tick (for renderer/audio cues and logs)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { growth: u32 },
    BonusFoodCollected,
    FlagFoodCollected,
    FakeFoodEaten,
    CashCollected { value: u32 },
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    ObstaclesSpawned { count: usize },
    OpponentSpawned(OpponentKind),
    OpponentCrashed(OpponentKind),
    OpponentExpired(OpponentKind),
    FoodStolen(OpponentKind),
    PoliceCatch { penalty: u32 },
    Died(DeathReason),
    Revived,
}

/// Entities that vanish after a fixed number of ticks
pub trait Expiring {
    fn spawn_tick(&self) -> u64;
    fn lifetime(&self) -> u64;

    fn is_expired(&self, tick: u64) -> bool {
        tick.saturating_sub(self.spawn_tick()) > self.lifetime()
    }
}

/// Cells a new spawn must avoid
pub struct Occupancy<'a> {
    pub snake: &'a [Position],
    pub food: Option<Position>,
    pub obstacles: &'a [Obstacle],
    pub extra: Vec<Position>,
}

impl<'a> Occupancy<'a> {
    pub fn new(snake: &'a [Position], food: Option<Position>, obstacles: &'a [Obstacle]) -> Self {
        Self {
            snake,
            food,
            obstacles,
            extra: Vec::new(),
        }
    }

    pub fn with_extra(mut self, cells: impl IntoIterator<Item = Position>) -> Self {
        self.extra.extend(cells);
        self
    }

    pub fn is_blocked(&self, pos: Position) -> bool {
        self.food == Some(pos)
            || self.snake.contains(&pos)
            || self.obstacles.iter().any(|o| o.position == pos)
            || self.extra.contains(&pos)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Head first, never empty
    pub snake: Vec<Position>,
    pub food: Position,
    pub direction: Direction,
    pub game_over: bool,
    pub game_started: bool,
    pub score: u32,
    pub food_eaten: u32,
    pub tick_count: u64,
    pub power_up: Option<PowerUp>,
    pub active_power_ups: Vec<ActivePowerUp>,
    pub bonus_food: Option<BonusFood>,
    pub flag_food: Option<FlagFood>,
    pub fake_foods: Vec<FakeFood>,
    pub cash_items: Vec<CashItem>,
    pub obstacles: Vec<Obstacle>,
    /// `food_eaten` when the last obstacle batch spawned
    pub last_obstacle_batch: u32,
    pub phantom: PhantomState,
    pub police: PoliceState,
    pub rival: RivalState,
    pub grow_pending: u32,
    pub death_reason: Option<DeathReason>,
    /// Fatal collisions skipped because the host ran the tick in immortal mode
    pub immortal_saves: u32,
    pub trivia: TriviaState,
    /// Events from the most recent transition (not gameplay-affecting)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

/// Three cells in the middle of the board, heading right
pub fn default_snake() -> Vec<Position> {
    let mid = GRID_SIZE / 2;
    vec![
        Position::new(mid, mid),
        Position::new(mid - 1, mid),
        Position::new(mid - 2, mid),
    ]
}

/// Fresh running game with the given body (empty means the default body)
pub fn create_new_game(snake: Vec<Position>, rng: &mut dyn GameRng) -> GameState {
    let snake = if snake.is_empty() { default_snake() } else { snake };
    let food = generate_food(&snake, &[], rng);
    log::info!("New game: snake length {}, food at ({}, {})", snake.len(), food.x, food.y);

    GameState {
        snake,
        food,
        direction: INITIAL_DIRECTION,
        game_over: false,
        game_started: true,
        score: 0,
        food_eaten: 0,
        tick_count: 0,
        power_up: None,
        active_power_ups: Vec::new(),
        bonus_food: None,
        flag_food: None,
        fake_foods: Vec::new(),
        cash_items: Vec::new(),
        obstacles: Vec::new(),
        last_obstacle_batch: 0,
        phantom: PhantomState::default(),
        police: PoliceState::default(),
        rival: RivalState::default(),
        grow_pending: 0,
        death_reason: None,
        immortal_saves: 0,
        trivia: TriviaState::default(),
        events: Vec::new(),
    }
}

impl GameState {
    pub fn head(&self) -> Position {
        self.snake[0]
    }

    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.active_power_ups.iter().any(|p| p.kind == kind)
    }

    pub fn is_invincible(&self) -> bool {
        self.has_power_up(PowerUpKind::Invincibility)
    }

    /// Cells holding a power-up, bonus, flag, fake food or cash
    pub fn pickup_cells(&self) -> Vec<Position> {
        self.power_up
            .iter()
            .map(|p| p.position)
            .chain(self.bonus_food.iter().map(|b| b.position))
            .chain(self.flag_food.iter().map(|f| f.position))
            .chain(self.fake_foods.iter().map(|f| f.position))
            .chain(self.cash_items.iter().map(|c| c.position))
            .collect()
    }

    /// Cells held by Phantom, Police and Rival
    pub fn opponent_cells(&self) -> Vec<Position> {
        self.phantom
            .body
            .segments
            .iter()
            .chain(&self.police.body.segments)
            .chain(&self.rival.body.segments)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SequenceRng;

    #[test]
    fn test_new_game_defaults() {
        let mut rng = SequenceRng::constant(0.0);
        let state = create_new_game(Vec::new(), &mut rng);
        assert_eq!(state.snake, default_snake());
        assert!(state.game_started);
        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert!(!state.snake.contains(&state.food));
        assert!(!state.phantom.body.active);
    }

    #[test]
    fn test_occupancy() {
        let snake = [Position::new(1, 1)];
        let occ = Occupancy::new(&snake, Some(Position::new(2, 2)), &[])
            .with_extra([Position::new(3, 3)]);
        assert!(occ.is_blocked(Position::new(1, 1)));
        assert!(occ.is_blocked(Position::new(2, 2)));
        assert!(occ.is_blocked(Position::new(3, 3)));
        assert!(!occ.is_blocked(Position::new(4, 4)));
    }

    #[test]
    fn test_pickup_and_opponent_cells() {
        let mut rng = SequenceRng::constant(0.0);
        let mut state = create_new_game(Vec::new(), &mut rng);
        assert!(state.pickup_cells().is_empty());
        assert!(state.opponent_cells().is_empty());

        state.flag_food = Some(FlagFood {
            position: Position::new(4, 4),
            spawn_tick: 0,
            lifetime: 10,
        });
        state.fake_foods.push(FakeFood {
            position: Position::new(7, 2),
            spawn_tick: 0,
            lifetime: 10,
            mimic_index: 0,
        });
        state.rival.body.segments = vec![Position::new(1, 9), Position::new(0, 9)];
        assert_eq!(state.pickup_cells(), vec![Position::new(4, 4), Position::new(7, 2)]);
        assert_eq!(state.opponent_cells(), vec![Position::new(1, 9), Position::new(0, 9)]);
    }
}
