//! Food variants: primary, bonus, flag and fake
//!
//! Every variant is an independent value object with its own spawn roll,
//! placement, expiry and collection rule.

use serde::{Deserialize, Serialize};

use super::grid::{Position, random_free_position};
use super::obstacle::Obstacle;
use super::rng::GameRng;
use super::state::{Expiring, Occupancy};
use crate::consts::*;

/// Place primary food on a cell free of snake and obstacles
pub fn generate_food(snake: &[Position], obstacles: &[Obstacle], rng: &mut dyn GameRng) -> Position {
    place_food(&Occupancy::new(snake, None, obstacles), rng)
}

/// Place primary food on any cell `occ` leaves free
pub fn place_food(occ: &Occupancy, rng: &mut dyn GameRng) -> Position {
    random_free_position(rng, |p| occ.is_blocked(p))
}

/// Score for one primary food
pub fn food_points(double_points: bool) -> u32 {
    if double_points { POINTS_PER_FOOD * 2 } else { POINTS_PER_FOOD }
}

/// Short-lived high-value food that also trims the snake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusFood {
    pub position: Position,
    pub spawn_tick: u64,
    pub lifetime: u64,
}

impl Expiring for BonusFood {
    fn spawn_tick(&self) -> u64 {
        self.spawn_tick
    }

    fn lifetime(&self) -> u64 {
        self.lifetime
    }
}

impl BonusFood {
    /// Rolled on ticks where primary food was not eaten
    pub fn should_spawn(food_eaten: u32, present: bool, rng: &mut dyn GameRng) -> bool {
        !present && food_eaten >= BONUS_FOOD_MIN_FOOD && rng.chance(BONUS_FOOD_CHANCE)
    }

    pub fn generate(occ: &Occupancy, tick: u64, rng: &mut dyn GameRng) -> Self {
        Self {
            position: random_free_position(rng, |p| occ.is_blocked(p)),
            spawn_tick: tick,
            lifetime: BONUS_FOOD_LIFETIME,
        }
    }

    pub fn collect(&self, head: Position) -> bool {
        self.position == head
    }
}

/// Food worth a multiple of the regular score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagFood {
    pub position: Position,
    pub spawn_tick: u64,
    pub lifetime: u64,
}

impl Expiring for FlagFood {
    fn spawn_tick(&self) -> u64 {
        self.spawn_tick
    }

    fn lifetime(&self) -> u64 {
        self.lifetime
    }
}

impl FlagFood {
    /// Rolled on ticks where primary food was eaten
    pub fn should_spawn(food_eaten: u32, present: bool, rng: &mut dyn GameRng) -> bool {
        !present && food_eaten >= FLAG_FOOD_MIN_FOOD && rng.chance(FLAG_FOOD_CHANCE)
    }

    pub fn generate(occ: &Occupancy, tick: u64, rng: &mut dyn GameRng) -> Self {
        Self {
            position: random_free_position(rng, |p| occ.is_blocked(p)),
            spawn_tick: tick,
            lifetime: FLAG_FOOD_LIFETIME,
        }
    }

    pub fn collect(&self, head: Position) -> bool {
        self.position == head
    }

    pub fn bonus(double_points: bool) -> u32 {
        food_points(double_points) * FLAG_FOOD_MULTIPLIER
    }
}

/// Decoy that looks like primary food
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakeFood {
    pub position: Position,
    pub spawn_tick: u64,
    pub lifetime: u64,
    /// Which food sprite it imitates
    pub mimic_index: u8,
}

impl Expiring for FakeFood {
    fn spawn_tick(&self) -> u64 {
        self.spawn_tick
    }

    fn lifetime(&self) -> u64 {
        self.lifetime
    }
}

impl FakeFood {
    pub fn should_spawn(food_eaten: u32, count: usize, rng: &mut dyn GameRng) -> bool {
        food_eaten >= FAKE_FOOD_MIN_FOOD && count < MAX_FAKE_FOODS && rng.chance(FAKE_FOOD_CHANCE)
    }

    /// `occ` should already include the other fake foods
    pub fn generate(occ: &Occupancy, tick: u64, rng: &mut dyn GameRng) -> Self {
        let position = random_free_position(rng, |p| occ.is_blocked(p));
        Self {
            position,
            spawn_tick: tick,
            lifetime: FAKE_FOOD_LIFETIME,
            mimic_index: rng.next_index(FAKE_FOOD_MIMIC_VARIANTS) as u8,
        }
    }

    pub fn collect(&self, head: Position) -> bool {
        self.position == head
    }
}

/// Drop expired fakes and split off the ones under `head`.
/// Returns (remaining, eaten count).
pub fn advance_fake_foods(fakes: &[FakeFood], head: Position, tick: u64) -> (Vec<FakeFood>, usize) {
    let mut eaten = 0;
    let remaining = fakes
        .iter()
        .filter(|f| !f.is_expired(tick))
        .filter(|f| {
            if f.collect(head) {
                eaten += 1;
                false
            } else {
                true
            }
        })
        .cloned()
        .collect();
    (remaining, eaten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SequenceRng;

    #[test]
    fn test_food_avoids_snake() {
        let snake = vec![Position::new(0, 0), Position::new(1, 0)];
        // First draw lands on (0,0), second on (10,10)
        let mut rng = SequenceRng::new(vec![0.0, 0.0, 0.5, 0.5]);
        let food = generate_food(&snake, &[], &mut rng);
        assert_eq!(food, Position::new(10, 10));
    }

    #[test]
    fn test_expiry_is_strict() {
        let bonus = BonusFood {
            position: Position::new(3, 3),
            spawn_tick: 10,
            lifetime: 5,
        };
        assert!(!bonus.is_expired(15));
        assert!(bonus.is_expired(16));
    }

    #[test]
    fn test_bonus_spawn_gates() {
        let mut rng = SequenceRng::constant(0.0);
        assert!(!BonusFood::should_spawn(BONUS_FOOD_MIN_FOOD - 1, false, &mut rng));
        assert!(!BonusFood::should_spawn(BONUS_FOOD_MIN_FOOD, true, &mut rng));
        assert!(BonusFood::should_spawn(BONUS_FOOD_MIN_FOOD, false, &mut rng));
        let mut rng = SequenceRng::constant(0.99);
        assert!(!BonusFood::should_spawn(BONUS_FOOD_MIN_FOOD, false, &mut rng));
    }

    #[test]
    fn test_flag_bonus_respects_double_points() {
        assert_eq!(FlagFood::bonus(false), POINTS_PER_FOOD * FLAG_FOOD_MULTIPLIER);
        assert_eq!(FlagFood::bonus(true), 2 * POINTS_PER_FOOD * FLAG_FOOD_MULTIPLIER);
    }

    #[test]
    fn test_fake_food_cap() {
        let mut rng = SequenceRng::constant(0.0);
        assert!(!FakeFood::should_spawn(FAKE_FOOD_MIN_FOOD, MAX_FAKE_FOODS, &mut rng));
        assert!(FakeFood::should_spawn(FAKE_FOOD_MIN_FOOD, 0, &mut rng));
    }

    #[test]
    fn test_advance_fake_foods() {
        let fake = |x, spawn_tick| FakeFood {
            position: Position::new(x, 0),
            spawn_tick,
            lifetime: 10,
            mimic_index: 0,
        };
        let fakes = vec![fake(1, 0), fake(2, 50), fake(3, 50)];
        let (remaining, eaten) = advance_fake_foods(&fakes, Position::new(2, 0), 55);
        assert_eq!(eaten, 1);
        // (1,0) expired, (2,0) eaten
        assert_eq!(remaining, vec![fake(3, 50)]);
    }
}
