//! Growth engine: weighted growth bursts and tail trimming

use super::grid::Position;
use super::rng::GameRng;

/// (extra growth ticks, weight)
pub const GROWTH_WEIGHTS: [(u32, u32); 5] = [(1, 30), (2, 30), (3, 20), (4, 12), (5, 8)];

/// Draw how many extra ticks the snake keeps its tail after eating
pub fn random_growth(rng: &mut dyn GameRng) -> u32 {
    let total: u32 = GROWTH_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.next_f64() * total as f64;
    for &(amount, weight) in &GROWTH_WEIGHTS {
        if roll < weight as f64 {
            return amount;
        }
        roll -= weight as f64;
    }
    GROWTH_WEIGHTS[GROWTH_WEIGHTS.len() - 1].0
}

/// Advance growth on a tick without food.
///
/// `snake` is the moved body (new head prepended, tail still attached).
/// With growth pending the tail stays and the counter drops; otherwise the
/// tail is trimmed.
pub fn tick_grow_pending(mut snake: Vec<Position>, grow_pending: u32) -> (Vec<Position>, u32) {
    if grow_pending > 0 {
        return (snake, grow_pending - 1);
    }
    if snake.len() > 1 {
        snake.pop();
    }
    (snake, 0)
}

/// Drop `amount` tail segments, never below length 1
pub fn shrink(mut snake: Vec<Position>, amount: usize) -> Vec<Position> {
    let keep = snake.len().saturating_sub(amount).max(1);
    snake.truncate(keep);
    snake
}
