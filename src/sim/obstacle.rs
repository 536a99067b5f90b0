//! Permanent hazards spawned in small clusters
//!
//! A batch starts from one free origin cell away from the head and may grow
//! into a predefined shape. If any shape cell is unusable the batch keeps only
//! the origin.

use serde::{Deserialize, Serialize};

use super::grid::{Position, random_free_position};
use super::rng::GameRng;
use super::state::Occupancy;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Position,
    pub spawn_tick: u64,
    /// Cosmetic sprite variant
    pub variant: u8,
}

/// Cluster shapes as offsets from the origin cell
pub const OBSTACLE_SHAPES: [&[(i32, i32)]; 8] = [
    &[(0, 0), (1, 0)],
    &[(0, 0), (1, 0), (2, 0)],
    &[(0, 0), (0, 1)],
    &[(0, 0), (0, 1), (0, 2)],
    &[(0, 0), (1, 0), (0, 1)],
    &[(0, 0), (1, 0), (1, 1)],
    &[(0, 0), (0, 1), (1, 1)],
    &[(0, 0), (-1, 0), (0, 1)],
];

/// Batch gate, checked when primary food is eaten
pub fn should_spawn_obstacles(food_eaten: u32, last_batch: u32, count: usize) -> bool {
    food_eaten >= OBSTACLE_MIN_FOOD
        && food_eaten.saturating_sub(last_batch) >= OBSTACLE_SPAWN_INTERVAL
        && count < MAX_OBSTACLES
}

pub fn hits_obstacle(obstacles: &[Obstacle], pos: Position) -> bool {
    obstacles.iter().any(|o| o.position == pos)
}

/// Spawn one batch. `occ` covers snake, food and existing obstacles.
/// Returns an empty batch when no valid origin can be found.
pub fn spawn_obstacle_batch(
    occ: &Occupancy,
    head: Position,
    tick: u64,
    rng: &mut dyn GameRng,
) -> Vec<Obstacle> {
    let usable = |p: Position| {
        p.in_bounds() && !occ.is_blocked(p) && p.manhattan(head) >= OBSTACLE_MIN_HEAD_DISTANCE
    };

    let origin = random_free_position(rng, |p| !usable(p));
    if !usable(origin) {
        return Vec::new();
    }

    let capacity = MAX_OBSTACLES.saturating_sub(occ.obstacles.len());
    let mut cells = vec![origin];
    if rng.chance(OBSTACLE_CLUSTER_CHANCE) {
        let shape = OBSTACLE_SHAPES[rng.next_index(OBSTACLE_SHAPES.len())];
        let extended: Vec<Position> = shape
            .iter()
            .map(|&(dx, dy)| Position::new(origin.x + dx, origin.y + dy))
            .collect();
        if extended.len() <= capacity && extended.iter().all(|&p| usable(p)) {
            cells = extended;
        }
    }

    cells
        .into_iter()
        .map(|position| Obstacle {
            position,
            spawn_tick: tick,
            variant: rng.next_index(OBSTACLE_VARIANTS) as u8,
        })
        .collect()
}
