//! Power-ups: spawn, pickup and timed activation

use serde::{Deserialize, Serialize};

use super::grid::{Position, random_free_position};
use super::rng::GameRng;
use super::state::Occupancy;
use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Shorter tick interval
    Speed,
    /// Ignore self/obstacle hits, police flee
    Invincibility,
    /// Primary and flag food score double
    DoublePoints,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Speed,
        PowerUpKind::Invincibility,
        PowerUpKind::DoublePoints,
    ];
}

/// A power-up waiting on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub position: Position,
    pub kind: PowerUpKind,
    pub spawn_time: u64,
    /// Active duration once collected
    pub duration: u64,
}

/// A collected power-up; present only while `end_time > tick_count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub end_time: u64,
}

pub fn should_spawn_power_up(present: bool, rng: &mut dyn GameRng) -> bool {
    !present && rng.chance(POWERUP_SPAWN_CHANCE)
}

pub fn generate_power_up(occ: &Occupancy, tick: u64, rng: &mut dyn GameRng) -> PowerUp {
    let position = random_free_position(rng, |p| occ.is_blocked(p));
    let kind = PowerUpKind::ALL[rng.next_index(PowerUpKind::ALL.len())];
    PowerUp {
        position,
        kind,
        spawn_time: tick,
        duration: POWERUP_DURATION,
    }
}

/// Uncollected power-ups vanish after `POWERUP_DESPAWN_TICKS`
pub fn is_despawned(power_up: &PowerUp, tick: u64) -> bool {
    tick.saturating_sub(power_up.spawn_time) > POWERUP_DESPAWN_TICKS
}

/// Insert, or restart the window of an already active kind (no stacking)
pub fn activate_power_up(
    active: &[ActivePowerUp],
    kind: PowerUpKind,
    tick: u64,
    duration: u64,
) -> Vec<ActivePowerUp> {
    let end_time = tick + duration.max(1);
    let mut next: Vec<ActivePowerUp> = active.to_vec();
    match next.iter_mut().find(|p| p.kind == kind) {
        Some(existing) => existing.end_time = end_time,
        None => next.push(ActivePowerUp { kind, end_time }),
    }
    next
}

/// Drop entries whose window closed. Returns (still active, expired kinds).
pub fn update_active_power_ups(
    active: &[ActivePowerUp],
    tick: u64,
) -> (Vec<ActivePowerUp>, Vec<PowerUpKind>) {
    let (live, dead): (Vec<_>, Vec<_>) = active.iter().copied().partition(|p| p.end_time > tick);
    (live, dead.into_iter().map(|p| p.kind).collect())
}

pub fn is_active(active: &[ActivePowerUp], kind: PowerUpKind) -> bool {
    active.iter().any(|p| p.kind == kind)
}
