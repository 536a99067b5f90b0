//! Shared AI opponent pattern
//!
//! Phantom, Police and Rival all use the same body: a cooldown-gated spawn at
//! the candidate point farthest from the player, a move timer that slows them
//! below player speed, and a greedy Manhattan steering rule with a little
//! noise. The per-kind modules add what happens when they reach their target.

use serde::{Deserialize, Serialize};

use super::grid::{Direction, Position};
use super::obstacle::Obstacle;
use super::rng::GameRng;
use super::state::Occupancy;
use crate::consts::{AI_SECOND_BEST_CHANCE, GRID_SIZE, OPPONENT_INITIAL_COOLDOWN};

const MAX: i32 = GRID_SIZE - 1;
const MID: i32 = GRID_SIZE / 2;

const CORNERS: [Position; 4] = [
    Position::new(0, 0),
    Position::new(MAX, 0),
    Position::new(0, MAX),
    Position::new(MAX, MAX),
];

const MID_EDGES: [Position; 4] = [
    Position::new(MID, 0),
    Position::new(0, MID),
    Position::new(MAX, MID),
    Position::new(MID, MAX),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpponentKind {
    Phantom,
    Police,
    Rival,
}

/// Per-kind tuning
#[derive(Debug)]
pub struct OpponentProfile {
    /// Player `food_eaten` required before spawning
    pub spawn_threshold: u32,
    /// Moves once every this many ticks
    pub move_interval: u32,
    pub initial_length: usize,
    pub respawn_cooldown: u32,
    /// Ticks active before it leaves on its own
    pub lifetime: Option<u64>,
    pub spawn_points: &'static [Position],
}

const PHANTOM: OpponentProfile = OpponentProfile {
    spawn_threshold: 3,
    move_interval: 2,
    initial_length: 3,
    respawn_cooldown: 40,
    lifetime: Some(120),
    spawn_points: &CORNERS,
};

const POLICE: OpponentProfile = OpponentProfile {
    spawn_threshold: 8,
    move_interval: 3,
    initial_length: 2,
    respawn_cooldown: 50,
    lifetime: Some(150),
    spawn_points: &MID_EDGES,
};

const RIVAL: OpponentProfile = OpponentProfile {
    spawn_threshold: 6,
    move_interval: 2,
    initial_length: 3,
    respawn_cooldown: 60,
    lifetime: None,
    spawn_points: &CORNERS,
};

impl OpponentKind {
    pub fn profile(&self) -> &'static OpponentProfile {
        match self {
            OpponentKind::Phantom => &PHANTOM,
            OpponentKind::Police => &POLICE,
            OpponentKind::Rival => &RIVAL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OpponentKind::Phantom => "phantom",
            OpponentKind::Police => "police",
            OpponentKind::Rival => "rival",
        }
    }
}

/// Body shared by every opponent. `active` implies `segments.len() >= 2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opponent {
    /// Head first
    pub segments: Vec<Position>,
    pub direction: Direction,
    pub active: bool,
    pub move_timer: u32,
    pub spawn_cooldown: u32,
    /// Tick the current life started
    pub spawned_at: u64,
}

impl Default for Opponent {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            direction: Direction::Right,
            active: false,
            move_timer: 0,
            spawn_cooldown: OPPONENT_INITIAL_COOLDOWN,
            spawned_at: 0,
        }
    }
}

impl Opponent {
    pub fn head(&self) -> Option<Position> {
        self.segments.first().copied()
    }

    /// Cleared body with the kind's respawn cooldown
    pub fn deactivated(kind: OpponentKind) -> Self {
        Self {
            spawn_cooldown: kind.profile().respawn_cooldown,
            ..Self::default()
        }
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }
}

/// Where an opponent wants to go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    Pursue(Position),
    Flee(Position),
}

/// Outcome of one opponent update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Inactive, cooling down or waiting for the spawn threshold
    Dormant,
    Spawned,
    /// Active but the move timer has not elapsed
    Waiting,
    Moved,
    Crashed,
    Expired,
}

/// The slice of the world an opponent sees during one tick
#[derive(Debug, Clone, Copy)]
pub struct OpponentContext<'a> {
    /// Player body after this tick's move, head first
    pub player: &'a [Position],
    pub food: Position,
    pub obstacles: &'a [Obstacle],
    pub food_eaten: u32,
    pub tick: u64,
    /// Cells held by the other opponents
    pub others: &'a [Position],
}

impl<'a> OpponentContext<'a> {
    pub fn player_head(&self) -> Position {
        self.player.first().copied().unwrap_or(Position::center())
    }

    pub fn occupancy(&self) -> Occupancy<'a> {
        Occupancy::new(self.player, Some(self.food), self.obstacles)
            .with_extra(self.others.iter().copied())
    }

    /// Obstacles and other opponents act as walls for an opponent
    pub fn is_hazard(&self, pos: Position) -> bool {
        self.others.contains(&pos) || self.obstacles.iter().any(|o| o.position == pos)
    }

    /// Shared dormant/spawn step
    pub fn advance_dormant(&self, opponent: &Opponent, kind: OpponentKind) -> (Opponent, Motion) {
        advance_dormant(
            opponent,
            kind,
            self.food_eaten,
            self.player_head(),
            &self.occupancy(),
            self.tick,
        )
    }
}

/// Lay out a body at the candidate farthest from the player head.
///
/// The tail sits on the candidate and the body extends toward the grid
/// center, head innermost. `None` (spawn deferred) if fewer than two cells
/// fit.
pub fn try_spawn(
    kind: OpponentKind,
    player_head: Position,
    occ: &Occupancy,
    tick: u64,
) -> Option<Opponent> {
    let profile = kind.profile();
    // First of equally distant candidates wins
    let anchor = profile
        .spawn_points
        .iter()
        .copied()
        .min_by_key(|p| std::cmp::Reverse(p.manhattan(player_head)))?;
    let heading = Direction::toward(anchor, Position::center());

    let mut cells = Vec::with_capacity(profile.initial_length);
    let mut cell = anchor;
    for _ in 0..profile.initial_length {
        if !cell.in_bounds() || occ.is_blocked(cell) {
            break;
        }
        cells.push(cell);
        cell = cell.step(heading);
    }
    if cells.len() < 2 {
        return None;
    }

    cells.reverse();
    Some(Opponent {
        segments: cells,
        direction: heading,
        active: true,
        move_timer: 0,
        spawn_cooldown: 0,
        spawned_at: tick,
    })
}

/// Cooldown/spawn handling for an inactive opponent
pub fn advance_dormant(
    opponent: &Opponent,
    kind: OpponentKind,
    food_eaten: u32,
    player_head: Position,
    occ: &Occupancy,
    tick: u64,
) -> (Opponent, Motion) {
    if opponent.spawn_cooldown > 0 {
        let mut next = opponent.clone();
        next.spawn_cooldown -= 1;
        return (next, Motion::Dormant);
    }
    if food_eaten < kind.profile().spawn_threshold {
        return (opponent.clone(), Motion::Dormant);
    }
    match try_spawn(kind, player_head, occ, tick) {
        Some(spawned) => {
            log::debug!("{} spawned at {:?}", kind.as_str(), spawned.segments);
            (spawned, Motion::Spawned)
        }
        None => (opponent.clone(), Motion::Dormant),
    }
}

/// Greedy Manhattan steering.
///
/// Candidates exclude the reversal, off-board cells, cells `avoid` rejects and
/// the body (minus the tail when it vacates). Ties keep the current heading;
/// with probability `AI_SECOND_BEST_CHANCE` the runner-up is taken instead.
/// With no candidates the current heading is returned.
pub fn choose_direction(
    segments: &[Position],
    current: Direction,
    goal: Goal,
    tail_vacates: bool,
    avoid: impl Fn(Position) -> bool,
    rng: &mut dyn GameRng,
) -> Direction {
    let Some(&head) = segments.first() else {
        return current;
    };
    let body = if tail_vacates && segments.len() > 1 {
        &segments[..segments.len() - 1]
    } else {
        segments
    };

    let mut candidates: Vec<(Direction, i32)> = Direction::ALL
        .iter()
        .copied()
        .filter(|&d| d != current.opposite())
        .filter_map(|d| {
            let next = head.step(d);
            if !next.in_bounds() || body.contains(&next) || avoid(next) {
                return None;
            }
            let score = match goal {
                Goal::Pursue(target) => next.manhattan(target),
                Goal::Flee(target) => -next.manhattan(target),
            };
            Some((d, score))
        })
        .collect();

    candidates.sort_by_key(|&(d, score)| (score, d != current));

    match candidates.len() {
        0 => current,
        1 => candidates[0].0,
        _ if rng.chance(AI_SECOND_BEST_CHANCE) => candidates[1].0,
        _ => candidates[0].0,
    }
}

/// Timer, lifetime and movement for an active opponent.
///
/// With `grow` set the tail stays put this move. Steering avoids `hazard`
/// cells; hitting one, a wall or its own body clears the opponent and starts
/// the respawn cooldown.
pub fn advance_active(
    opponent: &Opponent,
    kind: OpponentKind,
    goal: Goal,
    grow: bool,
    tick: u64,
    hazard: impl Fn(Position) -> bool,
    rng: &mut dyn GameRng,
) -> (Opponent, Motion) {
    let profile = kind.profile();
    let expired = profile
        .lifetime
        .is_some_and(|lifetime| tick.saturating_sub(opponent.spawned_at) >= lifetime);
    if expired {
        return (Opponent::deactivated(kind), Motion::Expired);
    }

    let mut next = opponent.clone();
    next.move_timer += 1;
    if next.move_timer < profile.move_interval {
        return (next, Motion::Waiting);
    }
    next.move_timer = 0;

    let tail_vacates = !grow;
    let direction = choose_direction(&next.segments, next.direction, goal, tail_vacates, &hazard, rng);
    let Some(head) = next.head() else {
        return (Opponent::deactivated(kind), Motion::Crashed);
    };
    let new_head = head.step(direction);

    let body_len = if tail_vacates {
        next.segments.len() - 1
    } else {
        next.segments.len()
    };
    if !new_head.in_bounds() || next.segments[..body_len].contains(&new_head) || hazard(new_head) {
        log::debug!("{} crashed at ({}, {})", kind.as_str(), new_head.x, new_head.y);
        return (Opponent::deactivated(kind), Motion::Crashed);
    }

    next.segments.insert(0, new_head);
    if !grow {
        next.segments.pop();
    }
    next.direction = direction;
    (next, Motion::Moved)
}
