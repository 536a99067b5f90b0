//! Fixed-step simulation tick
//!
//! One call moves the snake exactly one cell and advances every subsystem in
//! a fixed order: collisions, power-ups, bonus/flag food, cash, fake food,
//! then the eaten/not-eaten branch (growth, food, opponents, obstacles,
//! score). A fatal collision returns early and nothing else runs.

use super::cash::{CashItem, advance_cash};
use super::food::{BonusFood, FakeFood, FlagFood, advance_fake_foods, food_points, place_food};
use super::grid::{Direction, Position};
use super::growth::{random_growth, shrink, tick_grow_pending};
use super::obstacle::{Obstacle, hits_obstacle, should_spawn_obstacles, spawn_obstacle_batch};
use super::opponent::{Opponent, OpponentContext};
use super::phantom::{PhantomState, tick_phantom};
use super::police::{PoliceState, tick_police};
use super::powerup::{
    PowerUpKind, activate_power_up, generate_power_up, is_active, is_despawned,
    should_spawn_power_up, update_active_power_ups,
};
use super::rival::{RivalState, tick_rival};
use super::rng::GameRng;
use super::state::{DeathReason, Expiring, GameEvent, GameState, Occupancy};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Heading for this step (already dequeued)
    pub direction: Direction,
    /// Host cheat: wrap at walls and ignore body/obstacle hits
    pub immortal: bool,
}

impl TickInput {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            immortal: false,
        }
    }
}

/// Score deltas and shrink accumulated over one tick
#[derive(Debug, Default)]
struct Ledger {
    gains: u32,
    penalties: u32,
    shrink: usize,
}

impl Ledger {
    fn settle(&self, score: u32) -> u32 {
        let total = score as i64 + self.gains as i64 - self.penalties as i64;
        total.max(0) as u32
    }
}

/// Opponents after their update, plus any food they took
struct OpponentsStep {
    phantom: PhantomState,
    police: PoliceState,
    rival: RivalState,
    food: Position,
}

/// Advance the game by one step. Never fails; a dead or unstarted game is
/// returned unchanged.
pub fn tick(state: &GameState, input: &TickInput, rng: &mut dyn GameRng) -> GameState {
    if !state.game_started || state.game_over || state.snake.is_empty() {
        return state.clone();
    }

    let now = state.tick_count + 1;
    let direction = input.direction;
    let mut events = Vec::new();

    // Expire first so collision and every later check share one active set
    let (mut active, expired) = update_active_power_ups(&state.active_power_ups, now);
    events.extend(expired.into_iter().map(GameEvent::PowerUpExpired));
    let invincible = is_active(&active, PowerUpKind::Invincibility);

    // --- Collisions: wall, self, obstacle ---
    let mut immortal_saves = state.immortal_saves;
    let mut head = state.snake[0].step(direction);
    if !head.in_bounds() {
        if !input.immortal {
            return die(state, direction, DeathReason::Wall, rng);
        }
        head = head.wrapped();
        immortal_saves += 1;
    }

    let eating = head == state.food;
    let tail_vacates = !eating && state.grow_pending == 0;
    let body_len = if tail_vacates {
        state.snake.len() - 1
    } else {
        state.snake.len()
    };
    let protected = invincible || input.immortal;
    if state.snake[..body_len].contains(&head) {
        if !protected {
            return die(state, direction, DeathReason::SelfCollision, rng);
        }
        if !invincible {
            immortal_saves += 1;
        }
    }
    if hits_obstacle(&state.obstacles, head) {
        if !protected {
            return die(state, direction, DeathReason::Obstacle, rng);
        }
        if !invincible {
            immortal_saves += 1;
        }
    }

    // Moved body with the tail still attached; growth decides trimming
    let mut snake = Vec::with_capacity(state.snake.len() + 1);
    snake.push(head);
    snake.extend_from_slice(&state.snake);

    let mut ledger = Ledger::default();
    let obstacles = &state.obstacles;

    // --- Power-ups ---
    let mut power_up = state.power_up.clone();
    if let Some(p) = &state.power_up {
        if p.position == head {
            log::debug!("Power-up collected: {:?}", p.kind);
            active = activate_power_up(&active, p.kind, now, p.duration);
            events.push(GameEvent::PowerUpCollected(p.kind));
            power_up = None;
        } else if is_despawned(p, now) {
            power_up = None;
        }
    }
    if should_spawn_power_up(power_up.is_some(), rng) {
        let occ = Occupancy::new(&snake, Some(state.food), obstacles);
        power_up = Some(generate_power_up(&occ, now, rng));
    }
    let invincible = is_active(&active, PowerUpKind::Invincibility);
    let double_points = is_active(&active, PowerUpKind::DoublePoints);

    // --- Bonus and flag food ---
    let mut bonus_food = state.bonus_food.clone().filter(|b| !b.is_expired(now));
    if bonus_food.as_ref().is_some_and(|b| b.collect(head)) {
        ledger.gains += BONUS_FOOD_POINTS;
        ledger.shrink += BONUS_FOOD_SHRINK;
        events.push(GameEvent::BonusFoodCollected);
        bonus_food = None;
    }
    let mut flag_food = state.flag_food.clone().filter(|f| !f.is_expired(now));
    if flag_food.as_ref().is_some_and(|f| f.collect(head)) {
        ledger.gains += FlagFood::bonus(double_points);
        events.push(GameEvent::FlagFoodCollected);
        flag_food = None;
    }

    // --- Cash ---
    let (mut cash_items, cash_value) = advance_cash(&state.cash_items, head, now);
    if cash_value > 0 {
        ledger.gains += cash_value;
        events.push(GameEvent::CashCollected { value: cash_value });
    }
    if CashItem::should_spawn(cash_items.len(), rng) {
        let occ = Occupancy::new(&snake, Some(state.food), obstacles)
            .with_extra(cash_items.iter().map(|c| c.position));
        cash_items.push(CashItem::generate(&occ, now, rng));
    }

    // --- Fake food ---
    let (mut fake_foods, fakes_eaten) = advance_fake_foods(&state.fake_foods, head, now);
    if fakes_eaten > 0 {
        ledger.penalties += FAKE_FOOD_PENALTY * fakes_eaten as u32;
        ledger.shrink += FAKE_FOOD_SHRINK * fakes_eaten;
        events.extend(std::iter::repeat_n(GameEvent::FakeFoodEaten, fakes_eaten));
    }
    if FakeFood::should_spawn(state.food_eaten, fake_foods.len(), rng) {
        let occ = Occupancy::new(&snake, Some(state.food), obstacles)
            .with_extra(fake_foods.iter().map(|f| f.position));
        fake_foods.push(FakeFood::generate(&occ, now, rng));
    }

    let mut next = GameState {
        direction,
        tick_count: now,
        power_up,
        bonus_food,
        flag_food,
        cash_items,
        fake_foods,
        immortal_saves,
        ..state.clone()
    };

    if eating {
        // --- Ate primary food ---
        let growth = random_growth(rng);
        next.food_eaten += 1;
        next.grow_pending = growth;
        ledger.gains += food_points(double_points);
        events.push(GameEvent::FoodEaten { growth });

        next.snake = shrink(snake, ledger.shrink);
        let pickups = next.pickup_cells();
        let food = place_food(
            &Occupancy::new(&next.snake, None, obstacles)
                .with_extra(pickups.iter().copied())
                .with_extra(state.opponent_cells()),
            rng,
        );

        let ctx = OpponentContext {
            player: &next.snake,
            food,
            obstacles,
            food_eaten: next.food_eaten,
            tick: now,
            others: &[],
        };
        let step = advance_opponents(
            state,
            &ctx,
            &pickups,
            invincible,
            &mut ledger,
            &mut events,
            rng,
            |rng| {
                let occ = Occupancy::new(&next.snake, Some(food), obstacles)
                    .with_extra(pickups.iter().copied());
                if FlagFood::should_spawn(next.food_eaten, next.flag_food.is_some(), rng) {
                    Some(FlagFood::generate(&occ, now, rng))
                } else {
                    None
                }
            },
        );
        next.food = step.0.food;
        next.phantom = step.0.phantom;
        next.police = step.0.police;
        next.rival = step.0.rival;
        if let Some(flag) = step.1 {
            next.flag_food = Some(flag);
        }

        if should_spawn_obstacles(next.food_eaten, next.last_obstacle_batch, next.obstacles.len()) {
            let occ = Occupancy::new(&next.snake, Some(next.food), &next.obstacles)
                .with_extra(next.pickup_cells())
                .with_extra(next.opponent_cells());
            let batch: Vec<Obstacle> = spawn_obstacle_batch(&occ, head, now, rng);
            if !batch.is_empty() {
                log::info!("Spawned {} obstacle(s)", batch.len());
                events.push(GameEvent::ObstaclesSpawned { count: batch.len() });
                next.obstacles.extend(batch);
                next.last_obstacle_batch = next.food_eaten;
            }
        }
    } else {
        // --- Regular move ---
        let (grown, pending) = tick_grow_pending(snake, state.grow_pending);
        next.grow_pending = pending;
        next.snake = shrink(grown, ledger.shrink);

        if BonusFood::should_spawn(next.food_eaten, next.bonus_food.is_some(), rng) {
            let occ = Occupancy::new(&next.snake, Some(next.food), obstacles)
                .with_extra(next.pickup_cells());
            next.bonus_food = Some(BonusFood::generate(&occ, now, rng));
        }

        let pickups = next.pickup_cells();
        let ctx = OpponentContext {
            player: &next.snake,
            food: next.food,
            obstacles,
            food_eaten: next.food_eaten,
            tick: now,
            others: &[],
        };
        let (step, _) = advance_opponents(
            state,
            &ctx,
            &pickups,
            invincible,
            &mut ledger,
            &mut events,
            rng,
            |_| None::<()>,
        );
        next.food = step.food;
        next.phantom = step.phantom;
        next.police = step.police;
        next.rival = step.rival;
    }

    next.active_power_ups = active;
    next.score = ledger.settle(state.score);
    next.events = events;
    next
}

/// Phantom, then `between` (flag food on the eaten branch), then Police,
/// then Rival. Each sees the others' current bodies. A theft by Phantom or
/// Rival regenerates the food clear of bodies and `pickups`.
#[allow(clippy::too_many_arguments)]
fn advance_opponents<T>(
    state: &GameState,
    ctx: &OpponentContext,
    pickups: &[Position],
    invincible: bool,
    ledger: &mut Ledger,
    events: &mut Vec<GameEvent>,
    rng: &mut dyn GameRng,
    between: impl FnOnce(&mut dyn GameRng) -> Option<T>,
) -> (OpponentsStep, Option<T>) {
    let mut food = ctx.food;

    let others = cells_of(&[&state.police.body, &state.rival.body]);
    let phantom = tick_phantom(&state.phantom, &OpponentContext { others: &others, ..*ctx }, rng);
    events.extend(phantom.events);
    if phantom.stole {
        food = regenerate_food(ctx, pickups, &[&state.police.body, &state.rival.body], rng);
    }

    let extra = between(&mut *rng);

    let others = cells_of(&[&phantom.phantom.body, &state.rival.body]);
    let ctx = OpponentContext {
        food,
        others: &others,
        ..*ctx
    };
    let police = tick_police(&state.police, &ctx, invincible, rng);
    events.extend(police.events);
    ledger.penalties += police.penalty;

    let others = cells_of(&[&phantom.phantom.body, &police.police.body]);
    let ctx = OpponentContext {
        others: &others,
        ..ctx
    };
    let rival = tick_rival(&state.rival, &ctx, rng);
    events.extend(rival.events);
    if rival.stole {
        let bodies = [&phantom.phantom.body, &police.police.body, &rival.rival.body];
        food = regenerate_food(&ctx, pickups, &bodies, rng);
    }

    (
        OpponentsStep {
            phantom: phantom.phantom,
            police: police.police,
            rival: rival.rival,
            food,
        },
        extra,
    )
}

fn cells_of(bodies: &[&Opponent]) -> Vec<Position> {
    bodies.iter().flat_map(|b| b.segments.iter().copied()).collect()
}

/// Replacement food after a theft
fn regenerate_food(
    ctx: &OpponentContext,
    pickups: &[Position],
    bodies: &[&Opponent],
    rng: &mut dyn GameRng,
) -> Position {
    let occ = Occupancy::new(ctx.player, None, ctx.obstacles)
        .with_extra(pickups.iter().copied())
        .with_extra(cells_of(bodies));
    place_food(&occ, rng)
}

/// Terminal transition: counters are preserved, trivia gets its chance
fn die(state: &GameState, direction: Direction, reason: DeathReason, rng: &mut dyn GameRng) -> GameState {
    log::info!(
        "Game over ({}) at tick {}: score {}, food eaten {}",
        reason.as_str(),
        state.tick_count,
        state.score,
        state.food_eaten
    );
    let mut next = state.clone();
    next.direction = direction;
    next.game_over = true;
    next.death_reason = Some(reason);
    next.trivia = state.trivia.activate(rng);
    next.events = vec![GameEvent::Died(reason)];
    next
}
