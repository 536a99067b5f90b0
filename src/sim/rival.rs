//! Rival snake: competes for food, grows on every theft and stays on the board

use serde::{Deserialize, Serialize};

use super::opponent::{Goal, Motion, Opponent, OpponentContext, OpponentKind, advance_active};
use super::rng::GameRng;
use super::state::GameEvent;
use crate::consts::RIVAL_GROWTH_PER_STEAL;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RivalState {
    pub body: Opponent,
    pub food_eaten: u32,
    pub grow_pending: u32,
}

#[derive(Debug, Clone)]
pub struct RivalOutcome {
    pub rival: RivalState,
    /// Food was taken; the caller must regenerate it
    pub stole: bool,
    pub events: Vec<GameEvent>,
}

pub fn tick_rival(rival: &RivalState, ctx: &OpponentContext, rng: &mut dyn GameRng) -> RivalOutcome {
    let kind = OpponentKind::Rival;
    let mut events = Vec::new();

    if !rival.body.active {
        let (body, motion) = ctx.advance_dormant(&rival.body, kind);
        if motion == Motion::Spawned {
            events.push(GameEvent::OpponentSpawned(kind));
        }
        return RivalOutcome {
            rival: RivalState {
                body,
                grow_pending: 0,
                ..rival.clone()
            },
            stole: false,
            events,
        };
    }

    let grow = rival.grow_pending > 0;
    let (body, motion) = advance_active(
        &rival.body,
        kind,
        Goal::Pursue(ctx.food),
        grow,
        ctx.tick,
        |p| ctx.is_hazard(p),
        rng,
    );
    let mut next = RivalState {
        body,
        ..rival.clone()
    };
    let mut stole = false;
    match motion {
        Motion::Crashed => {
            next.grow_pending = 0;
            events.push(GameEvent::OpponentCrashed(kind));
        }
        Motion::Expired => {
            next.grow_pending = 0;
            events.push(GameEvent::OpponentExpired(kind));
        }
        Motion::Moved => {
            if grow {
                next.grow_pending -= 1;
            }
            if next.body.head() == Some(ctx.food) {
                log::info!("Rival ate the food at ({}, {})", ctx.food.x, ctx.food.y);
                stole = true;
                next.food_eaten += 1;
                next.grow_pending += RIVAL_GROWTH_PER_STEAL;
                events.push(GameEvent::FoodStolen(kind));
            }
        }
        _ => {}
    }

    RivalOutcome {
        rival: next,
        stole,
        events,
    }
}
