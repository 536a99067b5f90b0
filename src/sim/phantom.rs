//! Phantom snake: races the player to the food and vanishes after a theft

use serde::{Deserialize, Serialize};

use super::opponent::{Goal, Motion, Opponent, OpponentContext, OpponentKind, advance_active};
use super::rng::GameRng;
use super::state::GameEvent;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhantomState {
    pub body: Opponent,
    pub steal_count: u32,
}

#[derive(Debug, Clone)]
pub struct PhantomOutcome {
    pub phantom: PhantomState,
    /// Food was taken; the caller must regenerate it
    pub stole: bool,
    pub events: Vec<GameEvent>,
}

pub fn tick_phantom(
    phantom: &PhantomState,
    ctx: &OpponentContext,
    rng: &mut dyn GameRng,
) -> PhantomOutcome {
    let kind = OpponentKind::Phantom;
    let mut events = Vec::new();

    if !phantom.body.active {
        let (body, motion) = ctx.advance_dormant(&phantom.body, kind);
        if motion == Motion::Spawned {
            events.push(GameEvent::OpponentSpawned(kind));
        }
        return PhantomOutcome {
            phantom: PhantomState {
                body,
                ..phantom.clone()
            },
            stole: false,
            events,
        };
    }

    let (body, motion) = advance_active(
        &phantom.body,
        kind,
        Goal::Pursue(ctx.food),
        false,
        ctx.tick,
        |p| ctx.is_hazard(p),
        rng,
    );
    let mut next = PhantomState {
        body,
        ..phantom.clone()
    };
    let mut stole = false;
    match motion {
        Motion::Crashed => events.push(GameEvent::OpponentCrashed(kind)),
        Motion::Expired => events.push(GameEvent::OpponentExpired(kind)),
        Motion::Moved if next.body.head() == Some(ctx.food) => {
            log::info!("Phantom stole the food at ({}, {})", ctx.food.x, ctx.food.y);
            stole = true;
            next.steal_count += 1;
            next.body = Opponent::deactivated(kind);
            events.push(GameEvent::FoodStolen(kind));
        }
        _ => {}
    }

    PhantomOutcome {
        phantom: next,
        stole,
        events,
    }
}
