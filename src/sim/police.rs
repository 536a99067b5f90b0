//! Police chaser: hunts the player's head, runs away from an invincible player

use serde::{Deserialize, Serialize};

use super::opponent::{Goal, Motion, Opponent, OpponentContext, OpponentKind, advance_active};
use super::rng::GameRng;
use super::state::GameEvent;
use crate::consts::POLICE_PENALTY;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoliceState {
    pub body: Opponent,
    pub catches: u32,
}

#[derive(Debug, Clone)]
pub struct PoliceOutcome {
    pub police: PoliceState,
    /// Score to deduct this tick
    pub penalty: u32,
    pub events: Vec<GameEvent>,
}

pub fn tick_police(
    police: &PoliceState,
    ctx: &OpponentContext,
    invincible: bool,
    rng: &mut dyn GameRng,
) -> PoliceOutcome {
    let kind = OpponentKind::Police;
    let mut events = Vec::new();

    if !police.body.active {
        let (body, motion) = ctx.advance_dormant(&police.body, kind);
        if motion == Motion::Spawned {
            events.push(GameEvent::OpponentSpawned(kind));
        }
        return PoliceOutcome {
            police: PoliceState {
                body,
                ..police.clone()
            },
            penalty: 0,
            events,
        };
    }

    let player_head = ctx.player_head();
    let goal = if invincible {
        Goal::Flee(player_head)
    } else {
        Goal::Pursue(player_head)
    };
    let (body, motion) =
        advance_active(&police.body, kind, goal, false, ctx.tick, |p| ctx.is_hazard(p), rng);
    let mut next = PoliceState {
        body,
        ..police.clone()
    };
    match motion {
        Motion::Crashed => events.push(GameEvent::OpponentCrashed(kind)),
        Motion::Expired => events.push(GameEvent::OpponentExpired(kind)),
        _ => {}
    }

    // Contact counts whether police stepped onto the player or the player
    // walked into the police head
    let mut penalty = 0;
    if next.body.active && !invincible && next.body.head() == Some(player_head) {
        log::info!("Police caught the player (-{})", POLICE_PENALTY);
        penalty = POLICE_PENALTY;
        next.catches += 1;
        next.body = Opponent::deactivated(kind);
        events.push(GameEvent::PoliceCatch { penalty });
    }

    PoliceOutcome {
        police: next,
        penalty,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::{Direction, Position};
    use crate::sim::rng::SequenceRng;

    fn ctx<'a>(player: &'a [Position]) -> OpponentContext<'a> {
        OpponentContext {
            player,
            food: Position::new(0, 0),
            obstacles: &[],
            food_eaten: 10,
            tick: 1,
            others: &[],
        }
    }

    fn patrol(segments: Vec<Position>, move_timer: u32) -> PoliceState {
        PoliceState {
            body: Opponent {
                segments,
                direction: Direction::Right,
                active: true,
                move_timer,
                spawn_cooldown: 0,
                spawned_at: 0,
            },
            catches: 0,
        }
    }

    #[test]
    fn test_catch_applies_penalty() {
        let player = [Position::new(6, 5), Position::new(6, 6)];
        let police = patrol(vec![Position::new(5, 5), Position::new(4, 5)], 2);
        let mut rng = SequenceRng::constant(0.9);
        let out = tick_police(&police, &ctx(&player), false, &mut rng);
        assert_eq!(out.penalty, POLICE_PENALTY);
        assert_eq!(out.police.catches, 1);
        assert!(!out.police.body.active);
        assert!(out.police.body.segments.is_empty());
    }

    #[test]
    fn test_player_walking_into_police() {
        // Police is waiting on its timer; the player's head is on its head
        let player = [Position::new(5, 5)];
        let police = patrol(vec![Position::new(5, 5), Position::new(4, 5)], 0);
        let mut rng = SequenceRng::constant(0.9);
        let out = tick_police(&police, &ctx(&player), false, &mut rng);
        assert_eq!(out.penalty, POLICE_PENALTY);
    }

    #[test]
    fn test_invincible_player_is_safe_and_police_flees() {
        let player = [Position::new(8, 5)];
        let police = patrol(vec![Position::new(5, 5), Position::new(4, 5)], 2);
        let mut rng = SequenceRng::constant(0.9);
        let out = tick_police(&police, &ctx(&player), true, &mut rng);
        assert_eq!(out.penalty, 0);
        let head = out.police.body.head().unwrap();
        assert!(head.manhattan(Position::new(8, 5)) > Position::new(5, 5).manhattan(Position::new(8, 5)));
    }
}
