//! Cash pickups: two value tiers, capped board population

use serde::{Deserialize, Serialize};

use super::grid::{Position, random_free_position};
use super::rng::GameRng;
use super::state::{Expiring, Occupancy};
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashItem {
    pub position: Position,
    pub spawn_tick: u64,
    pub lifetime: u64,
    pub value: u32,
}

impl Expiring for CashItem {
    fn spawn_tick(&self) -> u64 {
        self.spawn_tick
    }

    fn lifetime(&self) -> u64 {
        self.lifetime
    }
}

impl CashItem {
    pub fn should_spawn(count: usize, rng: &mut dyn GameRng) -> bool {
        count < MAX_CASH_ITEMS && rng.chance(CASH_SPAWN_CHANCE)
    }

    /// `occ` should already include the other cash items
    pub fn generate(occ: &Occupancy, tick: u64, rng: &mut dyn GameRng) -> Self {
        let position = random_free_position(rng, |p| occ.is_blocked(p));
        let value = if rng.chance(CASH_HIGH_CHANCE) {
            CASH_HIGH_VALUE
        } else {
            CASH_LOW_VALUE
        };
        Self {
            position,
            spawn_tick: tick,
            lifetime: CASH_LIFETIME,
            value,
        }
    }

    pub fn collect(&self, head: Position) -> bool {
        self.position == head
    }
}

/// Expire and collect. Returns (remaining items, collected value).
pub fn advance_cash(items: &[CashItem], head: Position, tick: u64) -> (Vec<CashItem>, u32) {
    let mut collected = 0;
    let mut remaining = Vec::with_capacity(items.len());
    for item in items.iter().filter(|c| !c.is_expired(tick)) {
        if item.collect(head) {
            collected += item.value;
        } else {
            remaining.push(item.clone());
        }
    }
    (remaining, collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SequenceRng;

    fn cash(x: i32, value: u32) -> CashItem {
        CashItem {
            position: Position::new(x, 4),
            spawn_tick: 0,
            lifetime: CASH_LIFETIME,
            value,
        }
    }

    #[test]
    fn test_value_tiers() {
        let occ = Occupancy::new(&[], None, &[]);
        // placement draws x, y, then the tier roll
        let mut rng = SequenceRng::new(vec![0.5, 0.5, 0.1]);
        assert_eq!(CashItem::generate(&occ, 3, &mut rng).value, CASH_HIGH_VALUE);
        let mut rng = SequenceRng::new(vec![0.5, 0.5, 0.9]);
        let item = CashItem::generate(&occ, 3, &mut rng);
        assert_eq!(item.value, CASH_LOW_VALUE);
        assert_eq!(item.spawn_tick, 3);
    }

    #[test]
    fn test_collect_and_expire() {
        let items = vec![cash(1, 5), cash(2, 20)];
        let (remaining, value) = advance_cash(&items, Position::new(2, 4), 10);
        assert_eq!(value, 20);
        assert_eq!(remaining, vec![cash(1, 5)]);

        let (remaining, value) = advance_cash(&items, Position::new(2, 4), CASH_LIFETIME + 1);
        assert_eq!(value, 0);
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_population_cap() {
        let mut rng = SequenceRng::constant(0.0);
        assert!(CashItem::should_spawn(0, &mut rng));
        assert!(!CashItem::should_spawn(MAX_CASH_ITEMS, &mut rng));
    }
}
