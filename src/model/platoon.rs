// src/model/platoon.rs

use crate::error::LedgerError;
use crate::io::demand::DemandSampler;
use crate::model::commodity::{ByCommodity, Commodity};
use crate::model::ledger::{Ledger, Lot};
use crate::strategy::traits::{Order, ReplenishmentPolicy, ReviewContext};
use rand::RngCore;

/// What one platoon did on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatoonDay {
    pub orders: Vec<Order>,
    pub combat_level: usize,
    pub demand: ByCommodity<u32>,
    pub unmet: ByCommodity<u32>,
    pub expired: ByCommodity<u32>,
}

/// A forward medical unit served by the company.
#[derive(Debug)]
pub struct Platoon {
    // Identity
    pub index: usize,
    pub name: String,
    /// Distance from the company, in days at transport speed 1.
    pub distance: u32,

    // State
    pub inventory: ByCommodity<Ledger>,

    demand: Box<dyn DemandSampler>,
    policy: Box<dyn ReplenishmentPolicy>,
}

impl Platoon {
    pub fn new(
        index: usize,
        name: impl Into<String>,
        distance: u32,
        demand: Box<dyn DemandSampler>,
        policy: Box<dyn ReplenishmentPolicy>,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            distance,
            inventory: ByCommodity::default(),
            demand,
            policy,
        }
    }

    /// Stocks the platoon, or receives a shipment still `days_until_arrival`
    /// days out.
    pub fn receive(&mut self, commodity: Commodity, lot: Lot) -> Result<(), LedgerError> {
        self.inventory[commodity].add_lot(lot)
    }

    pub fn on_hand(&self) -> ByCommodity<u32> {
        self.inventory.map(|_, ledger| ledger.on_hand())
    }

    pub fn in_transit(&self) -> ByCommodity<u32> {
        self.inventory.map(|_, ledger| ledger.in_transit())
    }

    /// Runs one day: age stock, draw demand, consume, review the policy.
    ///
    /// Orders are returned for same-day allocation by the company.
    pub fn step(&mut self, rng: &mut dyn RngCore) -> PlatoonDay {
        let mut expired = ByCommodity::default();
        for (commodity, ledger) in self.inventory.iter_mut() {
            expired[commodity] = ledger.advance_one_day();
        }

        let today = self.demand.sample(rng);

        let mut unmet = ByCommodity::default();
        for (commodity, ledger) in self.inventory.iter_mut() {
            unmet[commodity] = ledger.consume(today.demand[commodity]);
        }

        let context = ReviewContext {
            platoon: self.index,
            on_hand: self.on_hand(),
            in_transit: self.in_transit(),
            demand: today.demand,
        };
        let orders = self.policy.review(&context, rng);

        PlatoonDay {
            orders,
            combat_level: today.combat_level,
            demand: today.demand,
            unmet,
            expired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::demand::{ConstantDemand, ScheduledDemand};
    use crate::strategy::implementations::{ReorderPoint, ReorderPointPolicy};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reorder_policy(r: u32, q: u32) -> Box<dyn ReplenishmentPolicy> {
        Box::new(ReorderPointPolicy::new(ByCommodity::new(
            ReorderPoint { r, q },
            ReorderPoint { r: 0, q: 0 },
        )))
    }

    #[test]
    fn step_ages_then_consumes_then_reviews() {
        let mut platoon = Platoon::new(
            0,
            "Platoon1",
            2,
            Box::new(ConstantDemand::new(30, 2)),
            reorder_policy(50, 100),
        );
        platoon.receive(Commodity::Fwb, Lot::new(10, 1, 0)).unwrap();
        platoon.receive(Commodity::Fwb, Lot::new(40, 5, 0)).unwrap();
        platoon.receive(Commodity::Plasma, Lot::new(1, 9, 0)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let day = platoon.step(&mut rng);

        assert_eq!(day.expired, ByCommodity::new(10, 0));
        assert_eq!(day.unmet, ByCommodity::new(0, 1));
        assert_eq!(platoon.on_hand(), ByCommodity::new(10, 0));
        assert_eq!(
            day.orders,
            vec![Order {
                commodity: Commodity::Fwb,
                quantity: 100,
                platoon: 0
            }]
        );
    }

    #[test]
    fn in_transit_stock_is_not_consumed_and_blocks_reorder() {
        let mut platoon = Platoon::new(
            1,
            "Platoon2",
            3,
            Box::new(ScheduledDemand::new(vec![
                ByCommodity::new(5, 0),
                ByCommodity::new(5, 0),
            ])),
            reorder_policy(50, 100),
        );
        platoon.receive(Commodity::Fwb, Lot::new(100, 20, 3)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let day = platoon.step(&mut rng);
        assert_eq!(day.unmet, ByCommodity::new(5, 0));
        assert!(day.orders.is_empty());
        assert_eq!(platoon.in_transit(), ByCommodity::new(100, 0));
    }
}
