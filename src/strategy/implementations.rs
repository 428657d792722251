// src/strategy/implementations.rs

use crate::error::ConfigError;
use crate::model::commodity::{ByCommodity, Commodity};
use crate::strategy::traits::{Order, ReplenishmentPolicy, ReviewContext};
use rand::RngCore;
use rand_distr::{Distribution, Triangular};
use serde::{Deserialize, Serialize};

// =========================================================================
// 1. Reorder-Point / Quantity Policy
// =========================================================================

/// Threshold `r` and fixed order size `q` for one commodity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPoint {
    pub r: u32,
    pub q: u32,
}

/// Orders a fixed `q` whenever on-hand stock drops below `r`.
///
/// At most one order per commodity is outstanding at a time: while a
/// shipment is still in transit the rule stays quiet, even if stock is
/// below the threshold.
#[derive(Debug, Clone)]
pub struct ReorderPointPolicy {
    rules: ByCommodity<ReorderPoint>,
}

impl ReorderPointPolicy {
    pub fn new(rules: ByCommodity<ReorderPoint>) -> Self {
        Self { rules }
    }

    /// Returns the order quantity for `commodity`, if one is due today.
    pub fn check_and_maybe_order(
        &self,
        commodity: Commodity,
        on_hand: u32,
        outstanding: bool,
    ) -> Option<u32> {
        let rule = self.rules[commodity];
        if on_hand < rule.r && !outstanding && rule.q > 0 {
            Some(rule.q)
        } else {
            None
        }
    }
}

impl ReplenishmentPolicy for ReorderPointPolicy {
    fn review(&mut self, context: &ReviewContext, _rng: &mut dyn RngCore) -> Vec<Order> {
        Commodity::ALL
            .into_iter()
            .filter_map(|commodity| {
                let outstanding = context.in_transit[commodity] > 0;
                self.check_and_maybe_order(commodity, context.on_hand[commodity], outstanding)
                    .map(|quantity| Order {
                        commodity,
                        quantity,
                        platoon: context.platoon,
                    })
            })
            .collect()
    }
}

// =========================================================================
// 2. Target-Feedback Policy
// =========================================================================

/// Review cycle drawn from a triangular distribution over
/// `[max(1, avg - (max - avg)), avg, max]`, rounded to whole days.
#[derive(Debug, Clone)]
struct ReviewInterval {
    fixed: u32,
    distribution: Option<Triangular<f64>>,
}

impl ReviewInterval {
    fn new(avg: u32, max: u32) -> Result<Self, ConfigError> {
        let range_error = || ConfigError::IntervalRange {
            field: "avg_order_interval".to_string(),
            avg,
            max,
        };
        if avg == 0 {
            return Err(ConfigError::non_positive("avg_order_interval"));
        }
        if avg > max {
            return Err(range_error());
        }

        let min = (2 * avg as i64 - max as i64).max(1);
        if min as u32 == max {
            return Ok(Self {
                fixed: max,
                distribution: None,
            });
        }
        let distribution =
            Triangular::new(min as f64, max as f64, avg as f64).map_err(|_| range_error())?;
        Ok(Self {
            fixed: max,
            distribution: Some(distribution),
        })
    }

    fn sample(&self, rng: &mut dyn RngCore) -> u32 {
        match &self.distribution {
            Some(dist) => (dist.sample(rng).round() as u32).max(1),
            None => self.fixed,
        }
    }
}

/// Periodically tops stock back up to a target level.
///
/// Every review orders `max(target - on_hand, 0)` per commodity. There is no
/// outstanding-order guard, so a review can order again before the previous
/// shipment has arrived.
#[derive(Debug, Clone)]
pub struct TargetFeedbackPolicy {
    target: ByCommodity<u32>,
    interval: ReviewInterval,
    countdown: u32,
    demand_since_review: ByCommodity<u32>,
}

impl TargetFeedbackPolicy {
    pub fn new(
        avg_order_interval: u32,
        max_order_interval: u32,
        target: ByCommodity<u32>,
        rng: &mut dyn RngCore,
    ) -> Result<Self, ConfigError> {
        let interval = ReviewInterval::new(avg_order_interval, max_order_interval)?;
        let countdown = interval.sample(rng);
        Ok(Self {
            target,
            interval,
            countdown,
            demand_since_review: ByCommodity::default(),
        })
    }

    /// Days left until the next review.
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn demand_since_review(&self) -> ByCommodity<u32> {
        self.demand_since_review
    }

    /// Advances the review clock by one day.
    ///
    /// Returns `Some` only on a review day; the vector holds the commodities
    /// that are below target.
    pub fn tick(&mut self, context: &ReviewContext, rng: &mut dyn RngCore) -> Option<Vec<Order>> {
        for (commodity, demand) in context.demand.iter() {
            self.demand_since_review[commodity] += demand;
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return None;
        }

        let orders = Commodity::ALL
            .into_iter()
            .filter_map(|commodity| {
                let quantity = self.target[commodity].saturating_sub(context.on_hand[commodity]);
                (quantity > 0).then_some(Order {
                    commodity,
                    quantity,
                    platoon: context.platoon,
                })
            })
            .collect();

        self.demand_since_review = ByCommodity::default();
        self.countdown = self.interval.sample(rng);
        Some(orders)
    }
}

impl ReplenishmentPolicy for TargetFeedbackPolicy {
    fn review(&mut self, context: &ReviewContext, rng: &mut dyn RngCore) -> Vec<Order> {
        self.tick(context, rng).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn context(on_hand: (u32, u32), in_transit: (u32, u32)) -> ReviewContext {
        ReviewContext {
            platoon: 0,
            on_hand: ByCommodity::new(on_hand.0, on_hand.1),
            in_transit: ByCommodity::new(in_transit.0, in_transit.1),
            demand: ByCommodity::default(),
        }
    }

    #[test]
    fn reorder_point_orders_below_threshold() {
        let mut policy = ReorderPointPolicy::new(ByCommodity::new(
            ReorderPoint { r: 400, q: 1800 },
            ReorderPoint { r: 5, q: 30 },
        ));
        let mut rng = StdRng::seed_from_u64(1);

        let orders = policy.review(&context((399, 5), (0, 0)), &mut rng);
        assert_eq!(
            orders,
            vec![Order {
                commodity: Commodity::Fwb,
                quantity: 1800,
                platoon: 0
            }]
        );

        let none = policy.review(&context((400, 6), (0, 0)), &mut rng);
        assert!(none.is_empty());
    }

    #[test]
    fn reorder_point_suppressed_while_order_outstanding() {
        let mut policy = ReorderPointPolicy::new(ByCommodity::new(
            ReorderPoint { r: 400, q: 1800 },
            ReorderPoint { r: 5, q: 30 },
        ));
        let mut rng = StdRng::seed_from_u64(1);

        let first = policy.review(&context((0, 0), (0, 0)), &mut rng);
        assert_eq!(first.len(), 2);

        // FWB shipment still on the road, plasma one arrived and was used up.
        let second = policy.review(&context((0, 0), (1800, 0)), &mut rng);
        assert_eq!(
            second,
            vec![Order {
                commodity: Commodity::Plasma,
                quantity: 30,
                platoon: 0
            }]
        );
        assert_eq!(policy.check_and_maybe_order(Commodity::Fwb, 0, true), None);
    }

    #[test]
    fn fixed_interval_orders_exactly_every_k_days() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut policy =
            TargetFeedbackPolicy::new(4, 4, ByCommodity::new(1000, 40), &mut rng).unwrap();

        let review_days: Vec<u32> = (1..=20)
            .filter(|_| policy.tick(&context((100, 10), (0, 0)), &mut rng).is_some())
            .collect();
        assert_eq!(review_days, vec![4, 8, 12, 16, 20]);
    }

    #[test]
    fn target_feedback_orders_gap_to_target() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut policy =
            TargetFeedbackPolicy::new(1, 1, ByCommodity::new(1000, 40), &mut rng).unwrap();

        let orders = policy
            .tick(&context((700, 50), (900, 0)), &mut rng)
            .unwrap();
        assert_eq!(
            orders,
            vec![Order {
                commodity: Commodity::Fwb,
                quantity: 300,
                platoon: 0
            }]
        );
    }

    #[test]
    fn review_resets_running_demand() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut policy =
            TargetFeedbackPolicy::new(2, 2, ByCommodity::new(10, 10), &mut rng).unwrap();
        let mut ctx = context((0, 0), (0, 0));
        ctx.demand = ByCommodity::new(6, 1);

        assert!(policy.tick(&ctx, &mut rng).is_none());
        assert_eq!(policy.demand_since_review(), ByCommodity::new(6, 1));
        assert!(policy.tick(&ctx, &mut rng).is_some());
        assert_eq!(policy.demand_since_review(), ByCommodity::default());
        assert_eq!(policy.countdown(), 2);
    }

    #[test]
    fn sampled_interval_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let interval = ReviewInterval::new(3, 5).unwrap();
        for _ in 0..500 {
            let days = interval.sample(&mut rng);
            assert!((1..=5).contains(&days), "{days}");
        }
    }

    #[test]
    fn interval_rejects_average_above_maximum() {
        assert!(matches!(
            ReviewInterval::new(6, 5),
            Err(ConfigError::IntervalRange { avg: 6, max: 5, .. })
        ));
        assert!(matches!(
            ReviewInterval::new(0, 5),
            Err(ConfigError::NonPositive { .. })
        ));
    }
}
