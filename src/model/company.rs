// src/model/company.rs

use crate::error::{ConfigError, LedgerError};
use crate::model::allocator::{allocate, Shipment};
use crate::model::commodity::{ByCommodity, Commodity};
use crate::model::ledger::{Ledger, Lot};
use crate::model::platoon::{Platoon, PlatoonDay};
use crate::model::transport::TransportLane;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which platoon draws on scarce central stock first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPriority {
    /// Platoon list order: the first platoon wins.
    #[default]
    ListOrder,
    /// Most unmet demand today first, ties broken by list order.
    GreatestShortfallFirst,
}

/// Per-platoon metrics for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlatoonMetrics {
    pub transport_days_used: u32,
    pub transport_space_used: u32,
    pub fwb_unmet: u32,
    pub plasma_unmet: u32,
    pub fwb_expired: u32,
    pub plasma_expired: u32,
}

/// Everything that happened across the company on one day.
#[derive(Debug, Clone, Default)]
pub struct CompanyDay {
    pub central_expired: ByCommodity<u32>,
    pub platoons: Vec<PlatoonDay>,
    pub shipments: Vec<Shipment>,
}

impl CompanyDay {
    /// Metrics in platoon index order.
    pub fn metrics(&self) -> Vec<PlatoonMetrics> {
        self.platoons
            .iter()
            .zip(&self.shipments)
            .map(|(day, shipment)| PlatoonMetrics {
                transport_days_used: shipment.transport_days_used,
                transport_space_used: shipment.transport_space_used,
                fwb_unmet: day.unmet.fwb,
                plasma_unmet: day.unmet.plasma,
                fwb_expired: day.expired.fwb,
                plasma_expired: day.expired.plasma,
            })
            .collect()
    }
}

/// The logistics company: central stock plus one lane per platoon.
#[derive(Debug)]
pub struct Company {
    pub central: ByCommodity<Ledger>,
    pub platoons: Vec<Platoon>,
    pub lanes: Vec<TransportLane>,
    pub priority: AllocationPriority,
}

impl Company {
    /// `lanes[i]` serves `platoons[i]`; the two lists must be the same length.
    pub fn new(
        platoons: Vec<Platoon>,
        lanes: Vec<TransportLane>,
        priority: AllocationPriority,
    ) -> Result<Self, ConfigError> {
        if lanes.len() != platoons.len() {
            return Err(ConfigError::Length {
                field: "lanes".to_string(),
                expected: platoons.len(),
                actual: lanes.len(),
            });
        }
        Ok(Self {
            central: ByCommodity::default(),
            platoons,
            lanes,
            priority,
        })
    }

    pub fn add_inventory(
        &mut self,
        commodity: Commodity,
        quantity: u32,
        days_until_expiry: i32,
    ) -> Result<(), LedgerError> {
        self.central[commodity].add(quantity, days_until_expiry, 0)
    }

    pub fn lead_time(&self, platoon: usize) -> u32 {
        self.lanes[platoon].lead_time(self.platoons[platoon].distance)
    }

    /// Runs one day.
    ///
    /// Central stock ages first, then every platoon steps, then a single
    /// allocation pass serves the day's orders in priority order against the
    /// shared central ledgers.
    pub fn step(&mut self, rng: &mut dyn RngCore) -> Result<CompanyDay, LedgerError> {
        let mut central_expired = ByCommodity::default();
        for (commodity, ledger) in self.central.iter_mut() {
            central_expired[commodity] = ledger.advance_one_day();
        }
        debug!(
            fwb = %self.central.fwb,
            plasma = %self.central.plasma,
            "central stock"
        );

        let platoon_days: Vec<PlatoonDay> =
            self.platoons.iter_mut().map(|p| p.step(rng)).collect();

        let mut shipments: Vec<Shipment> = (0..self.platoons.len())
            .map(|platoon| Shipment {
                platoon,
                ..Shipment::default()
            })
            .collect();

        for index in self.allocation_order(&platoon_days) {
            let orders = &platoon_days[index].orders;
            if orders.is_empty() {
                continue;
            }
            let lead_time = self.lead_time(index);
            let shipment = allocate(
                index,
                orders,
                &mut self.central,
                &self.lanes[index],
                lead_time,
            )?;
            for &(commodity, lot) in &shipment.lots {
                self.platoons[index].receive(
                    commodity,
                    Lot {
                        days_until_arrival: lead_time,
                        ..lot
                    },
                )?;
            }
            debug!(
                platoon = %self.platoons[index].name,
                shipped = shipment.quantity(),
                lead_time,
                "shipment dispatched"
            );
            shipments[index] = shipment;
        }

        Ok(CompanyDay {
            central_expired,
            platoons: platoon_days,
            shipments,
        })
    }

    fn allocation_order(&self, days: &[PlatoonDay]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..days.len()).collect();
        if self.priority == AllocationPriority::GreatestShortfallFirst {
            // Stable sort keeps list order among ties.
            order.sort_by_key(|&i| std::cmp::Reverse(days[i].unmet.total()));
        }
        order
    }

    pub fn check_invariants(&self) -> Result<(), LedgerError> {
        for (_, ledger) in self.central.iter() {
            ledger.check_invariants()?;
        }
        for platoon in &self.platoons {
            for (_, ledger) in platoon.inventory.iter() {
                ledger.check_invariants()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::demand::ConstantDemand;
    use crate::strategy::implementations::{ReorderPoint, ReorderPointPolicy};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn platoon(index: usize, distance: u32, fwb_demand: u32, r: u32, q: u32) -> Platoon {
        Platoon::new(
            index,
            format!("Platoon{}", index + 1),
            distance,
            Box::new(ConstantDemand::new(fwb_demand, 0)),
            Box::new(ReorderPointPolicy::new(ByCommodity::new(
                ReorderPoint { r, q },
                ReorderPoint { r: 0, q: 0 },
            ))),
        )
    }

    fn two_platoon_company(priority: AllocationPriority) -> Company {
        let mut company = Company::new(
            vec![platoon(0, 1, 0, 100, 300), platoon(1, 2, 50, 100, 300)],
            vec![
                TransportLane::new("T1", 1.0, 1000),
                TransportLane::new("T2", 1.0, 1000),
            ],
            priority,
        )
        .unwrap();
        company.add_inventory(Commodity::Fwb, 400, 30).unwrap();
        company
    }

    #[test]
    fn first_platoon_wins_scarce_stock_in_list_order() {
        let mut company = two_platoon_company(AllocationPriority::ListOrder);
        let mut rng = StdRng::seed_from_u64(0);

        let day = company.step(&mut rng).unwrap();
        let metrics = day.metrics();

        assert_eq!(metrics[0].transport_space_used, 300);
        assert_eq!(metrics[1].transport_space_used, 100);
        assert_eq!(metrics[0].transport_days_used, 1);
        assert_eq!(metrics[1].transport_days_used, 2);
        assert_eq!(metrics[1].fwb_unmet, 50);
        assert!(company.central.fwb.is_empty());
        assert_eq!(
            company.platoons[1].inventory.fwb.lots(),
            &[Lot::new(100, 29, 2)]
        );
    }

    #[test]
    fn shortfall_priority_serves_neediest_platoon_first() {
        let mut company = two_platoon_company(AllocationPriority::GreatestShortfallFirst);
        let mut rng = StdRng::seed_from_u64(0);

        let metrics = company.step(&mut rng).unwrap().metrics();

        assert_eq!(metrics[1].transport_space_used, 300);
        assert_eq!(metrics[0].transport_space_used, 100);
    }

    #[test]
    fn central_stock_ages_and_expires() {
        let mut company = Company::new(vec![], vec![], AllocationPriority::ListOrder).unwrap();
        company.add_inventory(Commodity::Plasma, 20, 1).unwrap();
        company.add_inventory(Commodity::Plasma, 5, 3).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let day = company.step(&mut rng).unwrap();

        assert_eq!(day.central_expired, ByCommodity::new(0, 20));
        assert_eq!(company.central.plasma.lots(), &[Lot::new(5, 2, 0)]);
        assert!(company.check_invariants().is_ok());
    }

    #[test]
    fn missing_lane_is_rejected_at_construction() {
        let result = Company::new(
            vec![platoon(0, 1, 0, 100, 300), platoon(1, 2, 0, 100, 300)],
            vec![TransportLane::new("T1", 1.0, 1000)],
            AllocationPriority::ListOrder,
        );
        match result {
            Err(ConfigError::Length {
                field,
                expected,
                actual,
            }) => {
                assert_eq!(field, "lanes");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected a length error, got {other:?}"),
        }
    }
}
