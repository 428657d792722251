// src/simulation/engine.rs

use crate::error::{ConfigError, LedgerError, SimulationError};
use crate::io::demand::CombatDemandModel;
use crate::model::commodity::ByCommodity;
use crate::model::company::{Company, PlatoonMetrics};
use crate::model::ledger::Lot;
use crate::model::platoon::Platoon;
use crate::model::transport::TransportLane;
use crate::simulation::config::{PolicyConfig, ScenarioConfig};
use crate::strategy::implementations::{ReorderPointPolicy, TargetFeedbackPolicy};
use crate::strategy::traits::ReplenishmentPolicy;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use tracing::info;

/// Metric names in column order; every platoon contributes one column each.
pub const METRIC_COLUMNS: [&str; 6] = [
    "TransDays",
    "TransSpace",
    "FWBUnmet",
    "PlasmaUnmet",
    "FWBExpired",
    "PlasmaExpired",
];

// One row per platoon per day, written to CSV.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    pub day: usize,
    pub platoon: String,
    pub combat_level: usize,
    pub fwb_demand: u32,
    pub plasma_demand: u32,
    pub orders_placed: u32,
    pub transport_days_used: u32,
    pub transport_space_used: u32,
    pub fwb_unmet: u32,
    pub plasma_unmet: u32,
    pub fwb_expired: u32,
    pub plasma_expired: u32,
    pub fwb_on_hand: u32,
    pub plasma_on_hand: u32,
}

impl HistoryRecord {
    pub fn metrics(&self) -> PlatoonMetrics {
        PlatoonMetrics {
            transport_days_used: self.transport_days_used,
            transport_space_used: self.transport_space_used,
            fwb_unmet: self.fwb_unmet,
            plasma_unmet: self.plasma_unmet,
            fwb_expired: self.fwb_expired,
            plasma_expired: self.plasma_expired,
        }
    }

    pub fn total_unmet(&self) -> u32 {
        self.fwb_unmet + self.plasma_unmet
    }
}

/// Wide results: one row per day, six columns per platoon with a fixed
/// stride, then six company-wide sums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    pub platoon_names: Vec<String>,
    pub rows: Vec<Vec<u32>>,
}

impl ResultTable {
    pub fn from_history(platoon_names: Vec<String>, history: &[HistoryRecord]) -> Self {
        let stride = METRIC_COLUMNS.len();
        let platoon_count = platoon_names.len();
        let mut rows: Vec<Vec<u32>> = Vec::new();
        for chunk in history.chunks(platoon_count.max(1)) {
            let mut row = Vec::with_capacity(platoon_count * stride);
            for record in chunk {
                let m = record.metrics();
                row.extend([
                    m.transport_days_used,
                    m.transport_space_used,
                    m.fwb_unmet,
                    m.plasma_unmet,
                    m.fwb_expired,
                    m.plasma_expired,
                ]);
            }
            rows.push(row);
        }
        Self {
            platoon_names,
            rows,
        }
    }

    /// `<Platoon>_<Metric>` for every platoon, then `Company_<Metric>`.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .platoon_names
            .iter()
            .flat_map(|p| METRIC_COLUMNS.iter().map(move |m| format!("{p}_{m}")))
            .collect();
        names.extend(METRIC_COLUMNS.iter().map(|m| format!("Company_{m}")));
        names
    }

    /// Sums every sixth column starting at each metric's offset.
    pub fn company_totals(&self) -> Vec<[u32; 6]> {
        let stride = METRIC_COLUMNS.len();
        self.rows
            .iter()
            .map(|row| {
                let mut totals = [0u32; 6];
                for (offset, total) in totals.iter_mut().enumerate() {
                    *total = row.iter().skip(offset).step_by(stride).sum();
                }
                totals
            })
            .collect()
    }

    /// Platoon columns followed by the company sums.
    pub fn full_rows(&self) -> Vec<Vec<u32>> {
        self.rows
            .iter()
            .zip(self.company_totals())
            .map(|(row, totals)| row.iter().copied().chain(totals).collect())
            .collect()
    }
}

/// Drives a company through a fixed number of days.
pub struct BloodSupplySimulation {
    config: ScenarioConfig,
    pub company: Company,
    rng: StdRng,
    pub current_day: usize,
    pub history: Vec<HistoryRecord>,
}

impl BloodSupplySimulation {
    /// Validates the scenario and builds a fresh company from it.
    pub fn new(config: ScenarioConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let company = build_company(&config, &mut rng)?;
        Ok(Self {
            config,
            company,
            rng,
            current_day: 1,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn run(&mut self) -> Result<(), SimulationError> {
        info!(
            days = self.config.days,
            platoons = self.company.platoons.len(),
            "simulation started"
        );
        while self.current_day <= self.config.days {
            self.step()?;
        }
        info!(
            total_unmet = self.total_unmet(),
            total_expired = self.total_expired(),
            "simulation complete"
        );
        Ok(())
    }

    /// Advances one day. Any ledger fault aborts the run, since aging is
    /// cumulative and a skipped day cannot be recovered.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        let day = self.current_day;
        let ledger_fault = |source: LedgerError| SimulationError::Ledger { day, source };

        let outcome = self.company.step(&mut self.rng).map_err(ledger_fault)?;
        self.company.check_invariants().map_err(ledger_fault)?;

        for ((platoon, today), metrics) in self
            .company
            .platoons
            .iter()
            .zip(&outcome.platoons)
            .zip(outcome.metrics())
        {
            let on_hand = platoon.on_hand();
            self.history.push(HistoryRecord {
                day,
                platoon: platoon.name.clone(),
                combat_level: today.combat_level,
                fwb_demand: today.demand.fwb,
                plasma_demand: today.demand.plasma,
                orders_placed: today.orders.iter().map(|o| o.quantity).sum(),
                transport_days_used: metrics.transport_days_used,
                transport_space_used: metrics.transport_space_used,
                fwb_unmet: metrics.fwb_unmet,
                plasma_unmet: metrics.plasma_unmet,
                fwb_expired: metrics.fwb_expired,
                plasma_expired: metrics.plasma_expired,
                fwb_on_hand: on_hand.fwb,
                plasma_on_hand: on_hand.plasma,
            });
        }

        if day % 5 == 0 {
            info!(
                day,
                central_fwb = self.company.central.fwb.total(),
                central_plasma = self.company.central.plasma.total(),
                unmet_today = outcome
                    .metrics()
                    .iter()
                    .map(|m| m.fwb_unmet + m.plasma_unmet)
                    .sum::<u32>(),
                "progress"
            );
        }
        self.current_day += 1;
        Ok(())
    }

    pub fn result_table(&self) -> ResultTable {
        let names = self
            .company
            .platoons
            .iter()
            .map(|p| p.name.clone())
            .collect();
        ResultTable::from_history(names, &self.history)
    }

    pub fn total_unmet(&self) -> u64 {
        self.history.iter().map(|r| r.total_unmet() as u64).sum()
    }

    pub fn total_expired(&self) -> u64 {
        self.history
            .iter()
            .map(|r| (r.fwb_expired + r.plasma_expired) as u64)
            .sum()
    }

    /// Largest single-commodity unmet demand of any platoon on any day.
    pub fn worst_unmet(&self) -> u32 {
        self.history
            .iter()
            .map(|r| r.fwb_unmet.max(r.plasma_unmet))
            .max()
            .unwrap_or(0)
    }

    /// Total unmet demand per platoon over the run, in platoon order.
    pub fn unmet_breakdown(&self) -> Vec<(String, u64)> {
        let platoons = &self.company.platoons;
        let mut totals = vec![0u64; platoons.len()];
        // History holds one record per platoon per day, in platoon order.
        for day in self.history.chunks(platoons.len().max(1)) {
            for (total, record) in totals.iter_mut().zip(day) {
                *total += record.total_unmet() as u64;
            }
        }
        platoons
            .iter()
            .map(|platoon| platoon.name.clone())
            .zip(totals)
            .collect()
    }
}

/// Builds platoons, lanes and central stock for a validated scenario.
pub fn build_company(
    config: &ScenarioConfig,
    rng: &mut dyn RngCore,
) -> Result<Company, ConfigError> {
    let mut platoons = Vec::with_capacity(config.platoons.len());
    let mut lanes = Vec::with_capacity(config.platoons.len());

    for (index, pc) in config.platoons.iter().enumerate() {
        let policy: Box<dyn ReplenishmentPolicy> = match &pc.policy {
            PolicyConfig::ReorderPoint { fwb, plasma } => {
                Box::new(ReorderPointPolicy::new(ByCommodity::new(*fwb, *plasma)))
            }
            PolicyConfig::TargetFeedback {
                avg_order_interval,
                max_order_interval,
                target,
            } => Box::new(TargetFeedbackPolicy::new(
                *avg_order_interval,
                *max_order_interval,
                *target,
                rng,
            )?),
        };
        let demand = Box::new(CombatDemandModel::new(&pc.combat_levels)?);

        let mut platoon = Platoon::new(index, pc.name.clone(), pc.distance, demand, policy);
        for entry in &pc.initial_inventory {
            platoon
                .receive(entry.commodity, Lot::new(entry.quantity, entry.days_until_expiry, 0))
                .map_err(|_| {
                    ConfigError::non_positive(format!("platoons[{index}].initial_inventory"))
                })?;
        }
        platoons.push(platoon);
        lanes.push(TransportLane::new(
            format!("{}T1", pc.name),
            pc.transport.speed,
            pc.transport.capacity,
        ));
    }

    let mut company = Company::new(platoons, lanes, config.allocation_priority)?;
    for entry in &config.company_inventory {
        company
            .add_inventory(entry.commodity, entry.quantity, entry.days_until_expiry)
            .map_err(|_| ConfigError::non_positive("company_inventory"))?;
    }
    Ok(company)
}
