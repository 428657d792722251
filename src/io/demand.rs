// src/io/demand.rs

use crate::error::ConfigError;
use crate::model::commodity::ByCommodity;
use rand::distributions::WeightedIndex;
use rand::RngCore;
use rand_distr::{Distribution, Exp, Normal};
use std::fmt::Debug;

/// Number of combat intensity levels (0 = quiet, 4 = heaviest).
pub const COMBAT_LEVELS: usize = 5;

/// Share of casualties that need a transfusion.
const TRANSFUSION_RATE: f64 = 0.2;
/// Mean of the exponential multiplier applied to transfusions.
const EXPONENTIAL_MEAN: f64 = 0.1116;
/// Pints per unit of the exponential multiplier.
const PINTS_SCALE: f64 = 4815.0;
/// Plasma share of total transfusion demand; FWB takes the rest.
const PLASMA_FRACTION: f64 = 0.02;

/// One day of demand for a platoon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyDemand {
    pub combat_level: usize,
    pub demand: ByCommodity<u32>,
}

/// Source of daily demand. Randomness comes from the caller.
pub trait DemandSampler: Debug + Send {
    fn sample(&mut self, rng: &mut dyn RngCore) -> DailyDemand;
}

/// Demand driven by a combat level drawn fresh every day.
///
/// Levels are independent across days. Casualties follow a normal
/// distribution with mean `level` and standard deviation `level / 2`,
/// floored at zero, and are converted to pints with an exponential
/// multiplier.
#[derive(Debug, Clone)]
pub struct CombatDemandModel {
    levels: WeightedIndex<f64>,
    multiplier: Exp<f64>,
}

impl CombatDemandModel {
    pub fn new(probabilities: &[f64; COMBAT_LEVELS]) -> Result<Self, ConfigError> {
        let levels = WeightedIndex::new(probabilities.iter().copied()).map_err(|_| {
            ConfigError::ProbabilitySum {
                field: "combat_levels".to_string(),
                sum: probabilities.iter().sum(),
            }
        })?;
        let multiplier = Exp::new(1.0 / EXPONENTIAL_MEAN)
            .map_err(|_| ConfigError::non_positive("exponential mean"))?;
        Ok(Self { levels, multiplier })
    }

    fn casualties(level: usize, rng: &mut dyn RngCore) -> f64 {
        if level == 0 {
            return 0.0;
        }
        let mean = level as f64;
        match Normal::new(mean, mean * 0.5) {
            Ok(normal) => normal.sample(rng).max(0.0),
            Err(_) => 0.0,
        }
    }
}

impl DemandSampler for CombatDemandModel {
    fn sample(&mut self, rng: &mut dyn RngCore) -> DailyDemand {
        let combat_level = self.levels.sample(rng);
        let casualties = Self::casualties(combat_level, rng);
        let transfusions =
            casualties * TRANSFUSION_RATE * self.multiplier.sample(rng) * PINTS_SCALE;
        let plasma = transfusions * PLASMA_FRACTION;
        let fwb = transfusions - plasma;

        DailyDemand {
            combat_level,
            demand: ByCommodity::new(fwb.round() as u32, plasma.round() as u32),
        }
    }
}

/// The same demand every day. Useful for steady-state checks.
#[derive(Debug, Clone)]
pub struct ConstantDemand {
    demand: ByCommodity<u32>,
}

impl ConstantDemand {
    pub fn new(fwb: u32, plasma: u32) -> Self {
        Self {
            demand: ByCommodity::new(fwb, plasma),
        }
    }
}

impl DemandSampler for ConstantDemand {
    fn sample(&mut self, _rng: &mut dyn RngCore) -> DailyDemand {
        DailyDemand {
            combat_level: 0,
            demand: self.demand,
        }
    }
}

/// A scripted demand sequence; days past the end of the schedule have
/// zero demand.
#[derive(Debug, Clone)]
pub struct ScheduledDemand {
    schedule: Vec<ByCommodity<u32>>,
    day: usize,
}

impl ScheduledDemand {
    pub fn new(schedule: Vec<ByCommodity<u32>>) -> Self {
        Self { schedule, day: 0 }
    }
}

impl DemandSampler for ScheduledDemand {
    fn sample(&mut self, _rng: &mut dyn RngCore) -> DailyDemand {
        let demand = self.schedule.get(self.day).copied().unwrap_or_default();
        self.day += 1;
        DailyDemand {
            combat_level: 0,
            demand,
        }
    }
}
