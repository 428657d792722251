// src/strategy/optimization.rs

//! Objective for black-box policy search.
//!
//! Each evaluation builds a brand new company from the scenario, so nothing
//! leaks between calls and the same inputs always give the same score.

use crate::error::{ConfigError, SimulationError};
use crate::simulation::config::{PolicyConfig, ScenarioConfig};
use crate::simulation::engine::BloodSupplySimulation;
use crate::strategy::implementations::ReorderPoint;

/// Weight of the worst single day in the score.
pub const WORST_DAY_WEIGHT: f64 = 10.0;

/// Values per platoon in an optimizer vector: `R_fwb, Q_fwb, R_plasma, Q_plasma`.
pub const REORDER_PARAMETERS_PER_PLATOON: usize = 4;

/// Runs the scenario once with `policies` (one per platoon) and scores it.
///
/// Score = `(total unmet + 10 * worst single-commodity unmet on any
/// platoon-day) / (platoons * days)`. Lower is better.
pub fn score(scenario: &ScenarioConfig, policies: &[PolicyConfig]) -> Result<f64, SimulationError> {
    if policies.len() != scenario.platoons.len() {
        return Err(ConfigError::Length {
            field: "policies".to_string(),
            expected: scenario.platoons.len(),
            actual: policies.len(),
        }
        .into());
    }

    let mut config = scenario.clone();
    for (platoon, policy) in config.platoons.iter_mut().zip(policies) {
        platoon.policy = policy.clone();
    }

    let mut sim = BloodSupplySimulation::new(config)?;
    sim.run()?;

    let raw = sim.total_unmet() as f64 + WORST_DAY_WEIGHT * sim.worst_unmet() as f64;
    let cells = (sim.config().platoons.len() * sim.config().days) as f64;
    Ok(raw / cells)
}

/// Maps a flat optimizer vector onto per-platoon reorder-point policies.
pub fn reorder_policies_from_vector(values: &[u32]) -> Result<Vec<PolicyConfig>, ConfigError> {
    if values.is_empty() || values.len() % REORDER_PARAMETERS_PER_PLATOON != 0 {
        return Err(ConfigError::Length {
            field: "parameters".to_string(),
            expected: REORDER_PARAMETERS_PER_PLATOON,
            actual: values.len(),
        });
    }
    Ok(values
        .chunks(REORDER_PARAMETERS_PER_PLATOON)
        .map(|v| PolicyConfig::ReorderPoint {
            fwb: ReorderPoint { r: v[0], q: v[1] },
            plasma: ReorderPoint { r: v[2], q: v[3] },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_maps_four_values_per_platoon() {
        let policies = reorder_policies_from_vector(&[400, 1800, 5, 30, 500, 1000, 5, 20]).unwrap();
        assert_eq!(policies.len(), 2);
        assert_eq!(
            policies[1],
            PolicyConfig::ReorderPoint {
                fwb: ReorderPoint { r: 500, q: 1000 },
                plasma: ReorderPoint { r: 5, q: 20 },
            }
        );
        assert!(reorder_policies_from_vector(&[1, 2, 3]).is_err());
    }

    #[test]
    fn score_is_repeatable() {
        let scenario = ScenarioConfig::reorder_point_demo();
        let policies = reorder_policies_from_vector(&[400, 1800, 5, 30, 500, 1000, 5, 20]).unwrap();
        let first = score(&scenario, &policies).unwrap();
        let second = score(&scenario, &policies).unwrap();
        assert_eq!(first, second);
        assert!(first >= 0.0);
    }

    #[test]
    fn quiet_well_stocked_scenario_scores_zero() {
        let mut scenario = ScenarioConfig::reorder_point_demo();
        for platoon in &mut scenario.platoons {
            platoon.combat_levels = [1.0, 0.0, 0.0, 0.0, 0.0];
        }
        let policies = reorder_policies_from_vector(&[0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(score(&scenario, &policies).unwrap(), 0.0);
    }

    #[test]
    fn policy_count_must_match_platoons() {
        let scenario = ScenarioConfig::reorder_point_demo();
        let policies = reorder_policies_from_vector(&[400, 1800, 5, 30]).unwrap();
        assert!(matches!(
            score(&scenario, &policies),
            Err(SimulationError::Config(ConfigError::Length { expected: 2, actual: 1, .. }))
        ));
    }
}
