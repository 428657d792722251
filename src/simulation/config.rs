// src/simulation/config.rs

use crate::error::ConfigError;
use crate::io::demand::COMBAT_LEVELS;
use crate::model::commodity::{ByCommodity, Commodity};
use crate::model::company::AllocationPriority;
use crate::strategy::implementations::ReorderPoint;
use serde::{Deserialize, Serialize};

/// Tolerance for combat level probabilities summing to one.
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// A starting stock entry: `(type, quantity, days until expiry)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub commodity: Commodity,
    pub quantity: u32,
    pub days_until_expiry: i32,
}

impl InventoryEntry {
    pub fn new(commodity: Commodity, quantity: u32, days_until_expiry: i32) -> Self {
        Self {
            commodity,
            quantity,
            days_until_expiry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    ReorderPoint {
        fwb: ReorderPoint,
        plasma: ReorderPoint,
    },
    TargetFeedback {
        avg_order_interval: u32,
        max_order_interval: u32,
        target: ByCommodity<u32>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    pub speed: f64,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatoonConfig {
    pub name: String,
    /// Days of travel at speed 1.
    pub distance: u32,
    /// Headcount, used only for per-person KPIs.
    #[serde(default = "default_personnel")]
    pub personnel: u32,
    /// Probability of each combat level 0..=4 on any given day.
    pub combat_levels: [f64; COMBAT_LEVELS],
    pub transport: TransportConfig,
    #[serde(default)]
    pub initial_inventory: Vec<InventoryEntry>,
    pub policy: PolicyConfig,
}

fn default_personnel() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub days: usize,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub allocation_priority: AllocationPriority,
    #[serde(default)]
    pub company_inventory: Vec<InventoryEntry>,
    pub platoons: Vec<PlatoonConfig>,
}

impl Default for ScenarioConfig {
    /// Two platoons under target-feedback review, both on a speed 1 lane.
    fn default() -> Self {
        Self {
            days: 15,
            seed: 2443563274,
            allocation_priority: AllocationPriority::ListOrder,
            company_inventory: vec![
                InventoryEntry::new(Commodity::Fwb, 2000, 40),
                InventoryEntry::new(Commodity::Plasma, 2000, 300),
                InventoryEntry::new(Commodity::Fwb, 15000, 10),
                InventoryEntry::new(Commodity::Fwb, 10000, 15),
            ],
            platoons: vec![
                PlatoonConfig {
                    name: "Platoon1".to_string(),
                    distance: 3,
                    personnel: 40,
                    combat_levels: [0.6, 0.2, 0.1, 0.05, 0.05],
                    transport: TransportConfig {
                        speed: 1.0,
                        capacity: 10000,
                    },
                    initial_inventory: vec![
                        InventoryEntry::new(Commodity::Fwb, 750, 10),
                        InventoryEntry::new(Commodity::Plasma, 30, 300),
                    ],
                    policy: PolicyConfig::TargetFeedback {
                        avg_order_interval: 3,
                        max_order_interval: 5,
                        target: ByCommodity::new(1000, 40),
                    },
                },
                PlatoonConfig {
                    name: "Platoon2".to_string(),
                    distance: 2,
                    personnel: 40,
                    combat_levels: [0.7, 0.2, 0.05, 0.03, 0.02],
                    transport: TransportConfig {
                        speed: 1.0,
                        capacity: 10000,
                    },
                    initial_inventory: vec![
                        InventoryEntry::new(Commodity::Plasma, 40, 20),
                        InventoryEntry::new(Commodity::Fwb, 300, 5),
                        InventoryEntry::new(Commodity::Fwb, 800, 20),
                    ],
                    policy: PolicyConfig::TargetFeedback {
                        avg_order_interval: 4,
                        max_order_interval: 7,
                        target: ByCommodity::new(1000, 40),
                    },
                },
            ],
        }
    }
}

impl ScenarioConfig {
    /// The default scenario switched to reorder-point control over 100 days.
    pub fn reorder_point_demo() -> Self {
        let mut config = Self {
            days: 100,
            ..Self::default()
        };
        let rules = [
            (ReorderPoint { r: 400, q: 1800 }, ReorderPoint { r: 5, q: 30 }),
            (ReorderPoint { r: 500, q: 1000 }, ReorderPoint { r: 5, q: 20 }),
        ];
        for (platoon, (fwb, plasma)) in config.platoons.iter_mut().zip(rules) {
            platoon.policy = PolicyConfig::ReorderPoint { fwb, plasma };
        }
        config
    }

    /// Checks every field; the error names the first offending one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days == 0 {
            return Err(ConfigError::non_positive("days"));
        }
        if self.platoons.is_empty() {
            return Err(ConfigError::non_positive("platoons"));
        }
        validate_inventory("company_inventory", &self.company_inventory)?;
        for (i, platoon) in self.platoons.iter().enumerate() {
            let path = format!("platoons[{i}]");
            if platoon.name.trim().is_empty() {
                return Err(ConfigError::EmptyName {
                    field: format!("{path}.name"),
                });
            }
            // Names key the wide table columns.
            if let Some(first) = self.platoons[..i].iter().position(|p| p.name == platoon.name) {
                return Err(ConfigError::DuplicateName {
                    field: format!("{path}.name"),
                    name: platoon.name.clone(),
                    first: format!("platoons[{first}]"),
                });
            }
            platoon.validate(&path)?;
        }
        Ok(())
    }
}

impl PlatoonConfig {
    fn validate(&self, path: &str) -> Result<(), ConfigError> {
        let mut sum = 0.0;
        for (level, &p) in self.combat_levels.iter().enumerate() {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::ProbabilityRange {
                    field: format!("{path}.combat_levels[{level}]"),
                    value: p,
                });
            }
            sum += p;
        }
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ConfigError::ProbabilitySum {
                field: format!("{path}.combat_levels"),
                sum,
            });
        }

        if !(self.transport.speed.is_finite() && self.transport.speed > 0.0) {
            return Err(ConfigError::non_positive(format!("{path}.transport.speed")));
        }
        let capacity = self.transport.capacity;
        if capacity == 0 {
            return Err(ConfigError::non_positive(format!(
                "{path}.transport.capacity"
            )));
        }

        validate_inventory(&format!("{path}.initial_inventory"), &self.initial_inventory)?;

        match &self.policy {
            PolicyConfig::ReorderPoint { fwb, plasma } => {
                for (name, rule) in [("fwb", fwb), ("plasma", plasma)] {
                    if rule.q > capacity {
                        return Err(ConfigError::OrderExceedsCapacity {
                            field: format!("{path}.policy.{name}.q"),
                            quantity: rule.q,
                            capacity,
                        });
                    }
                }
            }
            PolicyConfig::TargetFeedback {
                avg_order_interval,
                max_order_interval,
                ..
            } => {
                if *avg_order_interval == 0 {
                    return Err(ConfigError::non_positive(format!(
                        "{path}.policy.avg_order_interval"
                    )));
                }
                if avg_order_interval > max_order_interval {
                    return Err(ConfigError::IntervalRange {
                        field: format!("{path}.policy.avg_order_interval"),
                        avg: *avg_order_interval,
                        max: *max_order_interval,
                    });
                }
            }
        }
        Ok(())
    }
}

fn validate_inventory(path: &str, entries: &[InventoryEntry]) -> Result<(), ConfigError> {
    for (i, entry) in entries.iter().enumerate() {
        if entry.quantity == 0 {
            return Err(ConfigError::non_positive(format!("{path}[{i}].quantity")));
        }
        if entry.days_until_expiry <= 0 {
            return Err(ConfigError::non_positive(format!(
                "{path}[{i}].days_until_expiry"
            )));
        }
    }
    Ok(())
}
