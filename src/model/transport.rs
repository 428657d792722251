// src/model/transport.rs

use serde::{Deserialize, Serialize};

/// The single conduit between the company and one platoon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportLane {
    #[serde(default)]
    pub name: String,
    /// Distance units covered per day.
    pub speed: f64,
    /// Pints per shipment, both products combined.
    pub capacity: u32,
}

impl TransportLane {
    pub fn new(name: impl Into<String>, speed: f64, capacity: u32) -> Self {
        Self {
            name: name.into(),
            speed,
            capacity,
        }
    }

    /// Days a shipment spends on the road to a platoon `distance` away.
    pub fn lead_time(&self, distance: u32) -> u32 {
        (distance as f64 / self.speed).ceil() as u32
    }

    pub fn can_carry(&self, quantity: u32) -> bool {
        quantity <= self.capacity
    }
}
