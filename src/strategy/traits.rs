// src/strategy/traits.rs

use crate::model::commodity::{ByCommodity, Commodity};
use rand::RngCore;
use serde::Serialize;
use std::fmt::Debug;

/// A replenishment request raised by a platoon. Lives for one simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Order {
    pub commodity: Commodity,
    pub quantity: u32,
    pub platoon: usize,
}

/// What a platoon knows about itself when it reviews its stock.
#[derive(Debug, Clone, Default)]
pub struct ReviewContext {
    pub platoon: usize,
    /// Usable stock after today's consumption.
    pub on_hand: ByCommodity<u32>,
    /// Stock shipped but not yet arrived, i.e. outstanding orders.
    pub in_transit: ByCommodity<u32>,
    /// Today's rounded demand.
    pub demand: ByCommodity<u32>,
}

/// Decides when and how much a platoon orders from the company.
///
/// `review` runs once per simulated day; an empty vector means no order.
/// The random source is injected so runs are reproducible from a seed.
pub trait ReplenishmentPolicy: Debug + Send {
    fn review(&mut self, context: &ReviewContext, rng: &mut dyn RngCore) -> Vec<Order>;
}
