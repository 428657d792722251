//! Day-stepped simulation of perishable blood-product stock (Fresh Whole
//! Blood and Plasma) moving from a logistics company to forward platoons.

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;
