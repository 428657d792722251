// src/model/allocator.rs

use crate::error::LedgerError;
use crate::model::commodity::{ByCommodity, Commodity};
use crate::model::ledger::{Ledger, Lot};
use crate::model::transport::TransportLane;
use crate::strategy::traits::Order;
use tracing::{debug, warn};

/// What leaves the company for one platoon on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shipment {
    pub platoon: usize,
    /// Lots as they left central stock; the receiver sets the arrival delay.
    pub lots: Vec<(Commodity, Lot)>,
    pub transport_days_used: u32,
    pub transport_space_used: u32,
}

impl Shipment {
    pub fn quantity(&self) -> u32 {
        self.lots.iter().map(|(_, lot)| lot.quantity).sum()
    }
}

/// Fills one platoon's orders from central stock within the lane capacity.
///
/// When everything fits, each commodity ships in full. Otherwise FWB is
/// loaded first and Plasma takes what capacity is left; the unshipped part of
/// the order is dropped, not carried over. Short central stock ships what is
/// there.
pub fn allocate(
    platoon: usize,
    orders: &[Order],
    central: &mut ByCommodity<Ledger>,
    lane: &TransportLane,
    lead_time: u32,
) -> Result<Shipment, LedgerError> {
    let mut requested = ByCommodity::<u32>::default();
    for order in orders {
        requested[order.commodity] += order.quantity;
    }
    let total_requested = requested.total();

    let mut remaining_capacity = lane.capacity;
    if !lane.can_carry(total_requested) {
        debug!(
            platoon,
            requested = total_requested,
            capacity = lane.capacity,
            "order exceeds lane capacity, shipping partially"
        );
    }

    let mut lots = Vec::new();
    for commodity in Commodity::ALL {
        let ledger = &mut central[commodity];
        let available = ledger.total();
        let quantity = requested[commodity]
            .min(available)
            .min(remaining_capacity);
        if requested[commodity] > available {
            warn!(
                platoon,
                %commodity,
                requested = requested[commodity],
                available,
                "central stock short"
            );
        }
        if quantity == 0 {
            continue;
        }
        for lot in ledger.export(quantity)? {
            lots.push((commodity, lot));
        }
        remaining_capacity -= quantity;
    }

    let shipped = lane.capacity - remaining_capacity;
    let transport_days_used = if shipped > 0 { lead_time } else { 0 };
    Ok(Shipment {
        platoon,
        lots,
        transport_days_used,
        transport_space_used: shipped,
    })
}
