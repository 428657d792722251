// src/model/ledger.rs

use crate::error::LedgerError;
use serde::Serialize;
use std::fmt;

/// A quantity of one product sharing the same shelf life and transit delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lot {
    pub quantity: u32,
    pub days_until_expiry: i32,
    pub days_until_arrival: u32,
}

impl Lot {
    pub fn new(quantity: u32, days_until_expiry: i32, days_until_arrival: u32) -> Self {
        Self {
            quantity,
            days_until_expiry,
            days_until_arrival,
        }
    }

    pub fn is_on_hand(&self) -> bool {
        self.days_until_arrival == 0
    }

    fn key(&self) -> (i32, u32) {
        (self.days_until_expiry, self.days_until_arrival)
    }
}

/// Lots of one commodity at one location, ordered by
/// `(days_until_expiry, days_until_arrival)`.
///
/// The order is maintained on insertion, never by re-sorting, so every
/// mutator below keeps it intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    lots: Vec<Lot>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lots(&self) -> &[Lot] {
        &self.lots
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Inserts a lot after every lot with a key less than or equal to its own.
    /// Lots with equal keys are kept as separate entries.
    pub fn add(
        &mut self,
        quantity: u32,
        days_until_expiry: i32,
        days_until_arrival: u32,
    ) -> Result<(), LedgerError> {
        if quantity == 0 {
            return Err(LedgerError::NonPositiveQuantity);
        }
        if days_until_expiry <= 0 {
            return Err(LedgerError::ExpiredLot { days_until_expiry });
        }
        let lot = Lot::new(quantity, days_until_expiry, days_until_arrival);
        let position = self.lots.partition_point(|l| l.key() <= lot.key());
        self.lots.insert(position, lot);
        Ok(())
    }

    pub fn add_lot(&mut self, lot: Lot) -> Result<(), LedgerError> {
        self.add(lot.quantity, lot.days_until_expiry, lot.days_until_arrival)
    }

    /// Draws `amount` from on-hand lots in expiry order.
    ///
    /// In-transit lots are skipped even when they expire sooner than a later
    /// on-hand lot. Returns the part of `amount` that could not be served.
    pub fn consume(&mut self, amount: u32) -> u32 {
        let mut remaining = amount;
        let mut index = 0;
        while remaining > 0 && index < self.lots.len() {
            let lot = &mut self.lots[index];
            if !lot.is_on_hand() {
                index += 1;
            } else if lot.quantity > remaining {
                lot.quantity -= remaining;
                remaining = 0;
            } else {
                remaining -= lot.quantity;
                self.lots.remove(index);
            }
        }
        remaining
    }

    /// Removes `amount` units from the front of the ledger regardless of
    /// transit status, splitting the last lot drawn if needed.
    ///
    /// Fails without touching the ledger if it holds fewer than `amount`.
    pub fn export(&mut self, amount: u32) -> Result<Vec<Lot>, LedgerError> {
        let available = self.total();
        if available < amount {
            return Err(LedgerError::Underflow {
                requested: amount,
                available,
            });
        }

        let mut found = Vec::new();
        let mut need = amount;
        while need > 0 {
            let front = &mut self.lots[0];
            if front.quantity > need {
                found.push(Lot { quantity: need, ..*front });
                front.quantity -= need;
                need = 0;
            } else {
                need -= front.quantity;
                found.push(self.lots.remove(0));
            }
        }
        Ok(found)
    }

    pub fn on_hand(&self) -> u32 {
        self.lots
            .iter()
            .filter(|l| l.is_on_hand())
            .map(|l| l.quantity)
            .sum()
    }

    pub fn in_transit(&self) -> u32 {
        self.lots
            .iter()
            .filter(|l| !l.is_on_hand())
            .map(|l| l.quantity)
            .sum()
    }

    pub fn total(&self) -> u32 {
        self.lots.iter().map(|l| l.quantity).sum()
    }

    /// Ages every lot by one day and evicts the expired ones.
    ///
    /// Expired lots can only sit at the front, so eviction stops at the
    /// first lot that is still usable. Returns the evicted quantity.
    pub fn advance_one_day(&mut self) -> u32 {
        for lot in &mut self.lots {
            lot.days_until_expiry -= 1;
            lot.days_until_arrival = lot.days_until_arrival.saturating_sub(1);
        }

        let expired_count = self
            .lots
            .iter()
            .take_while(|l| l.days_until_expiry <= 0)
            .count();
        self.lots
            .drain(..expired_count)
            .map(|l| l.quantity)
            .sum()
    }

    pub fn check_invariants(&self) -> Result<(), LedgerError> {
        for (index, lot) in self.lots.iter().enumerate() {
            if lot.quantity == 0 {
                return Err(LedgerError::InvariantViolation {
                    index,
                    detail: "empty lot".to_string(),
                });
            }
            if lot.days_until_expiry <= 0 {
                return Err(LedgerError::InvariantViolation {
                    index,
                    detail: format!("expired lot ({} days)", lot.days_until_expiry),
                });
            }
            if index > 0 && self.lots[index - 1].key() > lot.key() {
                return Err(LedgerError::InvariantViolation {
                    index,
                    detail: "lots out of expiry order".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, lot) in self.lots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(
                f,
                "({}, {}, {})",
                lot.quantity, lot.days_until_expiry, lot.days_until_arrival
            )?;
        }
        write!(f, "]")
    }
}
