// src/model/commodity.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// The blood products tracked by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Commodity {
    #[serde(rename = "FWB")]
    Fwb,
    #[serde(rename = "Plasma")]
    Plasma,
}

impl Commodity {
    pub const ALL: [Commodity; 2] = [Commodity::Fwb, Commodity::Plasma];

    /// Label used in report column names (e.g. `Platoon1_FWBUnmet`).
    pub fn label(self) -> &'static str {
        match self {
            Commodity::Fwb => "FWB",
            Commodity::Plasma => "Plasma",
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per commodity, indexed by `Commodity`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByCommodity<T> {
    #[serde(rename = "FWB")]
    pub fwb: T,
    #[serde(rename = "Plasma")]
    pub plasma: T,
}

impl<T> ByCommodity<T> {
    pub fn new(fwb: T, plasma: T) -> Self {
        Self { fwb, plasma }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Commodity, &T) -> U) -> ByCommodity<U> {
        ByCommodity {
            fwb: f(Commodity::Fwb, &self.fwb),
            plasma: f(Commodity::Plasma, &self.plasma),
        }
    }

    /// Iterates FWB first, then Plasma.
    pub fn iter(&self) -> impl Iterator<Item = (Commodity, &T)> {
        [(Commodity::Fwb, &self.fwb), (Commodity::Plasma, &self.plasma)].into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Commodity, &mut T)> {
        [
            (Commodity::Fwb, &mut self.fwb),
            (Commodity::Plasma, &mut self.plasma),
        ]
        .into_iter()
    }
}

impl ByCommodity<u32> {
    pub fn total(&self) -> u32 {
        self.fwb + self.plasma
    }
}

impl<T> Index<Commodity> for ByCommodity<T> {
    type Output = T;

    fn index(&self, commodity: Commodity) -> &T {
        match commodity {
            Commodity::Fwb => &self.fwb,
            Commodity::Plasma => &self.plasma,
        }
    }
}

impl<T> IndexMut<Commodity> for ByCommodity<T> {
    fn index_mut(&mut self, commodity: Commodity) -> &mut T {
        match commodity {
            Commodity::Fwb => &mut self.fwb,
            Commodity::Plasma => &mut self.plasma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_reaches_matching_field() {
        let mut values = ByCommodity::new(3u32, 7u32);
        values[Commodity::Plasma] += 1;
        assert_eq!(values[Commodity::Fwb], 3);
        assert_eq!(values.plasma, 8);
        assert_eq!(values.total(), 11);
    }

    #[test]
    fn commodity_uses_report_labels_in_json() {
        let json = serde_json::to_string(&Commodity::Fwb).unwrap();
        assert_eq!(json, "\"FWB\"");
        let parsed: Commodity = serde_json::from_str("\"Plasma\"").unwrap();
        assert_eq!(parsed, Commodity::Plasma);
    }
}
