// src/simulation/kpis.rs

use crate::simulation::engine::ResultTable;
use serde::Serialize;

/// Headline numbers for comparing policies across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSummary {
    pub avg_unmet_demand_per_person: f64,
    /// Mean daily unmet demand counting only days above the threshold.
    pub avg_unmet_demand_threshold_per_person: f64,
    /// Mean daily transport space per platoon lane.
    pub avg_transport_space: f64,
    pub avg_expired_units: f64,
}

/// Summarises a result table.
///
/// `threshold` is the daily unmet demand per person that is still
/// considered manageable; company days at or below `threshold * headcount`
/// count as zero in the threshold average.
pub fn generate_kpis(table: &ResultTable, personnel: &[u32], threshold: f64) -> KpiSummary {
    let days = table.rows.len().max(1) as f64;
    let headcount = personnel.iter().map(|&p| p as f64).sum::<f64>().max(1.0);
    let threshold_total = threshold * headcount;
    let lanes = table.platoon_names.len().max(1) as f64;

    let mut unmet = 0.0;
    let mut unmet_over = 0.0;
    let mut space = 0.0;
    let mut expired = 0.0;
    for totals in table.company_totals() {
        let [_, trans_space, fwb_unmet, plasma_unmet, fwb_expired, plasma_expired] = totals;
        let day_unmet = (fwb_unmet + plasma_unmet) as f64;
        unmet += day_unmet;
        if day_unmet > threshold_total {
            unmet_over += day_unmet;
        }
        space += trans_space as f64;
        expired += (fwb_expired + plasma_expired) as f64;
    }

    KpiSummary {
        avg_unmet_demand_per_person: unmet / days / headcount,
        avg_unmet_demand_threshold_per_person: unmet_over / days / headcount,
        avg_transport_space: space / days / lanes,
        avg_expired_units: expired / days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_follow_company_columns() {
        let table = ResultTable {
            platoon_names: vec!["A".to_string(), "B".to_string()],
            rows: vec![
                vec![1, 100, 10, 0, 2, 0, 0, 0, 30, 0, 0, 1],
                vec![0, 0, 0, 0, 0, 0, 2, 300, 0, 0, 5, 0],
            ],
        };

        let kpis = generate_kpis(&table, &[10, 10], 1.0);

        assert_eq!(kpis.avg_unmet_demand_per_person, 1.0);
        assert_eq!(kpis.avg_unmet_demand_threshold_per_person, 1.0);
        assert_eq!(kpis.avg_transport_space, 100.0);
        assert_eq!(kpis.avg_expired_units, 4.0);
    }

    #[test]
    fn days_under_threshold_do_not_count() {
        let table = ResultTable {
            platoon_names: vec!["A".to_string()],
            rows: vec![vec![0, 0, 5, 0, 0, 0], vec![0, 0, 50, 0, 0, 0]],
        };
        let kpis = generate_kpis(&table, &[10], 1.0);
        assert_eq!(kpis.avg_unmet_demand_threshold_per_person, 2.5);
    }
}
