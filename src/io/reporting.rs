// src/io/reporting.rs

use crate::error::SimulationError;
use crate::simulation::engine::{HistoryRecord, ResultTable};
use std::path::Path;
use tracing::info;

/// Writes the per-platoon, per-day history to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/run_1.csv").
/// * `data` - The history records from the simulation engine.
pub fn write_simulation_log(
    file_path: impl AsRef<Path>,
    data: &[HistoryRecord],
) -> Result<(), SimulationError> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    for record in data {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    info!(rows = data.len(), path = %path.display(), "history exported");
    Ok(())
}

/// Writes the wide day-by-platoon table, company sums included.
pub fn write_result_table(
    file_path: impl AsRef<Path>,
    table: &ResultTable,
) -> Result<(), SimulationError> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["Day".to_string()];
    header.extend(table.column_names());
    wtr.write_record(&header)?;

    for (day, row) in table.full_rows().into_iter().enumerate() {
        let mut record = vec![(day + 1).to_string()];
        record.extend(row.iter().map(u32::to_string));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;

    info!(rows = table.rows.len(), path = %path.display(), "result table exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::ScenarioConfig;
    use crate::simulation::engine::BloodSupplySimulation;

    #[test]
    fn both_reports_have_one_line_per_row() {
        let mut sim = BloodSupplySimulation::new(ScenarioConfig::default()).unwrap();
        sim.run().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("history.csv");
        let wide = dir.path().join("table.csv");

        write_simulation_log(&log, &sim.history).unwrap();
        write_result_table(&wide, &sim.result_table()).unwrap();

        let log_text = std::fs::read_to_string(&log).unwrap();
        assert_eq!(log_text.lines().count(), 1 + 30);
        assert!(log_text.starts_with("day,platoon,combat_level"));

        let wide_text = std::fs::read_to_string(&wide).unwrap();
        let mut lines = wide_text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("Day,Platoon1_TransDays,Platoon1_TransSpace"));
        assert!(header.ends_with("Company_FWBExpired,Company_PlasmaExpired"));
        assert_eq!(lines.count(), 15);
    }
}
