// src/io/scenario.rs

use crate::error::ConfigError;
use crate::simulation::config::ScenarioConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads a JSON scenario and validates it before returning.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<ScenarioConfig, ConfigError> {
    let reader = BufReader::new(File::open(path)?);
    let config: ScenarioConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

/// Writes a scenario as pretty JSON, e.g. to seed a file for editing.
pub fn save_scenario(
    path: impl AsRef<Path>,
    config: &ScenarioConfig,
) -> Result<(), ConfigError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_scenario_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        let config = ScenarioConfig::reorder_point_demo();

        save_scenario(&path, &config).unwrap();
        assert_eq!(load_scenario(&path).unwrap(), config);
    }

    #[test]
    fn invalid_scenario_is_refused_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        let mut config = ScenarioConfig::default();
        config.days = 0;
        save_scenario(&path, &config).unwrap();

        let err = load_scenario(&path).unwrap_err();
        assert_eq!(err.to_string(), "days: must be positive");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_scenario("/nonexistent/scenario.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
