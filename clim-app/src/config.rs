use anyhow::Context;
use clim_chart::ChartConfig;
use clim_core::{DatasetType, YearBounds};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings. Every field has a default, so a config file only
/// needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Years offered by the selectors; navigation stops at the edges.
    pub bounds: YearBounds,
    pub default_dataset: DatasetType,
    pub schema_version: u32,
    /// SQLite file for the cache. `None` keeps it in memory.
    pub db_path: Option<PathBuf>,
    /// Where the raw `<dataset>.json`, `.json.gz` or `.csv` series live.
    pub data_dir: PathBuf,
    /// Fetch raw series from `<source_url>/<dataset>.json` instead of
    /// `data_dir`. Needs the `http` feature.
    pub source_url: Option<String>,
    pub chart: ChartConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bounds: YearBounds::default(),
            default_dataset: DatasetType::Temperature,
            schema_version: clim_db::schema::SCHEMA_VERSION,
            db_path: None,
            data_dir: PathBuf::from("data"),
            source_url: None,
            chart: ChartConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clim_chart::config::YearLayout;

    #[test]
    fn empty_object_gives_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bounds, YearBounds::new(1881, 2006));
        assert_eq!(config.chart.width, 500.0);
    }

    #[test]
    fn partial_overrides() {
        let config = AppConfig::from_json(
            r#"{
                "default_dataset": "precipitation",
                "bounds": { "min": 1900, "max": 1950 },
                "chart": { "year_layout": "bar", "month_mode_threshold": 10 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.default_dataset, DatasetType::Precipitation);
        assert_eq!(config.bounds.min, 1900);
        assert_eq!(config.chart.year_layout, YearLayout::Bar);
        assert_eq!(config.chart.month_mode_threshold, 10);
        assert_eq!(config.chart.padding, 50.0);
    }

    #[test]
    fn unknown_dataset_is_rejected() {
        assert!(AppConfig::from_json(r#"{ "default_dataset": "snow" }"#).is_err());
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("clim-app-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "schema_version": 7 }"#).unwrap();
        let config = AppConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.schema_version, 7);
        assert!(AppConfig::load(&path).is_err());
    }
}
