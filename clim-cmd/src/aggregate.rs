//! Offline aggregation of a raw series file.

use clim_core::{RawSample, YearRecord};
use clim_db::loader::{parse_csv_series, parse_gzip_json_series, parse_json_series};
use log::info;
use std::path::Path;

/// Read a raw series file, choosing the parser from its extension.
pub fn read_series_file(path: &Path) -> anyhow::Result<Vec<RawSample>> {
    let bytes = std::fs::read(path)?;
    let name = path.to_string_lossy();
    if name.ends_with(".json.gz") {
        parse_gzip_json_series(&bytes)
    } else if name.ends_with(".json") {
        parse_json_series(&bytes)
    } else if name.ends_with(".csv") {
        parse_csv_series(std::str::from_utf8(&bytes)?)
    } else {
        anyhow::bail!("unsupported series file {}", path.display())
    }
}

pub fn aggregate_file(path: &Path) -> anyhow::Result<Vec<YearRecord>> {
    let samples = read_series_file(path)?;
    Ok(clim_data::aggregation::aggregate(&samples))
}

/// Aggregate `input` and write the records as JSON to `output` or stdout.
pub fn run_aggregate(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let records = aggregate_file(input)?;
    let json = serde_json::to_string_pretty(&records)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(
                "Aggregated {} years from {} into {}",
                records.len(),
                input.display(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
