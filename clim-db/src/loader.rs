//! Raw measurement series loaders.
//!
//! A loader fetches the complete raw series for one dataset. The store calls
//! it at most once per dataset per session and aggregates the result.
//!
//! # Formats
//!
//! - **JSON**: array of `{"t": "YYYY-MM", "v": <number>}`
//! - **Gzipped JSON**: the same, with a `.json.gz` extension
//! - **CSV** (optional header): `t,v` rows; rows with a non-numeric value are skipped
//!
//! Values are real-valued in the feed and scaled to fixed-point on parse.

use clim_core::sample::RawMeasurement;
use clim_core::{DatasetType, RawSample};
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Source of raw series, one per dataset.
#[allow(async_fn_in_trait)]
pub trait RawSeriesLoader {
    /// Fetch the raw series for `dataset`, sorted ascending by `(year, month)`.
    async fn load_raw_series(&self, dataset: DatasetType) -> anyhow::Result<Vec<RawSample>>;
}

/// Parse a JSON feed into sorted samples.
pub fn parse_json_series(bytes: &[u8]) -> anyhow::Result<Vec<RawSample>> {
    let measurements: Vec<RawMeasurement> = serde_json::from_slice(bytes)?;
    let mut samples = measurements
        .iter()
        .map(RawSample::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    samples.sort_by_key(RawSample::period);
    Ok(samples)
}

/// Parse a gzip-compressed JSON feed into sorted samples.
pub fn parse_gzip_json_series(bytes: &[u8]) -> anyhow::Result<Vec<RawSample>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut json = Vec::new();
    decoder.read_to_end(&mut json)?;
    parse_json_series(&json)
}

/// Parse a `t,v` CSV feed into sorted samples.
///
/// A header row, blank values and non-numeric values are skipped; a row with
/// a numeric value but a malformed timestamp is an error.
pub fn parse_csv_series(csv_data: &str) -> anyhow::Result<Vec<RawSample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let mut samples = Vec::new();
    let mut skipped = 0u32;
    for result in rdr.records() {
        let r = result?;
        let timestamp = r.get(0).unwrap_or("").trim();
        let value_str = r.get(1).unwrap_or("").trim();

        let value: f64 = match value_str.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                skipped += 1;
                continue;
            }
        };
        if timestamp.is_empty() {
            skipped += 1;
            continue;
        }
        samples.push(RawSample::from_measurement(timestamp, value)?);
    }
    samples.sort_by_key(RawSample::period);
    log::info!(
        "[clim] loader: parsed {} samples, skipped {} rows",
        samples.len(),
        skipped
    );
    Ok(samples)
}

/// Loads `<dir>/<dataset>.json`, `<dir>/<dataset>.json.gz` or
/// `<dir>/<dataset>.csv`, whichever exists first.
#[derive(Debug, Clone)]
pub struct FileLoader {
    dir: PathBuf,
}

impl FileLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that would be read for `dataset`, if any exists.
    pub fn resolve(&self, dataset: DatasetType) -> Option<PathBuf> {
        ["json", "json.gz", "csv"]
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", dataset, ext)))
            .find(|p| p.is_file())
    }
}

impl RawSeriesLoader for FileLoader {
    async fn load_raw_series(&self, dataset: DatasetType) -> anyhow::Result<Vec<RawSample>> {
        let path = self.resolve(dataset).ok_or_else(|| {
            anyhow::anyhow!("no series file for {} in {}", dataset, self.dir.display())
        })?;
        let bytes = tokio::fs::read(&path).await?;
        let name = path.to_string_lossy();
        let samples = if name.ends_with(".json.gz") {
            parse_gzip_json_series(&bytes)?
        } else if name.ends_with(".json") {
            parse_json_series(&bytes)?
        } else {
            parse_csv_series(std::str::from_utf8(&bytes)?)?
        };
        log::info!(
            "[clim] loader: loaded {} samples for {} from {}",
            samples.len(),
            dataset,
            path.display()
        );
        Ok(samples)
    }
}

/// Fetches `<base_url>/<dataset>.json`.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpLoader {
    base_url: String,
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpLoader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(feature = "http")]
impl RawSeriesLoader for HttpLoader {
    async fn load_raw_series(&self, dataset: DatasetType) -> anyhow::Result<Vec<RawSample>> {
        let url = format!("{}/{}.json", self.base_url, dataset);
        log::info!("[clim] loader: fetching {}", url);
        let bytes = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        parse_json_series(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const JSON: &str = r#"[
        {"t": "1881-02", "v": -3.1},
        {"t": "1881-01", "v": -7.25},
        {"t": "1881-03", "v": 0.4}
    ]"#;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("clim-loader-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn json_is_scaled_and_sorted() {
        let samples = parse_json_series(JSON.as_bytes()).unwrap();
        assert_eq!(
            samples,
            vec![
                RawSample::new(1881, 1, -725),
                RawSample::new(1881, 2, -310),
                RawSample::new(1881, 3, 40),
            ]
        );
    }

    #[test]
    fn gzip_json_matches_plain_json() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(JSON.as_bytes()).unwrap();
        let gz = encoder.finish().unwrap();
        assert_eq!(
            parse_gzip_json_series(&gz).unwrap(),
            parse_json_series(JSON.as_bytes()).unwrap()
        );
    }

    #[test]
    fn csv_skips_header_and_non_numeric() {
        let csv = "t,v\n1990-01,1.5\n1990-02,---\n1990-03,\n1990-04,-2\n";
        let samples = parse_csv_series(csv).unwrap();
        assert_eq!(
            samples,
            vec![RawSample::new(1990, 1, 150), RawSample::new(1990, 4, -200)]
        );
    }

    #[test]
    fn csv_rejects_bad_timestamp() {
        assert!(parse_csv_series("1990-13,1.0\n").is_err());
    }

    #[tokio::test]
    async fn file_loader_reads_dataset_file() {
        let dir = temp_dir("json");
        std::fs::write(dir.join("temperature.json"), JSON).unwrap();
        let loader = FileLoader::new(&dir);

        let samples = loader
            .load_raw_series(DatasetType::Temperature)
            .await
            .unwrap();
        assert_eq!(samples.len(), 3);
        assert!(loader.resolve(DatasetType::Precipitation).is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn file_loader_missing_file_is_an_error() {
        let dir = temp_dir("missing");
        let loader = FileLoader::new(&dir);
        let err = loader
            .load_raw_series(DatasetType::Precipitation)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("precipitation"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn file_loader_reads_csv() {
        let dir = temp_dir("csv");
        std::fs::write(dir.join("precipitation.csv"), "1950-01,12.5\n1950-02,8\n").unwrap();
        let loader = FileLoader::new(&dir);
        let samples = loader
            .load_raw_series(DatasetType::Precipitation)
            .await
            .unwrap();
        assert_eq!(samples[0], RawSample::new(1950, 1, 1250));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
