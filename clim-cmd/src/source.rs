//! Picks the raw series loader from the configuration.

use clim_app::AppConfig;
use clim_core::{DatasetType, RawSample};
use clim_db::loader::{FileLoader, RawSeriesLoader};
use std::fmt;

pub enum SeriesSource {
    Files(FileLoader),
    #[cfg(feature = "http")]
    Http(clim_db::loader::HttpLoader),
}

impl SeriesSource {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match &config.source_url {
            None => Ok(SeriesSource::Files(FileLoader::new(&config.data_dir))),
            #[cfg(feature = "http")]
            Some(url) => Ok(SeriesSource::Http(clim_db::loader::HttpLoader::new(url.as_str()))),
            #[cfg(not(feature = "http"))]
            Some(url) => anyhow::bail!("cannot fetch {}: built without the http feature", url),
        }
    }
}

impl fmt::Display for SeriesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesSource::Files(loader) => write!(f, "files in {}", loader.dir().display()),
            #[cfg(feature = "http")]
            SeriesSource::Http(_) => write!(f, "http"),
        }
    }
}

impl RawSeriesLoader for SeriesSource {
    async fn load_raw_series(&self, dataset: DatasetType) -> anyhow::Result<Vec<RawSample>> {
        match self {
            SeriesSource::Files(loader) => loader.load_raw_series(dataset).await,
            #[cfg(feature = "http")]
            SeriesSource::Http(loader) => loader.load_raw_series(dataset).await,
        }
    }
}
