//! clim-cli - Command line tool for aggregating, caching and charting
//! monthly climate series.

use clap::Parser;
use clim_app::AppConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "clim-cli",
    version,
    about = "Climate series chart toolkit"
)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding <dataset>.json / .json.gz / .csv raw series
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// SQLite cache file (in-memory if omitted)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Base URL serving <dataset>.json (needs the http feature)
    #[arg(long, global = true)]
    source_url: Option<String>,

    #[command(subcommand)]
    command: clim_cmd::Command,
}

impl Cli {
    fn app_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(path) = &self.db_path {
            config.db_path = Some(path.clone());
        }
        if let Some(url) = &self.source_url {
            config.source_url = Some(url.clone());
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.app_config()?;
    log::debug!("Config: {:?}", config);
    clim_cmd::run(cli.command, config).await
}
