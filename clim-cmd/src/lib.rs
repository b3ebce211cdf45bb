//! Command implementations for the climate chart CLI.
//!
//! Provides subcommands to aggregate raw series files, query the record
//! cache, and draw ranges to SVG with optional navigation and inspection.

use clap::{Args, Subcommand};
use clim_app::AppConfig;
use std::path::PathBuf;

pub mod aggregate;
pub mod chart;
pub mod source;

#[derive(Subcommand)]
pub enum Command {
    /// Aggregate a raw series file (.json, .json.gz or .csv) into yearly records
    Aggregate {
        /// Raw series file
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the records JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print cached yearly records for a range as CSV
    Query {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Draw a range to an SVG file
    Render {
        #[command(flatten)]
        range: RangeArgs,

        /// Output path for the SVG
        #[arg(short, long)]
        output: PathBuf,

        /// Open the point inspector at canvas pixel X,Y
        #[arg(long, value_name = "X,Y")]
        inspect: Option<String>,
    },

    /// Navigate a range with arrow keys, then draw the final state
    Browse {
        #[command(flatten)]
        range: RangeArgs,

        /// Key names in order, e.g. ArrowLeft,ArrowLeft,ArrowRight
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,

        /// Output path for the SVG
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the years the range selectors offer
    Years,
}

/// Range selection, given the way a form would: as text. Years are clamped
/// to the configured bounds, unknown datasets are ignored.
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First year (default: first year of the bounds)
    #[arg(short, long)]
    pub start: Option<String>,

    /// Last year (default: last year of the bounds)
    #[arg(short, long)]
    pub end: Option<String>,

    /// temperature or precipitation (default from config)
    #[arg(short, long)]
    pub dataset: Option<String>,
}

pub async fn run(command: Command, config: AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Aggregate { input, output } => {
            aggregate::run_aggregate(&input, output.as_deref())
        }
        Command::Query { range } => chart::run_query(config, &range).await,
        Command::Render {
            range,
            output,
            inspect,
        } => chart::run_render(config, &range, &output, inspect.as_deref()).await,
        Command::Browse {
            range,
            keys,
            output,
        } => chart::run_browse(config, &range, &keys, &output).await,
        Command::Years => {
            chart::run_years(&config);
            Ok(())
        }
    }
}
