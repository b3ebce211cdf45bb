//! Commands that run the chart application headless: query, render, browse.

use crate::source::SeriesSource;
use crate::RangeArgs;
use clim_app::{App, AppConfig};
use clim_chart::SvgCanvas;
use clim_state::Field;
use log::info;
use std::path::Path;
use std::rc::Rc;

type ChartApp = App<SeriesSource, SvgCanvas>;

fn open_app(config: AppConfig) -> anyhow::Result<Rc<ChartApp>> {
    let source = SeriesSource::from_config(&config)?;
    info!("Series source: {}", source);
    let app = App::open(config, source, SvgCanvas::new())?;
    info!("Record cache: {:?}", app.store().mode());
    Ok(app)
}

/// Push the command line range into state the way form controls would.
fn apply_range(app: &ChartApp, range: &RangeArgs) {
    let state = app.state();
    if let Some(start) = &range.start {
        state.set_field_str(Field::StartYear, start);
    }
    if let Some(end) = &range.end {
        state.set_field_str(Field::EndYear, end);
    }
    if let Some(dataset) = &range.dataset {
        if !state.set_field_str(Field::Dataset, dataset) && state.dataset().as_str() != dataset {
            log::warn!("Unknown dataset {}, keeping {}", dataset, state.dataset());
        }
    }
}

/// Parse an `X,Y` pixel position.
pub fn parse_point(s: &str) -> anyhow::Result<(f64, f64)> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("expected X,Y, got {:?}", s))?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

fn write_svg(app: &ChartApp, output: &Path) -> anyhow::Result<()> {
    let svg = app.with_canvas(|canvas| canvas.to_svg())?;
    std::fs::write(output, svg)?;
    info!("Chart written to {}", output.display());
    Ok(())
}

/// Every year a start or end selector offers, oldest first.
pub fn selector_years(config: &AppConfig) -> Vec<i32> {
    config.bounds.years().collect()
}

pub fn run_years(config: &AppConfig) {
    for year in selector_years(config) {
        println!("{}", year);
    }
}

pub async fn run_query(config: AppConfig, range: &RangeArgs) -> anyhow::Result<()> {
    let app = open_app(config)?;
    apply_range(&app, range);
    let query = app.state().range();
    let records = app
        .store()
        .get_data(query.start_year, query.end_year, query.dataset)
        .await?;

    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(["year", "mean", "min", "max", "months"])?;
    for r in &records {
        wtr.write_record([
            r.year.to_string(),
            format!("{:.2}", r.mean()),
            format!("{:.2}", r.min()),
            format!("{:.2}", r.max()),
            r.month_count().to_string(),
        ])?;
    }
    wtr.flush()?;
    info!(
        "{} records for {} {}-{}",
        records.len(),
        query.dataset,
        query.start_year,
        query.end_year
    );
    Ok(())
}

pub async fn run_render(
    config: AppConfig,
    range: &RangeArgs,
    output: &Path,
    inspect: Option<&str>,
) -> anyhow::Result<()> {
    let app = open_app(config)?;
    apply_range(&app, range);
    app.refresh().await?;

    if let Some(point) = inspect {
        let (x, y) = parse_point(point)?;
        match app.show_inspector(x, y) {
            Some(found) => println!("{}", found),
            None => println!("No record at {},{}", x, y),
        }
    }
    write_svg(&app, output)
}

/// Draw the starting range, replay `keys` as key presses with every
/// resulting range event redrawing, then write the final chart.
pub async fn run_browse(
    config: AppConfig,
    range: &RangeArgs,
    keys: &[String],
    output: &Path,
) -> anyhow::Result<()> {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let app = open_app(config)?;
            apply_range(&app, range);
            app.connect();
            app.refresh().await?;

            for key in keys {
                if !app.handle_key(key) {
                    info!("Key {} ignored", key);
                }
            }
            app.settle().await;

            for notice in app.notices() {
                eprintln!("{}", notice);
            }
            if app.is_fatal() {
                anyhow::bail!("stopping after fatal error");
            }
            if let Some(query) = app.current_query() {
                println!("{} {}-{}", query.dataset, query.start_year, query.end_year);
            }
            write_svg(&app, output)
        })
        .await
}
