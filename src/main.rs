//! CLI entry point for the bike share demand dashboard.
//!
//! Loads the rental dataset once, applies the selected filters and renders the
//! dashboard as a text summary, a JSON chart document or a filtered CSV.

use anyhow::{Context, Result};
use bike_share_dashboard::chart::{NO_DATA_MESSAGE, season_options, weather_options};
use bike_share_dashboard::filter::{ALL_SEASONS, ALL_WEATHER};
use bike_share_dashboard::output::{
    JsonRenderer, TextRenderer, render_dashboard, write_filtered_csv,
};
use bike_share_dashboard::{Dashboard, Dataset, FilterCriteria, FilteredView, config};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bike_share_dashboard")]
#[command(about = "Explore bike share rental demand by season, weather and day type", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard as text tables
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write the dashboard charts as a JSON document
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// JSON file to write
        #[arg(short, long, default_value = "dashboard.json")]
        output: PathBuf,
    },
    /// Write the filtered records, with derived fields, as CSV
    Filter {
        #[command(flatten)]
        filters: FilterArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "filtered.csv")]
        output: PathBuf,
    },
    /// List the accepted season and weather selector values
    Options,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Dataset CSV, optionally gzipped (defaults to $BIKE_DATA_FILE, then train.csv)
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Season to keep
    #[arg(short, long, default_value = ALL_SEASONS)]
    season: String,

    /// Weather condition to keep
    #[arg(short, long, default_value = ALL_WEATHER)]
    weather: String,

    /// Drop records that fall on a holiday
    #[arg(long, default_value_t = false)]
    exclude_holidays: bool,

    /// Drop records that fall on a working day
    #[arg(long, default_value_t = false)]
    exclude_workingdays: bool,
}

impl FilterArgs {
    fn criteria(&self) -> Result<FilterCriteria> {
        Ok(FilterCriteria::from_selectors(
            &self.season,
            &self.weather,
            !self.exclude_holidays,
            !self.exclude_workingdays,
        )?)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { filters } => {
            let view = run_query(&filters)?;
            let dashboard = Dashboard::build(&view);

            let stdout = std::io::stdout();
            render_dashboard(&mut TextRenderer::new(stdout.lock()), &dashboard)?;
        }
        Commands::Export { filters, output } => {
            let view = run_query(&filters)?;
            let dashboard = Dashboard::build(&view);

            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            render_dashboard(&mut JsonRenderer::new(BufWriter::new(file)), &dashboard)?;

            info!(
                path = %output.display(),
                charts = dashboard.charts().len(),
                "Dashboard exported"
            );
        }
        Commands::Filter { filters, output } => {
            let view = run_query(&filters)?;
            if view.is_empty() {
                warn!("{}", NO_DATA_MESSAGE);
            }

            write_filtered_csv(&output, view.records())
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
        Commands::Options => {
            println!("Seasons:");
            for option in season_options() {
                println!("  {option}");
            }
            println!("Weather:");
            for option in weather_options() {
                println!("  {option}");
            }
        }
    }

    Ok(())
}

/// Loads the dataset and runs the filter stage for one set of flags.
#[tracing::instrument(skip_all, fields(season = %args.season, weather = %args.weather))]
fn run_query(args: &FilterArgs) -> Result<FilteredView> {
    // Selector errors are reported before touching the file.
    let criteria = args.criteria()?;

    let path = config::data_path(args.data.clone());
    let dataset = load_dataset(&path)?;

    let view = dataset.query(&criteria);
    info!(
        total = dataset.len(),
        matching = view.len(),
        "Filters applied"
    );
    Ok(view)
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    let dataset = Dataset::load(path)
        .inspect_err(|e| {
            if e.is_schema_error() {
                error!(error = %e, "Data file does not have the expected layout");
            } else {
                error!(error = %e, "Dataset failed to load");
            }
        })
        .with_context(|| format!("Cannot load bike share data from '{}'", path.display()))?;
    Ok(dataset)
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path = config::log_file_path();
    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("bike_share_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}
