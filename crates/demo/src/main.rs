//! tabstrip - drive the tab strip engine from the command line.
//!
//! Usage:
//!   tabstrip simulate [--swipes N]
//!   tabstrip replay <FILE>
//!   tabstrip table --widths 80,150,90 --viewport 300 [--margin M]

mod config;
mod driver;
mod layout;
mod replay;
mod simulate;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tabstrip_core::{ContainerMetrics, InterpolationTable, LayoutRegistry, TableParams};
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::Config;
use layout::SimulatedLayout;

#[derive(Parser)]
#[command(name = "tabstrip")]
#[command(about = "Tab strip synchronization engine demo")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the standard locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted host session and log every command
    Simulate {
        /// Number of page swipes (default: one pass over all tabs)
        #[arg(short, long)]
        swipes: Option<usize>,
    },

    /// Replay a JSON-lines event log, printing the resulting commands
    Replay {
        /// Event log file ("-" for stdin)
        file: PathBuf,
    },

    /// Print the interpolation table for the given tab widths
    Table {
        /// Comma-separated tab widths
        #[arg(short, long, value_delimiter = ',', required = true)]
        widths: Vec<f64>,

        /// Viewport width
        #[arg(short, long)]
        viewport: f64,

        /// Tab margin (default: strip.tab_margin from config)
        #[arg(short, long)]
        margin: Option<f64>,
    },
}

#[derive(Serialize)]
struct TableDump<'a> {
    layout: &'a SimulatedLayout,
    table: &'a InterpolationTable,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for log level)
    let loaded = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        // Can't use tracing yet, fall back to eprintln
        eprintln!("Failed to load configuration: {:#}. Using defaults.", e);
        Config::default()
    });

    init_logging(&config.logging.level)?;

    let config_warnings = config.validate();
    for w in &config_warnings {
        warn!("Config: {} - {}", w.field, w.message);
    }

    match cli.command {
        Commands::Simulate { swipes } => {
            let demo = &config.demo;
            let swipes = swipes.unwrap_or(demo.tabs.len().saturating_sub(1));
            let steps = simulate::script(&demo.tabs, config.strip.tab_margin, demo, swipes);
            info!(
                "Simulating {} tabs, {} swipes ({} host steps)",
                demo.tabs.len(),
                swipes,
                steps.len()
            );

            let tick = Duration::from_millis(demo.tick_ms);
            let stats = simulate::run(steps, config.strip.clone(), tick).await;
            info!(
                "Simulation finished: {} events, {} commands",
                stats.events, stats.commands
            );
        }

        Commands::Replay { file } => {
            let stdout = io::stdout().lock();
            let stats = if file.as_os_str() == "-" {
                replay::replay(io::stdin().lock(), stdout, config.strip.clone())?
            } else {
                let input = File::open(&file)
                    .with_context(|| format!("Failed to open event log: {}", file.display()))?;
                replay::replay(BufReader::new(input), stdout, config.strip.clone())?
            };
            info!(
                "Replayed {} events ({} skipped), {} commands",
                stats.events, stats.skipped, stats.commands
            );
        }

        Commands::Table {
            widths,
            viewport,
            margin,
        } => {
            let margin = margin.unwrap_or(config.strip.tab_margin);
            if widths.iter().any(|w| !(*w >= 0.0)) {
                bail!("Tab widths must be non-negative numbers");
            }
            if !(viewport > 0.0) {
                bail!("Viewport width must be positive");
            }

            let layout =
                SimulatedLayout::from_widths(&widths, margin, viewport, config.demo.tab_height);
            let table = build_table(&layout, margin, &config)?;
            let json = serde_json::to_string_pretty(&TableDump {
                layout: &layout,
                table: &table,
            })?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Initialize logging. `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) -> Result<()> {
    if std::env::var_os("RUST_LOG").is_some() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(());
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(level))
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO, // default fallback for invalid values
    }
}

fn build_table(
    layout: &SimulatedLayout,
    margin: f64,
    config: &Config,
) -> Result<InterpolationTable> {
    let mut registry = LayoutRegistry::new(layout.len());
    for (page, rect) in layout.tabs.iter().enumerate() {
        registry.record(page, *rect);
    }
    let mut metrics = ContainerMetrics::new();
    metrics.set_viewport(layout.viewport);
    metrics.set_scroll_content(layout.content.width, layout.content.height);

    let params = TableParams {
        margin,
        ..TableParams::from(&config.strip)
    };
    InterpolationTable::build(&registry, &metrics, &params)
        .context("Failed to build interpolation table")
}
