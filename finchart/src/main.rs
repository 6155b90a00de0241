//! FinChart - Dual-axis financial line charts.
//!
//! Shows the built-in portfolio and page-view dashboards, plus a custom
//! chart when a data file is given with `--data`.

use std::path::PathBuf;

use clap::Parser;
use iced::application;

use finchart::FinChart;
use finchart::config::load_app_config;
use finchart_common::{init_tracing, load_records};

/// Dual-axis financial line charts.
#[derive(Parser, Debug)]
#[command(name = "finchart")]
#[command(about = "Dual-axis financial line charts")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides config.
    #[arg(long)]
    log_level: Option<String>,

    /// JSON/JSON5 array of records to chart on the Custom page.
    #[arg(short, long)]
    data: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, source) = load_app_config(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_tracing(&config.logging)?;

    tracing::info!("Starting FinChart");
    tracing::info!(source = %source, "Configuration loaded");

    config.validate()?;

    let data = args.data.as_deref().map(load_records).transpose()?;

    // Run the Iced application
    application(
        move || FinChart::boot(config.clone(), data.clone()),
        FinChart::update,
        FinChart::view,
    )
    .title(FinChart::title)
    .theme(FinChart::theme)
    .run()
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
