mod cli;
mod prompt;
mod report;
mod wizard;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ripline_core::{
    catalog::{CatalogError, MakeMkvCatalog, Selection, TitleCatalog},
    config::{find_config, load_config, validate_config, ToolsConfig},
    encoder::{Encoder, HandBrakeEncoder},
    extractor::{Extractor, MakeMkvExtractor},
    pipeline::{PipelineError, PipelineRunner},
    plan::plan_titles,
    progress::{ProgressTracker, TerminalDisplay},
    workspace::RunDirectories,
};

use cli::Args;

/// Header drawn above the progress table.
const BANNER: &str = "ripline - disc ripping and encoding\n";

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        error!("Fatal error: {:#}", e);

        if let Some(details) = e
            .downcast_ref::<PipelineError>()
            .and_then(report::failure_details)
        {
            eprintln!("\n{}", details);
        }
        if let Some(CatalogError::NoTitles { unit }) = e.downcast_ref::<CatalogError>() {
            eprintln!(
                "\nNo titles were found on disc {}. Please make sure a disc is inserted and try again.",
                unit
            );
        }

        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(args: Args) -> Result<()> {
    if args.configure {
        return wizard::run_wizard(args.config.as_deref(), &ToolsConfig::default().handbrake)
            .await;
    }

    let config_path = find_config(args.config.as_deref())
        .context("No configuration found. Run `ripline --configure` to create one")?;
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded from {:?}", config_path);

    if args.read_config {
        println!("{}\n", config);
        println!("Configuration file: {}", config_path.display());
        return Ok(());
    }

    let catalog = MakeMkvCatalog::new(&config.tools.makemkvcon);

    if args.list {
        return list_discs(&catalog).await;
    }

    let extractor = MakeMkvExtractor::new(&config.tools.makemkvcon);
    let encoder = HandBrakeEncoder::new(&config.tools.handbrake);
    extractor
        .validate()
        .await
        .context("makemkvcon is required but could not be found")?;
    encoder
        .validate()
        .await
        .context("HandBrakeCLI is required but could not be found")?;

    create_root(&config.output.raw_dir).await?;
    create_root(&config.output.encoded_dir).await?;

    let mut selected = Vec::new();
    for unit in args.disc_ids() {
        println!("Reading titles from disc {}...\n", unit);
        let titles = catalog
            .list_titles(unit)
            .await
            .with_context(|| format!("Failed to read titles from disc {}", unit))?;

        prompt::print_titles(unit, &titles);
        let selection = prompt::select_titles(unit)?;
        if selection == Selection::Nothing {
            println!("No titles selected. Exiting.\n");
            return Ok(());
        }
        selected.extend(selection.apply(titles));
    }

    if selected.is_empty() {
        println!("None of the entered IDs matched a title. Exiting.\n");
        return Ok(());
    }

    let planned = plan_titles(selected);
    let dirs = RunDirectories::create(
        &config.output.raw_dir,
        &config.output.encoded_dir,
        Local::now(),
    )
    .await
    .context("Failed to create run directories")?;

    let tracker = Arc::new(ProgressTracker::for_titles(
        &planned,
        Box::new(TerminalDisplay::with_header(BANNER)),
    ));
    let runner = PipelineRunner::new(
        config.pipeline.clone(),
        extractor,
        encoder,
        config.encode.clone(),
    );

    let summary = runner.run(planned, &dirs, tracker).await?;

    report::print_summary(&summary).await;
    if config.output.delete_raw_files {
        report::delete_raw_files(&dirs).await;
    }
    println!("\nEncoded files are located in: {}\n", dirs.encoded.display());

    Ok(())
}

async fn list_discs(catalog: &MakeMkvCatalog) -> Result<()> {
    println!("Scanning drives...\n");
    let units = catalog
        .list_units()
        .await
        .context("Failed to list drives")?;

    if units.is_empty() {
        println!("No discs found.");
        return Ok(());
    }
    for unit in units {
        println!("Disc - {} - {}", unit.index, unit.name);
    }
    println!();
    Ok(())
}

async fn create_root(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create output directory {}", path.display()))
}
