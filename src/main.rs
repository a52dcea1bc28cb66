// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Shotsort: AI-assisted Screenshot Organizer
//!
//! Fresh runs flatten, title and categorize a whole directory; update runs
//! file new screenshots from the inbox into the existing categories.

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

use shotsort::config::AppConfig;
use shotsort::organizer::Organizer;
use shotsort::report::RunReport;
use shotsort::vision::OpenAiClient;
use shotsort::Result;

/// Shotsort CLI - AI-assisted Screenshot Organizer
#[derive(Parser, Debug)]
#[command(name = "shotsort")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Title and categorize screenshots with a vision model", long_about = None)]
struct Cli {
    /// Directory containing the screenshot folders and files
    #[arg(short, long, required_unless_present = "generate_config")]
    directory: Option<PathBuf>,

    /// File new screenshots from the inbox into the existing categories
    #[arg(short, long)]
    update: bool,

    /// Assume images are already named and skip the renaming step
    #[arg(short, long)]
    skip_renaming: bool,

    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "shotsort.json")]
    config: PathBuf,

    /// Append skipped items to this JSON Lines file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write a default configuration file and exit
    #[arg(long, value_name = "FILE")]
    generate_config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Some(output) = cli.generate_config {
        AppConfig::default().save(&output)?;
        println!("Generated config at {:?}", output);
        return Ok(());
    }

    let config = AppConfig::load(&cli.config)?;

    let Some(directory) = cli.directory else {
        error!("No directory given");
        return Ok(());
    };
    let root = match directory.canonicalize() {
        Ok(path) if path.is_dir() => path,
        _ => {
            error!("The directory {:?} does not exist", directory);
            return Ok(());
        }
    };

    let Some(api_key) = config.api_key() else {
        error!(
            "No API key found; set the {} environment variable",
            config.ai_engine.api_key_env
        );
        return Ok(());
    };

    let client = OpenAiClient::new(&config.ai_engine, api_key)?;
    let organizer = Organizer::new(&root, &config, &client);
    let mut report = RunReport::new();

    let result = if cli.update {
        organizer.run_update(cli.skip_renaming, &mut report).await
    } else {
        organizer.run_fresh(cli.skip_renaming, &mut report).await
    };

    match result {
        Ok(()) => info!("Screenshot organization complete"),
        Err(e) => error!("{}", e),
    }
    report.log_summary();

    if let Some(path) = cli.report {
        if !report.skipped.is_empty() {
            if let Err(e) = report.append_skipped(&path) {
                warn!("Failed to write report {:?}: {}", path, e);
            }
        }
    }

    Ok(())
}
