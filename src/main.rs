//! Quote Analyzer - carrier quote statistics for insurance submission logs
//!
//! Loads a submission log, computes per-carrier quote rates and per-LOB
//! carrier responses, and prints or saves the report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Failure (invalid arguments, config, load or analysis error)

use anyhow::{Context, Result};
use quote_analyzer::analysis::{Analyzer, SystemClock};
use quote_analyzer::cli::{Args, OutputFormat};
use quote_analyzer::config::{Config, CONFIG_FILE_NAME};
use quote_analyzer::loader::{self, LoadOptions};
use quote_analyzer::logging::{self, LogSettings, Logging};
use quote_analyzer::report;
use tracing::{debug, error, info, warn};

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Config decides where logs go, so it is read before logging starts
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let logging = match logging::init(&LogSettings::from_config(&config, args.quiet)) {
        Ok(logging) => logging,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Quote Analyzer v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let exit_code = match run_analysis(&args, &config, &logging) {
        Ok(()) => 0,
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            1
        }
    };

    // Flush the log file before exiting; process::exit skips destructors
    drop(logging);
    std::process::exit(exit_code);
}

/// Handle --init-config: generate a default config file.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the input file, carriers and logging.");
    Ok(())
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref config_path) => Config::load(config_path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };

    config.merge_with_args(args);
    Ok(config)
}

/// Load, analyze and render. Nothing is emitted unless every step succeeds.
fn run_analysis(args: &Args, config: &Config, logging: &Logging) -> Result<()> {
    let input = config.input_path();

    info!("Loading data from {}", input.display());
    let options = LoadOptions {
        sheet: config.dataset.sheet.clone(),
    };
    let table = loader::load_table(&input, &options)
        .with_context(|| format!("Error loading data from {}", input.display()))?;
    info!("Successfully loaded {} records", table.row_count());

    if config.dataset.carriers.is_empty() {
        warn!("No carriers configured; carrier statistics will be empty");
    }

    let analyzer = Analyzer::new(
        config.dataset.carriers.clone(),
        SystemClock,
        logging.dispatch().clone(),
    );
    let report = analyzer
        .run(&table)
        .with_context(|| format!("Error analyzing {}", input.display()))?;

    let rendered = match config.general.output_format {
        OutputFormat::Text => report::generate_text_report(&report),
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
