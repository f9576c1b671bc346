//! lobx: double limit book auction
//!
//! Replays order events through the matching engine and prints trades,
//! book reports and a timing summary. Also validates and generates
//! configuration files.

mod runner;

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use config::{
    apply_defaults, generate_default_config, load_config, save_config, validate_config,
    MasterConfig, ReportingMode, RetentionMode, ValidationReport,
};
use matching_engine::scenario::demo_events;
use matching_engine::{
    Auction, JsonLinesSource, NullSink, OrderRegistry, ReportSink, RetentionPolicy, StdoutSink,
};
use observability::{init_logging, LogFormat};
use runner::Runner;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // the config may choose the log format, so it is read before logging starts
    let run_config = match &cli.command {
        Commands::Run {
            config: Some(path), ..
        } => Some(load_checked(path)?),
        _ => None,
    };

    let format = match (cli.log_format, &run_config) {
        (Some(arg), _) => LogFormat::parse(arg.as_str()),
        (None, Some(config)) => LogFormat::parse(&config.logging.format),
        (None, None) => None,
    }
    .unwrap_or_default();
    let quiet = matches!(cli.command, Commands::Run { .. } | Commands::Demo { .. });
    init_logging("lobx", format, quiet)?;
    debug!(?cli, "CLI arguments parsed");

    let verbosity = cli.command.verbosity_override();
    match cli.command {
        Commands::Run { events, .. } => {
            info!("Executing 'run' command");
            let config = run_config.unwrap_or_else(generate_default_config);
            run_command(&events, &config, verbosity)
        }
        Commands::Demo { .. } => {
            info!("Executing 'demo' command");
            demo_command(verbosity)
        }
        Commands::Validate { config } => {
            info!("Executing 'validate' command");
            validate_command(config)
        }
        Commands::Init { output } => {
            info!("Executing 'init' command");
            init_command(output)
        }
    }
}

/// Load a config, apply defaults and refuse it if validation fails
fn load_checked(path: &Path) -> Result<MasterConfig> {
    let mut config = load_config(path)?;
    let mut report = ValidationReport::new();
    apply_defaults(&mut config, &mut report);

    let validation = validate_config(&config);
    for warning in &validation.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    if !validation.is_valid() {
        for err in &validation.errors {
            error!("{}", err);
        }
        anyhow::bail!("Configuration validation failed: {:?}", path);
    }
    Ok(config)
}

fn build_runner(config: &MasterConfig, verbose: bool) -> Runner {
    let policy = match config.registry.retention {
        RetentionMode::RetainAll => RetentionPolicy::RetainAll,
        RetentionMode::EvictTerminal => RetentionPolicy::EvictTerminal,
    };
    let registry = OrderRegistry::with_policy(policy, config.registry.initial_capacity);

    let trade_sink: Box<dyn ReportSink> = if config.reporting.print_trades {
        Box::new(StdoutSink)
    } else {
        Box::new(NullSink)
    };

    info!(
        auction = %config.auction.name,
        retention = %config.registry.retention,
        verbose,
        "Auction configured"
    );
    Runner::new(Auction::new(registry, trade_sink), Box::new(StdoutSink), verbose)
}

fn is_verbose(config: &MasterConfig, verbosity: Option<bool>) -> bool {
    verbosity.unwrap_or(config.reporting.mode == ReportingMode::Verbose)
}

fn run_command(events: &Path, config: &MasterConfig, verbosity: Option<bool>) -> Result<()> {
    let reader: Box<dyn BufRead> = if events == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(events)
            .with_context(|| format!("Failed to open events file: {:?}", events))?;
        Box::new(BufReader::new(file))
    };

    let mut runner = build_runner(config, is_verbose(config, verbosity));
    let summary = runner.run(JsonLinesSource::new(reader));
    runner.finish(&summary);

    if let Some(err) = summary.read_error {
        anyhow::bail!("Failed to read events file {:?}: {}", events, err);
    }
    Ok(())
}

fn demo_command(verbosity: Option<bool>) -> Result<()> {
    let config = generate_default_config();
    let mut runner = build_runner(&config, is_verbose(&config, verbosity));
    let summary = runner.run(demo_events().into_iter().map(Ok));
    runner.finish(&summary);
    Ok(())
}

fn validate_command(config_path: PathBuf) -> Result<()> {
    info!(path = ?config_path, "Validating configuration");

    let mut config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            return Err(e);
        }
    };

    let mut report = validate_config(&config);
    apply_defaults(&mut config, &mut report);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Auction: {}", config.auction.name);
    println!("Version: {}", config.auction.version);
    println!("Retention: {}", config.registry.retention);
    println!("Reporting: {:?}", config.reporting.mode);
    println!("Log format: {}", config.logging.format);

    Ok(())
}

fn init_command(output_path: PathBuf) -> Result<()> {
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    save_config(&config, &output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Edit the configuration file to customize settings");
    println!(
        "  2. Run 'lobx validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'lobx run --events <file.jsonl> --config {:?}' to replay events",
        output_path
    );

    Ok(())
}
