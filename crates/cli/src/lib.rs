use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lobx")]
#[command(about = "Double limit book auction - price-time priority order matching")]
#[command(version)]
pub struct Cli {
    /// Log output format; overrides the config file
    #[arg(long, global = true, value_enum, env = "LOBX_LOG_FORMAT")]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON-lines event file through the auction
    Run {
        /// Events, one JSON object per line ("-" reads stdin)
        #[arg(short, long)]
        events: PathBuf,

        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the top of book after every event
        #[arg(short, long, conflicts_with = "silent")]
        verbose: bool,

        /// Print only the final book and the run summary
        #[arg(short, long)]
        silent: bool,
    },

    /// Run the built-in two-symbol demonstration session
    Demo {
        /// Print the top of book after every event
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "master_config/master_config.yaml")]
        config: PathBuf,
    },

    /// Write a configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "master_config.yaml")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Commands {
    /// Verbosity requested on the command line; `None` defers to the config
    pub fn verbosity_override(&self) -> Option<bool> {
        match self {
            Commands::Run { verbose: true, .. } | Commands::Demo { verbose: true } => Some(true),
            Commands::Run { silent: true, .. } => Some(false),
            _ => None,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_run_arguments() {
        let cli = Cli::try_parse_from([
            "lobx", "run", "--events", "day.jsonl", "--config", "lobx.yaml", "--verbose",
        ])
        .unwrap();

        assert_matches!(
            &cli.command,
            Commands::Run { events, config: Some(config), verbose: true, silent: false }
                if events.to_str() == Some("day.jsonl") && config.to_str() == Some("lobx.yaml")
        );
        assert_eq!(cli.command.verbosity_override(), Some(true));
    }

    #[test]
    fn test_verbose_and_silent_conflict() {
        let result = Cli::try_parse_from(["lobx", "run", "-e", "x.jsonl", "-v", "-s"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_silent_and_default_verbosity() {
        let cli = Cli::try_parse_from(["lobx", "run", "-e", "x.jsonl", "--silent"]).unwrap();
        assert_eq!(cli.command.verbosity_override(), Some(false));

        let cli = Cli::try_parse_from(["lobx", "run", "-e", "x.jsonl"]).unwrap();
        assert_eq!(cli.command.verbosity_override(), None);

        let cli = Cli::try_parse_from(["lobx", "demo"]).unwrap();
        assert_eq!(cli.command.verbosity_override(), None);
    }

    #[test]
    fn test_global_log_format() {
        let cli = Cli::try_parse_from(["lobx", "demo", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, Some(LogFormatArg::Json));
        assert_eq!(cli.log_format.map(|f| f.as_str()), Some("json"));
    }

    #[test]
    fn test_validate_default_path() {
        let cli = Cli::try_parse_from(["lobx", "validate"]).unwrap();
        assert_matches!(
            cli.command,
            Commands::Validate { config } if config.ends_with("master_config.yaml")
        );
    }
}
