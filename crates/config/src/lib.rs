use serde::{Deserialize, Serialize};
use std::fmt;

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuctionConfig {
    pub name: String,
    pub version: String,
}

/// What the order registry does with ids that can no longer trade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionMode {
    #[default]
    RetainAll,
    EvictTerminal,
}

impl fmt::Display for RetentionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionMode::RetainAll => write!(f, "retain_all"),
            RetentionMode::EvictTerminal => write!(f, "evict_terminal"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub retention: RetentionMode,
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            retention: RetentionMode::default(),
            initial_capacity: default_initial_capacity(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportingMode {
    /// Top of book after every event
    Verbose,
    /// Final dump and run summary only
    #[default]
    Silent,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportingConfig {
    #[serde(default)]
    pub mode: ReportingMode,
    #[serde(default = "default_print_trades")]
    pub print_trades: bool,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            mode: ReportingMode::default(),
            print_trades: default_print_trades(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// pretty, json or compact
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MasterConfig {
    pub auction: AuctionConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub reporting: ReportingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
