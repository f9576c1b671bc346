use crate::*;
use regex::Regex;
use thiserror::Error;

const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Auction name is required")]
    MissingAuctionName,

    #[error("Invalid version format: {0}. Must be in format X.Y.Z (e.g., 1.0.0)")]
    InvalidVersionFormat(String),

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Environment variable in '{field}' is not resolved: {value}")]
    UnresolvedEnvVar { field: String, value: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MasterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_auction(&config.auction, &mut report);
    validate_registry(&config.registry, &mut report);
    validate_reporting(&config.reporting, &mut report);
    validate_logging(&config.logging, &mut report);

    report
}

/// Replace zero or missing values with their defaults, recording each one
pub fn apply_defaults(config: &mut MasterConfig, report: &mut ValidationReport) {
    if config.registry.initial_capacity == 0 {
        config.registry.initial_capacity = default_initial_capacity();
        report.add_default(
            "registry.initial_capacity",
            &config.registry.initial_capacity.to_string(),
        );
    }

    if config.logging.format.trim().is_empty() {
        config.logging.format = default_log_format();
        report.add_default("logging.format", &config.logging.format);
    }
}

fn check_resolved(field: &str, value: &str, report: &mut ValidationReport) {
    if has_unresolved_env_vars(value) {
        report.add_error(ValidationError::UnresolvedEnvVar {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

fn validate_auction(auction: &AuctionConfig, report: &mut ValidationReport) {
    if auction.name.trim().is_empty() {
        report.add_error(ValidationError::MissingAuctionName);
    }
    check_resolved("auction.name", &auction.name, report);

    let version_ok = Regex::new(r"^\d+\.\d+\.\d+$")
        .map(|re| re.is_match(&auction.version))
        .unwrap_or(false);
    if !version_ok {
        report.add_error(ValidationError::InvalidVersionFormat(auction.version.clone()));
    }
}

fn validate_registry(registry: &RegistryConfig, report: &mut ValidationReport) {
    if registry.retention == RetentionMode::EvictTerminal {
        report.add_warning(
            "registry.retention",
            "evict_terminal: cancels of filled or cancelled ids report the id as unknown",
        );
    }

    if registry.initial_capacity == 0 {
        report.add_warning(
            "registry.initial_capacity",
            "0 disables preallocation; the default is applied at load",
        );
    }
}

fn validate_reporting(reporting: &ReportingConfig, report: &mut ValidationReport) {
    if reporting.mode == ReportingMode::Verbose && !reporting.print_trades {
        report.add_warning(
            "reporting.print_trades",
            "verbose mode prints the top of book but trades are suppressed",
        );
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    check_resolved("logging.format", &logging.format, report);

    let format = logging.format.to_lowercase();
    if !has_unresolved_env_vars(&format) && !LOG_FORMATS.contains(&format.as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }
}
