use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let substituted = substitution::substitute_env_vars(&content)?;
    debug!("Environment variable substitution completed");

    let config: MasterConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

#[instrument]
pub fn generate_default_config() -> MasterConfig {
    use defaults::*;

    MasterConfig {
        auction: AuctionConfig {
            name: default_auction_name(),
            version: default_version(),
        },
        registry: RegistryConfig::default(),
        reporting: ReportingConfig::default(),
        logging: LoggingConfig::default(),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &MasterConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = generate_default_config();
        let report = validate_config(&config);
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lobx.yaml");

        let mut config = generate_default_config();
        config.registry.retention = RetentionMode::EvictTerminal;
        config.reporting.mode = ReportingMode::Verbose;
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.auction.name, config.auction.name);
        assert_eq!(loaded.registry.retention, RetentionMode::EvictTerminal);
        assert_eq!(loaded.reporting.mode, ReportingMode::Verbose);
        assert_eq!(loaded.logging.format, "pretty");
    }

    #[test]
    fn test_load_substitutes_environment() {
        std::env::set_var("LOBX_TEST_LOG_FORMAT", "compact");
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lobx.yaml");
        fs::write(
            &path,
            concat!(
                "auction:\n  name: Env\n  version: 1.2.3\n",
                "logging:\n  format: ${LOBX_TEST_LOG_FORMAT}\n",
            ),
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
