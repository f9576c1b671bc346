use anyhow::{Context, Result};
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const ENV_VAR_PATTERN: &str = r"\$\{(\w+)\}|\$(\w+)";

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(ENV_VAR_PATTERN).context("Invalid environment variable pattern")?;
    let mut result = content.to_string();
    let mut missing_vars = Vec::new();

    for caps in re.captures_iter(content) {
        let (Some(var), Some(placeholder)) = (caps.get(1).or(caps.get(2)), caps.get(0)) else {
            continue;
        };
        let var_name = var.as_str();

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {} = \"{}\"", var_name, value);
                result = result.replace(placeholder.as_str(), &value);
            }
            Err(_) => {
                // placeholder stays; the validator reports it
                warn!("Environment variable '{}' not set", var_name);
                missing_vars.push(var_name.to_string());
            }
        }
    }

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result)
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    Regex::new(ENV_VAR_PATTERN)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}
