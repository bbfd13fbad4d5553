use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config_manager::main::Config;

/// Read a YAML or JSON configuration file with environment variable substitution
pub fn read_config_file(config_path: &str) -> Result<Value> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let content = load_text_file_with_guess_encoding(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path);
    }

    let content = substitute_env_vars(&content)?;

    let path_lower = config_path.to_lowercase();
    let value: Value = if path_lower.ends_with(".json") || path_lower.ends_with(".jsonld") {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", config_path))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML in {}", config_path))?
    };
    Ok(value)
}

/// Replace `${VAR_NAME}` with the variable's value, or nothing when unset
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| {
            debug!("Environment variable {} is not set", var_name);
            String::new()
        })
    });
    Ok(replaced.into_owned())
}

/// Validate configuration data against the Config model
pub fn validate_config(config_data: &Value) -> Result<Config> {
    let config: Config = serde_json::from_value(config_data.clone())?;
    config
        .system_config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid system_config: {}", e))?;
    Ok(config)
}

/// Load text file, falling back to GBK when it is not valid UTF-8
pub fn load_text_file_with_guess_encoding(file_path: &str) -> Result<String> {
    let mut bytes = fs::read(file_path)?;

    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        bytes.drain(0..3);
    }

    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(e) => {
            debug!("{} is not UTF-8, decoding as GBK", file_path);
            let (cow, _, _) = encoding_rs::GBK.decode(e.as_bytes());
            Ok(cow.into_owned())
        }
    }
}

/// Load the first configuration file that exists, or the defaults when none does
pub fn load_first_config(candidates: &[String]) -> Result<(Config, Option<String>)> {
    for path in candidates {
        if Path::new(path).exists() {
            let config = Config::load(path)?;
            return Ok((config, Some(path.clone())));
        }
        debug!("No configuration at {}", path);
    }
    Ok((Config::default(), None))
}
