//! Config command implementation.
//!
//! The config file lives at ~/.config/azvec/config.toml:
//!
//! ```toml
//! endpoint = "https://my-service.search.windows.net"
//! api_key = "..."
//! vector_field = "content_vector"
//!
//! [retry]
//! max_retries = 3
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;

use azure_vector_store_rs::azure::AzureVectorStoreConfig;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};
use crate::cli::Cli;

/// Current config file version.
const CONFIG_VERSION: u32 = 1;

/// Minimum key length to apply masking.
const KEY_MASK_MIN_LENGTH: usize = 8;

/// Number of characters to show at start/end of a masked key.
const KEY_MASK_VISIBLE_CHARS: usize = 4;

/// Configuration file structure.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Search service endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Admin or query key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// REST API version override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Preferred vector field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_field: Option<String>,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            endpoint: None,
            api_key: None,
            api_version: None,
            vector_field: None,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry and timeout settings.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_backoff_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_backoff_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

/// Gets the config file path.
///
/// `AZVEC_CONFIG` wins, then `$XDG_CONFIG_HOME/azvec`, then `~/.config/azvec`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("AZVEC_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("azvec").join("config.toml"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("azvec").join("config.toml"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk. A missing file yields the defaults.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))
}

/// Resolves store settings: flags and environment first, then the config file.
pub fn resolve_store_config(cli: &Cli) -> Result<AzureVectorStoreConfig> {
    let config = load_config()?;

    let endpoint = cli
        .endpoint
        .clone()
        .or(config.endpoint)
        .ok_or_else(|| {
            CommandError::Config(
                "No endpoint configured. Use --endpoint, AZURE_SEARCH_ENDPOINT, or the config file."
                    .to_string(),
            )
        })?;
    let api_key = cli.api_key.clone().or(config.api_key).ok_or_else(|| {
        CommandError::Config(
            "No API key configured. Use --api-key, AZURE_SEARCH_API_KEY, or the config file."
                .to_string(),
        )
    })?;

    Ok(AzureVectorStoreConfig {
        api_version: config.api_version,
        vector_field: config.vector_field,
        max_retries: config.retry.max_retries,
        initial_backoff_ms: config.retry.initial_backoff_ms,
        max_backoff_ms: config.retry.max_backoff_ms,
        request_timeout_secs: config.retry.request_timeout_secs,
        ..AzureVectorStoreConfig::new(endpoint, api_key)
    })
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;
    config.api_key = config.api_key.as_deref().map(mask_key);

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            let value = |v: &Option<String>| v.clone().unwrap_or_else(|| "(not set)".to_string());
            println!("  endpoint: {}", value(&config.endpoint));
            println!("  api_key: {}", value(&config.api_key));
            println!("  api_version: {}", value(&config.api_version));
            println!("  vector_field: {}", value(&config.vector_field));
            if let Some(retries) = config.retry.max_retries {
                println!("\n[retry]\n  max_retries: {}", retries);
            }
        } else {
            println!("(No config file exists.)");
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Masks a key for display, showing only the first and last characters.
fn mask_key(key: &str) -> String {
    let char_count = key.chars().count();
    if char_count > KEY_MASK_MIN_LENGTH {
        let prefix: String = key.chars().take(KEY_MASK_VISIBLE_CHARS).collect();
        let suffix: String = key.chars().skip(char_count - KEY_MASK_VISIBLE_CHARS).collect();
        format!("{}...{}", prefix, suffix)
    } else {
        "****".to_string()
    }
}
