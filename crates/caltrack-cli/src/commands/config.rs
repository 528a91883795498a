//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use caltrack_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "log_file": config.log_file,
                    "items_file": config.items_slots().slot_path(caltrack_core::storage::ITEMS_SLOT),
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir: {}", config.data_dir.display());
            println!(
                "  log_file: {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply one `key = value` change
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            if value.is_empty() {
                bail!("data_dir cannot be empty");
            }
            config.data_dir = value.into();
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, log_file",
                key
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            data_dir: PathBuf::from("/data/caltrack"),
            log_file: Some(PathBuf::from("/tmp/caltrack.log")),
        }
    }

    #[test]
    fn test_apply_data_dir() {
        let mut config = config();
        apply(&mut config, "data_dir", "/elsewhere").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/elsewhere"));

        assert!(apply(&mut config, "data_dir", "").is_err());
    }

    #[test]
    fn test_apply_log_file_none_clears() {
        let mut config = config();
        apply(&mut config, "log_file", "none").unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_apply_unknown_key() {
        let mut config = config();
        let err = apply(&mut config, "sync_url", "ws://x").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }
}
