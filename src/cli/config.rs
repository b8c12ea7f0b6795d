//
//  crm-client
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! Gets, sets and lists the values of the `[api]` section. Keys may be
//! written with or without the `api.` prefix.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::config::{Config, KEYS};

use super::GlobalOptions;

/// Manage CLI configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List all configuration values
    #[command(visible_alias = "ls")]
    List,

    /// Show configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key (base_url, api_key, timeout_secs)
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key (base_url, api_key, timeout_secs)
    pub key: String,

    /// Configuration value
    pub value: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args, global).await,
            ConfigSubcommand::Set(args) => self.set(args, global).await,
            ConfigSubcommand::List => self.list(global).await,
            ConfigSubcommand::Path => self.path(global).await,
        }
    }

    /// Get a configuration value
    async fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        ensure_known_key(&args.key)?;
        let value = config.get(&args.key);

        if global.json {
            let result = serde_json::json!({
                "key": args.key,
                "value": value,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if let Some(v) = value {
            println!("{}", v);
        }

        Ok(())
    }

    /// Set a configuration value
    async fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let mut config = Config::load()?;
        ensure_known_key(&args.key)?;

        if args.key.ends_with("base_url") {
            url::Url::parse(&args.value)
                .map_err(|e| anyhow::anyhow!("Invalid base URL '{}': {}", args.value, e))?;
        }

        if !config.set(&args.key, args.value.clone()) {
            bail!("Invalid value '{}' for {}", args.value, args.key);
        }
        config.save()?;

        if global.json {
            let result = serde_json::json!({
                "success": true,
                "key": args.key,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{} Set {}", style("✓").green(), style(&args.key).cyan());
        }

        Ok(())
    }

    /// List all configuration values, with the API key masked
    async fn list(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let api_key = config.api.credential().map(|c| c.redacted());

        if global.json {
            let result = serde_json::json!({
                "api": {
                    "base_url": config.api.base_url,
                    "api_key": api_key,
                    "timeout_secs": config.api.timeout_secs,
                }
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        println!();
        println!("{}", style("API Configuration").bold());
        println!("{}", "-".repeat(50));
        print_kv("base_url", &config.api.base_url);
        print_kv("api_key", api_key.as_deref().unwrap_or("-"));
        print_kv("timeout_secs", &config.api.timeout_secs.to_string());
        println!();

        Ok(())
    }

    /// Show configuration file path
    async fn path(&self, global: &GlobalOptions) -> Result<()> {
        let config_path = Config::config_path()?;

        if global.json {
            let result = serde_json::json!({
                "path": config_path.display().to_string(),
                "exists": config_path.exists(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", config_path.display());
        }

        Ok(())
    }
}

fn ensure_known_key(key: &str) -> Result<()> {
    let bare = key.strip_prefix("api.").unwrap_or(key);
    if !KEYS.contains(&bare) {
        bail!(
            "Unknown configuration key '{}'. Valid keys: {}",
            key,
            KEYS.join(", ")
        );
    }
    Ok(())
}

fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).cyan(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys() {
        assert!(ensure_known_key("api_key").is_ok());
        assert!(ensure_known_key("api.timeout_secs").is_ok());
        assert!(ensure_known_key("editor").is_err());
    }
}
