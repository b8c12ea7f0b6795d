//
//  crm-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod completion;
mod config;
mod lead;

pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use lead::LeadCommand;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::{HttpTransport, Transport};
use crate::config::{ApiConfig, Config};
use crate::output::{OutputFormat, OutputWriter};

/// crm - Work with your CRM from the command line
#[derive(Parser, Debug)]
#[command(
    name = "crm",
    version,
    about = "Work with your CRM from the command line",
    long_about = "crm is a CLI for a Close.io-style CRM REST API.\n\n\
                  It lists, searches, creates, updates, deletes and merges leads.",
    propagate_version = true,
    after_help = "Use 'crm <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// API root, overriding the configured base URL
    #[arg(long, global = true, env = "CRM_BASE_URL")]
    pub base_url: Option<String>,

    /// API key, overriding the configured key
    #[arg(long, global = true, env = "CRM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Disable interactive prompts
    #[arg(long, global = true, env = "CRM_NO_PROMPT")]
    pub no_prompt: bool,
}

impl GlobalOptions {
    /// The `[api]` configuration with command-line overrides applied.
    pub fn api_config(&self) -> Result<ApiConfig> {
        let mut api = Config::load()?.api;
        if let Some(base_url) = &self.base_url {
            api.base_url = base_url.clone();
        }
        if let Some(api_key) = &self.api_key {
            api.api_key = Some(api_key.clone());
        }
        Ok(api)
    }

    /// A transport built from [`api_config`](Self::api_config).
    pub fn transport(&self) -> Result<Arc<dyn Transport>> {
        let config = self.api_config()?;
        if config.credential().is_none() {
            tracing::warn!("No API key configured; requests will be unauthenticated");
        }
        Ok(Arc::new(HttpTransport::from_config(&config)?))
    }

    pub fn output(&self) -> OutputWriter {
        OutputWriter::new(if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        })
    }

    /// Whether commands may ask for confirmation or input.
    pub fn prompts_enabled(&self) -> bool {
        !self.no_prompt && crate::interactive::can_prompt()
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage leads
    #[command(visible_alias = "l")]
    Lead(LeadCommand),

    /// Manage CLI configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "crm",
            "lead",
            "view",
            "lead_1",
            "--json",
            "--base-url",
            "http://localhost:9000",
        ])
        .unwrap();
        assert!(cli.global.json);
        assert_eq!(cli.global.base_url.as_deref(), Some("http://localhost:9000"));
        assert!(matches!(cli.command, Commands::Lead(_)));
    }
}
