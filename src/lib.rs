//
//  crm-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # CRM Client Library
//!
//! A typed client for a Close.io-style CRM REST API, and the library behind
//! the `crm` command-line tool.
//!
//! ## Features
//!
//! - **Typed Resources**: Leads, contacts and opportunities over open-schema records
//! - **Pluggable Transport**: Resources talk to an injected [`api::Transport`]
//! - **Local Validation**: Missing ids and server-managed fields are rejected before sending
//! - **Scriptable CLI**: Table output for people, JSON output for scripts
//!
//! ## Module Structure
//!
//! - [`api`]: Endpoint templates, request building, transport and resources
//! - [`auth`]: API key and bearer credentials
//! - [`config`]: Configuration file management
//! - [`cli`]: Command-line interface definitions using clap
//! - [`interactive`]: Confirmation prompts
//! - [`output`]: Output formatting (Table, JSON)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crm_client::api::{HttpTransport, LeadApi};
//! use crm_client::Config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let leads = LeadApi::new(Arc::new(HttpTransport::from_config(&config.api)?));
//!
//! let lead = leads.get_lead("lead_abc123").await?;
//! println!("{:?}", lead.display_name());
//! # Ok(())
//! # }
//! ```

/// API client layer.
///
/// Builds requests from named endpoints, dispatches them through a
/// [`Transport`](api::Transport) and maps responses to typed entities.
pub mod api;

/// Authentication credentials.
pub mod auth;

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the clap derive API.
pub mod cli;

/// Configuration file management.
///
/// Manages the CLI's configuration stored in platform-specific locations:
/// - Linux: `~/.config/crm/config.toml`
/// - macOS: `~/Library/Application Support/crm/config.toml`
/// - Windows: `%APPDATA%\crm\config\config.toml`
pub mod config;

/// Confirmation and input prompts for destructive commands.
pub mod interactive;

/// Output formatting for table and JSON modes.
pub mod output;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use crm_client::Cli;
///
/// let cli = Cli::parse();
/// ```
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "crm";

/// Application version constant, derived from Cargo.toml at compile time.
///
/// ```rust
/// use crm_client::VERSION;
///
/// println!("crm version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing scripts
/// to programmatically detect the outcome of CLI operations.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `32+`: External service issues
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    ///
    /// Also used when a request is rejected locally before being sent
    /// (missing id, server-managed field on create).
    pub const USAGE: i32 = 2;

    /// Authentication required or failed (HTTP 401/403).
    ///
    /// Set an API key with `crm config set api.api_key <KEY>` or `CRM_API_KEY`.
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found (HTTP 404, or a failed merge).
    pub const NOT_FOUND: i32 = 8;

    /// API rate limit exceeded (HTTP 429).
    pub const RATE_LIMIT: i32 = 32;

    /// Maps a command failure to its exit code.
    ///
    /// Errors that do not wrap an [`ApiError`](crate::api::ApiError) map to
    /// [`ERROR`].
    pub fn for_error(err: &anyhow::Error) -> i32 {
        use crate::api::ApiError;

        let Some(api_error) = err.downcast_ref::<ApiError>() else {
            return ERROR;
        };

        match api_error {
            ApiError::InvalidParameter(_)
            | ApiError::InvalidNewField(_)
            | ApiError::MissingPathParameter { .. } => USAGE,
            ApiError::RemoteNotFound { .. } => NOT_FOUND,
            other => match other.status() {
                Some(401) | Some(403) => AUTH_ERROR,
                Some(404) => NOT_FOUND,
                Some(429) => RATE_LIMIT,
                _ => ERROR,
            },
        }
    }

}
