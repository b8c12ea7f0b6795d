//
//  crm-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials applied to outgoing requests by the HTTP transport.
//!
//! ## Supported Authentication Methods
//!
//! - **API key**: the CRM's primary method. The key is sent as the HTTP Basic
//!   username with an empty password.
//! - **Bearer token**: OAuth access tokens issued to integrations.
//!
//! Credentials are never persisted by this module; they come from the
//! configuration file or the environment.
//!
//! ## Example
//!
//! ```rust
//! use crm_client::auth::AuthCredential;
//!
//! let credential = AuthCredential::api_key("api_1234567890abcdef");
//! assert_eq!(credential.redacted(), "api_...cdef");
//! ```

use reqwest::RequestBuilder;

/// Credentials understood by the CRM API.
///
/// # Variants
///
/// - `ApiKey`: organization API key, sent through HTTP Basic authentication.
/// - `Bearer`: OAuth access token, sent in an `Authorization: Bearer` header.
#[derive(Clone)]
pub enum AuthCredential {
    /// Organization API key.
    ApiKey {
        /// The API key string.
        key: String,
    },
    /// OAuth 2.0 access token.
    Bearer {
        /// The access token string.
        token: String,
    },
}

impl AuthCredential {
    /// Creates an API key credential.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey { key: key.into() }
    }

    /// Creates a bearer token credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Applies the credential to an HTTP request.
    ///
    /// API keys use Basic authentication (key as username, empty password);
    /// bearer tokens use the `Authorization: Bearer` header.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiKey { key } => request.basic_auth(key, Some("")),
            Self::Bearer { token } => request.bearer_auth(token),
        }
    }

    /// A display-safe form of the secret: first four and last four characters.
    pub fn redacted(&self) -> String {
        let secret = match self {
            Self::ApiKey { key } => key,
            Self::Bearer { token } => token,
        };
        let chars: Vec<char> = secret.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl std::fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey { .. } => write!(f, "ApiKey({})", self.redacted()),
            Self::Bearer { .. } => write!(f, "Bearer({})", self.redacted()),
        }
    }
}
