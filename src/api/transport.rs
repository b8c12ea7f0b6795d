//
//  crm-client
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Transport
//!
//! The [`Transport`] trait is the single seam between the request/response
//! layer and the network. It takes a [`RequestDescriptor`] and hands back the
//! raw status and body; it performs no interpretation of either.
//!
//! [`HttpTransport`] is the production implementation on top of `reqwest`.
//! Timeouts, TLS and connection pooling belong to it. The resource layer adds
//! no retries and no timeouts of its own.
//!
//! Transports are injected into resources at construction time:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crm_client::api::{HttpTransport, LeadApi};
//! use crm_client::auth::AuthCredential;
//!
//! let transport = HttpTransport::new("https://api.close.com/api/v1")?
//!     .with_auth(AuthCredential::api_key("api_xxx"));
//! let leads = LeadApi::new(Arc::new(transport));
//! # Ok::<(), crm_client::api::ApiError>(())
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use crate::api::common::{ApiError, ApiResult, RawResponse};
use crate::api::request::{HttpMethod, RequestDescriptor};
use crate::auth::AuthCredential;
use crate::config::ApiConfig;

/// Executes a request and returns the raw status code and body.
///
/// Implementations must be shareable across tasks; a single transport is
/// usually behind an `Arc` used by several resources.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one HTTP exchange.
    ///
    /// # Errors
    ///
    /// Only network-level failures are errors. Any status code the server
    /// answers with, including 4xx/5xx, is a successful exchange.
    async fn execute(&self, request: &RequestDescriptor) -> ApiResult<RawResponse>;
}

/// `reqwest`-backed transport.
///
/// Request paths are appended to the base URL. JSON bodies are sent with
/// `Content-Type: application/json`, and credentials are applied when
/// configured.
pub struct HttpTransport {
    /// The underlying HTTP client
    http: Client,
    /// Base URL without trailing slash (e.g. "https://api.close.com/api/v1")
    base_url: String,
    /// Optional authentication credentials
    auth: Option<AuthCredential>,
}

impl HttpTransport {
    /// Creates a transport for `base_url` with no timeout and no credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] when `base_url` is not an
    /// absolute URL, or [`ApiError::Transport`] if the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Creates a transport whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> ApiResult<Self> {
        Url::parse(base_url).map_err(|e| {
            ApiError::InvalidParameter(format!("invalid base URL '{base_url}': {e}"))
        })?;

        let mut builder = Client::builder().user_agent(format!("crm/{}", crate::VERSION));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: None,
        })
    }

    /// Creates a transport from the `[api]` configuration section.
    ///
    /// The API key, when present, is applied as the credential.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let transport = Self::with_timeout(&config.base_url, config.timeout())?;
        Ok(match config.credential() {
            Some(auth) => transport.with_auth(auth),
            None => transport,
        })
    }

    /// Sets the authentication credentials for this transport.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a request path.
    pub fn url_for(&self, request: &RequestDescriptor) -> String {
        format!("{}{}", self.base_url, request.url())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &RequestDescriptor) -> ApiResult<RawResponse> {
        let url = self.url_for(request);
        let mut builder = match request.method() {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
            HttpMethod::Put => self.http.put(&url),
            HttpMethod::Delete => self.http.delete(&url),
        };

        if let Some(body) = request.body() {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        if let Some(auth) = &self.auth {
            builder = auth.apply_to_request(builder);
        }

        tracing::debug!(method = %request.method(), url = %url, "Dispatching request");
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(status, bytes = body.len(), "Received response");

        Ok(RawResponse { status, body })
    }
}
