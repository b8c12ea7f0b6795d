//
//  crm-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types shared by every resource
//!
//! This module provides the error type and the response envelope used across
//! all CRM resource endpoints, plus the pagination types re-exported from the
//! [`pagination`] submodule.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`ResponseEnvelope`] - Status code plus parsed JSON body of a response
//! - [`PageRequest`] / [`Page`] - Caller-driven `_limit` / `_skip` pagination
//!
//! # Example
//!
//! ```rust
//! use crm_client::api::common::{ApiError, ResponseEnvelope};
//!
//! let envelope = ResponseEnvelope::parse(200, r#"{"data": [], "has_more": false}"#).unwrap();
//! assert!(envelope.is_success());
//! assert_eq!(envelope.meta("has_more"), Some(&serde_json::json!(false)));
//!
//! fn handle(result: Result<(), ApiError>) {
//!     match result {
//!         Ok(()) => println!("Success!"),
//!         Err(ApiError::InvalidParameter(reason)) => println!("Bad input: {}", reason),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Key under which list endpoints (and some single-object endpoints) nest
/// their payload.
pub const DATA_KEY: &str = "data";

/// Unified error type for all CRM API operations.
///
/// # Variants
///
/// | Variant | Kind | Request sent? |
/// |---------|------|---------------|
/// | `UrlTemplateNotFound` | Configuration error | No |
/// | `MissingPathParameter` | Configuration error | No |
/// | `InvalidParameter` | Local precondition failed | No |
/// | `InvalidNewField` | Server-managed field set on create | No |
/// | `RemoteNotFound` | Strict-success operation failed remotely | Yes |
/// | `UnexpectedStatus` | Non-2xx status passed through | Yes |
/// | `Deserialization` | Success body was not valid JSON / entity | Yes |
/// | `Serialization` | Request body could not be encoded | No |
/// | `Transport` | Network failure from `reqwest` | Maybe |
///
/// # Notes
///
/// - The `Transport` variant automatically converts from `reqwest::Error`
/// - None of the variants are retried internally
#[derive(Error, Debug)]
pub enum ApiError {
    /// The requested endpoint name has no registered URL template.
    ///
    /// The endpoint tables are static per resource, so this is always a
    /// programming error.
    #[error("No URL template registered for endpoint '{0}'")]
    UrlTemplateNotFound(String),

    /// A placeholder in the endpoint template had no path parameter.
    #[error("Missing path parameter '{name}' for template '{template}'")]
    MissingPathParameter {
        /// The template being resolved.
        template: String,
        /// Name of the unresolved placeholder.
        name: String,
    },

    /// A local precondition failed before any request was issued.
    ///
    /// # Parameters
    ///
    /// - `0` - Description of the failed precondition
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A server-managed field was set on a record that is about to be created.
    ///
    /// # Parameters
    ///
    /// - `0` - Name of the offending field
    #[error("Field '{0}' is managed by the server and cannot be set on a new record")]
    InvalidNewField(String),

    /// The remote API reported failure for an operation that demands an exact
    /// success status (e.g. merge expects exactly 200).
    #[error("Resource not found (HTTP {status}): {message}")]
    RemoteNotFound {
        /// HTTP status returned by the server.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// A non-success status returned to an operation that does not interpret
    /// it further.
    #[error("Unexpected response (HTTP {status}): {message}")]
    UnexpectedStatus {
        /// HTTP status returned by the server.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode response: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Serialization(String),

    /// A network-level error occurred during the request.
    ///
    /// Propagated unmodified from the transport: connection failures,
    /// timeouts, DNS resolution errors, TLS failures.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Returns the HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteNotFound { status, .. } | Self::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for errors raised before any request left the process.
    ///
    /// These never reach the network: template lookups, path parameters,
    /// local validation and body encoding.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::UrlTemplateNotFound(_)
                | Self::MissingPathParameter { .. }
                | Self::InvalidParameter(_)
                | Self::InvalidNewField(_)
                | Self::Serialization(_)
        )
    }
}

/// Convenience alias for results produced by the API layer.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Raw result of an HTTP exchange as returned by a transport.
///
/// Transports hand back the status and body text untouched; parsing happens
/// in [`ResponseEnvelope::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text (may be empty).
    pub body: String,
}

/// Wrapper around a single HTTP response.
///
/// `ResponseEnvelope` owns the status code and the parsed JSON body. The body
/// is only meaningful when [`is_success`](Self::is_success) holds; for error
/// statuses it carries whatever the server sent, which is used to build error
/// messages.
///
/// # Example
///
/// ```rust
/// use crm_client::api::common::ResponseEnvelope;
///
/// let json = r#"{"has_more": true, "total_results": 12, "data": [{"id": "lead_1"}]}"#;
/// let envelope = ResponseEnvelope::parse(200, json).unwrap();
///
/// assert_eq!(envelope.status(), 200);
/// assert_eq!(envelope.data().and_then(|d| d.as_array()).map(Vec::len), Some(1));
/// assert_eq!(envelope.meta("total_results"), Some(&serde_json::json!(12)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    status: u16,
    raw: Value,
}

impl ResponseEnvelope {
    /// Creates an envelope from an already parsed body.
    pub fn new(status: u16, raw: Value) -> Self {
        Self { status, raw }
    }

    /// Parses a raw status and body into an envelope.
    ///
    /// An empty body becomes `Value::Null` (typical for `204 No Content`).
    /// When the status is not a success and the body is not JSON, the text is
    /// kept as a JSON string so the status can still be reported.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Deserialization`] when a success response carries
    /// a body that is not valid JSON.
    pub fn parse(status: u16, body: &str) -> ApiResult<Self> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Ok(Self::new(status, Value::Null));
        }

        match serde_json::from_str(trimmed) {
            Ok(raw) => Ok(Self::new(status, raw)),
            Err(_) if !is_success_status(status) => {
                Ok(Self::new(status, Value::String(trimmed.to_string())))
            }
            Err(e) => Err(ApiError::Deserialization(e.to_string())),
        }
    }

    /// Parses a [`RawResponse`] from a transport.
    pub fn from_raw(response: RawResponse) -> ApiResult<Self> {
        Self::parse(response.status, &response.body)
    }

    /// HTTP status code of the response.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` for any status in 200–299.
    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }

    /// Returns `true` only for status 200.
    ///
    /// Listing and merge treat exactly 200 as success.
    pub fn is_exactly_ok(&self) -> bool {
        self.status == 200
    }

    /// The full parsed body.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Consumes the envelope, returning the parsed body.
    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// The value under the `data` key, if the body is an object carrying one.
    pub fn data(&self) -> Option<&Value> {
        self.raw.get(DATA_KEY)
    }

    /// The entity payload: the `data` value when present, otherwise the whole
    /// body.
    ///
    /// Single-object endpoints answer either with the bare object or with the
    /// object nested under `data`; both map through this accessor.
    pub fn payload(&self) -> &Value {
        match self.data() {
            Some(data) if data.is_object() => data,
            _ => &self.raw,
        }
    }

    /// A top-level metadata value other than the payload (`has_more`,
    /// `total_results`, cursors...).
    pub fn meta(&self, key: &str) -> Option<&Value> {
        if key == DATA_KEY {
            return None;
        }
        self.raw.get(key)
    }

    /// A human-readable message describing the body of a failed response.
    pub fn error_message(&self) -> String {
        crate::api::client::format_api_error(self.status, &self.raw)
    }
}

/// Returns `true` for statuses in the 2xx range.
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_empty_body_is_null() {
        let envelope = ResponseEnvelope::parse(204, "").unwrap();
        assert_eq!(envelope.raw(), &Value::Null);
        assert!(envelope.is_success());
        assert!(!envelope.is_exactly_ok());
    }

    #[test]
    fn test_parse_non_json_error_body_is_kept() {
        let envelope = ResponseEnvelope::parse(502, "Bad Gateway").unwrap();
        assert_eq!(envelope.raw(), &json!("Bad Gateway"));
        assert_eq!(envelope.error_message(), "Bad Gateway");
    }

    #[test]
    fn test_parse_non_json_success_body_fails() {
        let err = ResponseEnvelope::parse(200, "<html>").unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn test_payload_prefers_data_object() {
        let nested = ResponseEnvelope::new(200, json!({"data": {"id": "lead_1"}}));
        assert_eq!(nested.payload(), &json!({"id": "lead_1"}));

        let bare = ResponseEnvelope::new(200, json!({"id": "lead_2", "data": [1]}));
        assert_eq!(bare.payload()["id"], "lead_2");
    }

    #[test]
    fn test_meta_excludes_data_key() {
        let envelope = ResponseEnvelope::new(200, json!({"data": [], "has_more": true}));
        assert_eq!(envelope.meta("has_more"), Some(&json!(true)));
        assert_eq!(envelope.meta(DATA_KEY), None);
    }

    #[test]
    fn test_local_errors() {
        assert!(ApiError::InvalidNewField("id".into()).is_local());
        assert!(!ApiError::RemoteNotFound {
            status: 404,
            message: String::new()
        }
        .is_local());
        assert_eq!(
            ApiError::UnexpectedStatus {
                status: 500,
                message: String::new()
            }
            .status(),
            Some(500)
        );
    }
}
