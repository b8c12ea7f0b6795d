//
//  crm-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides a typed client for a Close.io-style CRM REST API.
//!
//! ## Architecture
//!
//! The API layer is organized bottom-up:
//!
//! - [`template`]: Endpoint tables and `[:name]` placeholder substitution
//! - [`request`]: Transport-agnostic request descriptors and their builder
//! - [`transport`]: The [`Transport`] seam and its `reqwest` implementation
//! - [`common`]: Response envelope, pagination and errors
//! - [`entity`]: Open-schema records and the [`Entity`](entity::Entity) trait
//! - [`client`]: [`ApiResource`], the CRUD behavior shared by every resource
//! - [`resources`]: Leads, contacts and opportunities
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crm_client::api::{HttpTransport, LeadApi, PageRequest};
//! use crm_client::auth::AuthCredential;
//!
//! # async fn example() -> Result<(), crm_client::api::ApiError> {
//! let transport = HttpTransport::new("https://api.close.com/api/v1")?
//!     .with_auth(AuthCredential::api_key("api_xxx"));
//! let leads = LeadApi::new(Arc::new(transport));
//!
//! for lead in leads.get_all_leads(&PageRequest::new().limit(10)).await? {
//!     println!("{}", lead.display_name().unwrap_or("(unnamed)"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Operations return [`ApiError`]. Local validation failures
//! (`InvalidParameter`, `InvalidNewField`, template errors) are raised before
//! anything is sent; remote failures carry the HTTP status.

/// Shared resource behavior and error-body formatting.
pub mod client;

/// Response envelope, pagination and [`ApiError`].
pub mod common;

/// Open-schema records and the [`Entity`](entity::Entity) trait.
pub mod entity;

/// Request descriptors and [`RequestBuilder`](request::RequestBuilder).
pub mod request;

/// Typed resources.
pub mod resources;

/// Endpoint tables and `[:name]` URL templates.
pub mod template;

/// Network transport.
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::ApiResource;
pub use common::{ApiError, ApiResult, Page, PageRequest, ResponseEnvelope};
pub use resources::{Contact, ContactApi, Lead, LeadApi, Opportunity, OpportunityApi};
pub use transport::{HttpTransport, Transport};
