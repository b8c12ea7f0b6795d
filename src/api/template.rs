//
//  crm-client
//  api/template.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Endpoint URL Templates
//!
//! Every resource declares a static table mapping symbolic endpoint names to
//! URL templates. Templates contain named placeholders written `[:name]`:
//!
//! ```text
//! get-lead     -> /lead/[:id]/
//! merge-leads  -> /lead/merge/
//! ```
//!
//! The table is the wire contract with the remote service's routing. It is
//! built once per resource type and never mutated.
//!
//! ## Example
//!
//! ```rust
//! use crm_client::api::template::{path_params, EndpointTable};
//!
//! static TABLE: EndpointTable = EndpointTable::new(&[("get-lead", "/lead/[:id]/")]);
//!
//! let path = TABLE.resolve("get-lead", &path_params([("id", "lead_42")])).unwrap();
//! assert_eq!(path, "/lead/lead_42/");
//! ```

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::api::common::{ApiError, ApiResult};

/// Placeholder syntax inside templates: `[:name]`.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[:([A-Za-z0-9_]+)\]").expect("placeholder pattern is valid")
});

/// Values for the placeholders of a template, keyed by placeholder name.
pub type PathParams = BTreeMap<String, String>;

/// Builds [`PathParams`] from `(name, value)` pairs.
pub fn path_params<I, K, V>(pairs: I) -> PathParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Substitutes every placeholder of `template` with its value from `params`.
///
/// Parameters the template does not use are ignored.
///
/// # Errors
///
/// Returns [`ApiError::MissingPathParameter`] naming the first placeholder
/// without a value.
pub fn resolve(template: &str, params: &PathParams) -> ApiResult<String> {
    if let Some(missing) = placeholders(template).find(|name| !params.contains_key(*name)) {
        return Err(ApiError::MissingPathParameter {
            template: template.to_string(),
            name: missing.to_string(),
        });
    }

    let resolved = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        params.get(&caps[1]).cloned().unwrap_or_default()
    });
    Ok(resolved.into_owned())
}

/// Names of the placeholders of `template`, in order of appearance.
pub fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Static mapping from endpoint name to URL template.
#[derive(Debug, Clone, Copy)]
pub struct EndpointTable {
    entries: &'static [(&'static str, &'static str)],
}

impl EndpointTable {
    /// Wraps a static list of `(name, template)` pairs.
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Looks up the template registered for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UrlTemplateNotFound`] when no template is registered.
    pub fn template(&self, endpoint: &str) -> ApiResult<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == endpoint)
            .map(|(_, template)| *template)
            .ok_or_else(|| ApiError::UrlTemplateNotFound(endpoint.to_string()))
    }

    /// Looks up and resolves the template for `endpoint`.
    pub fn resolve(&self, endpoint: &str, params: &PathParams) -> ApiResult<String> {
        resolve(self.template(endpoint)?, params)
    }

    /// Registered endpoint names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(name, _)| *name)
    }
}
