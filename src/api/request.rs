//
//  crm-client
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Transport-agnostic request descriptors.
//!
//! A [`RequestDescriptor`] is plain data: verb, concrete URL path (with the
//! query string already appended), optional pre-serialized body and the
//! filters it was built from. [`RequestBuilder`] produces descriptors from an
//! endpoint name; the transport executes them.
//!
//! Query values are not URL-encoded here. Callers pre-encode values that
//! contain reserved characters.

use std::fmt;

use crate::api::common::ApiResult;
use crate::api::template::{EndpointTable, PathParams};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of query filters.
///
/// Behaves like an insertion-ordered map: inserting an existing key replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilters {
    entries: Vec<(String, String)>,
}

impl QueryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, keeping the original position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryFilters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Self::new();
        for (k, v) in iter {
            filters.insert(k, v);
        }
        filters
    }
}

/// Renders filters as `key=value` pairs joined with `&`, in insertion order.
///
/// ```rust
/// use crm_client::api::request::{build_query_string, QueryFilters};
///
/// let filters: QueryFilters = [("a", "1"), ("b", "2")].into_iter().collect();
/// assert_eq!(build_query_string(&filters), "a=1&b=2");
/// ```
pub fn build_query_string(filters: &QueryFilters) -> String {
    filters
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// A single HTTP request described as plain data.
///
/// Immutable once built. The verb defaults to `GET` and is stamped by the
/// dispatching `trigger_*` method through [`with_method`](Self::with_method),
/// which consumes the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: HttpMethod,
    url: String,
    body: Option<String>,
    query_filters: QueryFilters,
}

impl RequestDescriptor {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Concrete path, including the query string when filters are present.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Pre-serialized body, sent verbatim.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn query_filters(&self) -> &QueryFilters {
        &self.query_filters
    }

    /// Returns the same request with a different verb.
    pub fn with_method(self, method: HttpMethod) -> Self {
        Self { method, ..self }
    }
}

/// Builds [`RequestDescriptor`] values against one resource's endpoint table.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder {
    endpoints: &'static EndpointTable,
}

impl RequestBuilder {
    pub fn new(endpoints: &'static EndpointTable) -> Self {
        Self { endpoints }
    }

    /// Resolves `endpoint` and assembles the request.
    ///
    /// The body is attached as-is; non-empty filters are appended as a query
    /// string. Identical inputs always produce identical descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UrlTemplateNotFound`](crate::api::ApiError::UrlTemplateNotFound)
    /// or [`ApiError::MissingPathParameter`](crate::api::ApiError::MissingPathParameter)
    /// when the template cannot be resolved.
    pub fn build(
        &self,
        endpoint: &str,
        body: Option<String>,
        path_params: Option<&PathParams>,
        query_filters: Option<&QueryFilters>,
    ) -> ApiResult<RequestDescriptor> {
        let empty = PathParams::new();
        let mut url = self.endpoints.resolve(endpoint, path_params.unwrap_or(&empty))?;

        let query_filters = query_filters.cloned().unwrap_or_default();
        if !query_filters.is_empty() {
            url.push('?');
            url.push_str(&build_query_string(&query_filters));
        }

        Ok(RequestDescriptor {
            method: HttpMethod::Get,
            url,
            body,
            query_filters,
        })
    }
}
