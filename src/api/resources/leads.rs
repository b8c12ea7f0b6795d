//
//  crm-client
//  api/resources/leads.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Lead resource.
//!
//! Leads are the top-level CRM object: a company or organization, holding
//! contacts, opportunities and tasks.
//!
//! # Endpoints
//!
//! | Name | Template | Verb |
//! |------|----------|------|
//! | `get-leads` | `/lead/` | GET |
//! | `get-lead` | `/lead/[:id]/` | GET |
//! | `add-lead` | `/lead/` | POST |
//! | `update-lead` | `/lead/[:id]/` | PUT |
//! | `delete-lead` | `/lead/[:id]/` | DELETE |
//! | `merge-leads` | `/lead/merge/` | POST |
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crm_client::api::{HttpTransport, Lead, LeadApi, PageRequest};
//!
//! # async fn example() -> Result<(), crm_client::api::ApiError> {
//! let leads = LeadApi::new(Arc::new(HttpTransport::new("https://api.close.com/api/v1")?));
//!
//! let first_page = leads.get_all_leads(&PageRequest::new().limit(25)).await?;
//! let acme = leads.find_leads([("name", "Acme")]).await?;
//! let created = leads.add_lead(&Lead::with_name("Wayne Enterprises")).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::client::ApiResource;
use crate::api::common::{ApiError, ApiResult, Page, PageRequest, ResponseEnvelope};
use crate::api::entity::{is_populated, Entity, ManagedField, Record, ID_FIELD};
use crate::api::request::QueryFilters;
use crate::api::resources::Contact;
use crate::api::template::EndpointTable;
use crate::api::transport::Transport;

/// Endpoint table for leads.
pub static LEAD_ENDPOINTS: EndpointTable = EndpointTable::new(&[
    ("get-leads", "/lead/"),
    ("get-lead", "/lead/[:id]/"),
    ("add-lead", "/lead/"),
    ("update-lead", "/lead/[:id]/"),
    ("delete-lead", "/lead/[:id]/"),
    ("merge-leads", "/lead/merge/"),
]);

/// Query filter carrying a search expression.
pub const QUERY_FILTER: &str = "query";

/// A lead record.
///
/// Open schema: every field received from the API is kept, and typed
/// accessors cover the fields the client reasons about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lead {
    record: Record,
}

impl Lead {
    /// An empty lead, to be filled field by field before creation.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        let mut lead = Self::new();
        lead.set_name(name);
        lead
    }

    pub fn id(&self) -> Option<&str> {
        self.record.id()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.record.set_id(id);
    }

    pub fn name(&self) -> Option<&str> {
        self.record.get_str("name")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record.set("name", name.into());
    }

    /// Name shown in the CRM UI; falls back to `name`.
    pub fn display_name(&self) -> Option<&str> {
        self.record.get_str("display_name").or_else(|| self.name())
    }

    pub fn description(&self) -> Option<&str> {
        self.record.get_str("description")
    }

    pub fn url(&self) -> Option<&str> {
        self.record.get_str("url")
    }

    pub fn status_label(&self) -> Option<&str> {
        self.record.get_str("status_label")
    }

    /// Owning organization, assigned by the server.
    pub fn organization(&self) -> Option<&Value> {
        self.record
            .get("organization")
            .filter(|value| is_populated(value))
    }

    /// Tasks attached to the lead, managed through their own endpoint.
    pub fn tasks(&self) -> Option<&Vec<Value>> {
        self.record
            .get("tasks")
            .and_then(Value::as_array)
            .filter(|tasks| !tasks.is_empty())
    }

    /// Opportunities attached to the lead, managed through their own endpoint.
    pub fn opportunities(&self) -> Option<&Vec<Value>> {
        self.record
            .get("opportunities")
            .and_then(Value::as_array)
            .filter(|opportunities| !opportunities.is_empty())
    }

    /// Contacts embedded in the lead.
    pub fn contacts(&self) -> Vec<Contact> {
        self.record
            .get("contacts")
            .and_then(Value::as_array)
            .map(|contacts| {
                contacts
                    .iter()
                    .filter_map(|c| Contact::from_value(c.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn date_created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.record.get_str("date_created"))
    }

    pub fn date_updated(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.record.get_str("date_updated"))
    }

    /// Any field, including custom ones (`custom.<name>`).
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.record.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.record.set(field, value);
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.record.remove(field)
    }
}

/// Parses the API's RFC 3339 timestamps (`2013-02-20T05:30:24.844000+00:00`).
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

static LEAD_MANAGED_FIELDS: [ManagedField<Lead>; 4] = [
    ManagedField {
        name: ID_FIELD,
        is_set: |lead| lead.record.has_value(ID_FIELD),
    },
    ManagedField {
        name: "organization",
        is_set: |lead| lead.record.has_value("organization"),
    },
    ManagedField {
        name: "tasks",
        is_set: |lead| lead.record.has_value("tasks"),
    },
    ManagedField {
        name: "opportunities",
        is_set: |lead| lead.record.has_value("opportunities"),
    },
];

impl Entity for Lead {
    const KIND: &'static str = "lead";

    fn from_record(record: Record) -> Self {
        Self { record }
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn into_record(self) -> Record {
        self.record
    }

    fn server_managed_fields() -> &'static [ManagedField<Self>] {
        &LEAD_MANAGED_FIELDS
    }
}

/// Flattens search criteria into a single `query` filter value.
///
/// Each pair becomes `field:"value"` (embedded quotes escaped), terms are
/// joined by a space, and the result is form-encoded since it travels in the
/// query string unmodified.
///
/// ```rust
/// use crm_client::api::resources::leads::flatten_query;
///
/// assert_eq!(flatten_query([("name", "Acme")]), "name%3A%22Acme%22");
/// assert_eq!(flatten_query([("a", "1"), ("b", "2")]), "a%3A%221%22+b%3A%222%22");
/// ```
pub fn flatten_query<I, K, V>(criteria: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let expression = criteria
        .into_iter()
        .map(|(field, value)| {
            format!(
                "{}:\"{}\"",
                field.as_ref(),
                value.as_ref().replace('"', "\\\"")
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    url::form_urlencoded::byte_serialize(expression.as_bytes()).collect()
}

/// Typed accessor for the lead endpoints.
#[derive(Clone)]
pub struct LeadApi {
    base: ApiResource,
}

impl LeadApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            base: ApiResource::new(transport, &LEAD_ENDPOINTS),
        }
    }

    /// The underlying resource, for endpoints without a typed wrapper.
    pub fn resource(&self) -> &ApiResource {
        &self.base
    }

    /// Lists leads with optional `_limit` / `_skip`.
    ///
    /// Any status other than 200 yields an empty list instead of an error.
    /// Use [`get_leads_page`](Self::get_leads_page) to see failures.
    pub async fn get_all_leads(&self, page: &PageRequest) -> ApiResult<Vec<Lead>> {
        self.base.fetch_list("get-leads", &page.to_filters()).await
    }

    /// Searches leads by `field → value` criteria.
    ///
    /// Shares the listing leniency of [`get_all_leads`](Self::get_all_leads).
    pub async fn find_leads<I, K, V>(&self, criteria: I) -> ApiResult<Vec<Lead>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let filters = search_filters(criteria);
        self.base.fetch_list("get-leads", &filters).await
    }

    /// Lists one page of leads, surfacing non-200 statuses as errors and
    /// exposing `has_more` / `total_results`.
    pub async fn get_leads_page(
        &self,
        page: &PageRequest,
        query: Option<&str>,
    ) -> ApiResult<Page<Lead>> {
        let mut filters = page.to_filters();
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            filters.insert(QUERY_FILTER, query);
        }
        self.base.fetch_page("get-leads", &filters).await
    }

    /// Fetches a lead; any non-2xx status is returned as
    /// [`ApiError::UnexpectedStatus`].
    pub async fn get_lead(&self, id: &str) -> ApiResult<Lead> {
        self.base.fetch_one("get-lead", id).await
    }

    /// Creates a lead.
    ///
    /// Fails with [`ApiError::InvalidNewField`] before sending when `id`,
    /// `organization`, `tasks` or `opportunities` is set.
    pub async fn add_lead(&self, lead: &Lead) -> ApiResult<Lead> {
        self.base.create("add-lead", lead).await
    }

    /// Updates a lead with every field it carries except `id`.
    pub async fn update_lead(&self, lead: &Lead) -> ApiResult<Lead> {
        self.base.update("update-lead", lead).await
    }

    pub async fn delete_lead(&self, id: &str) -> ApiResult<()> {
        self.base.remove::<Lead>("delete-lead", id).await
    }

    /// Merges `source` into `destination`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidParameter`] when either lead has no id (nothing sent)
    /// - [`ApiError::RemoteNotFound`] when the server answers anything but 200
    pub async fn merge_leads(
        &self,
        source: &Lead,
        destination: &Lead,
    ) -> ApiResult<ResponseEnvelope> {
        let (Some(source_id), Some(destination_id)) = (source.id(), destination.id()) else {
            return Err(ApiError::InvalidParameter(
                "merging requires both source and destination lead ids".to_string(),
            ));
        };

        let body = json!({
            "destination": destination_id,
            "source": source_id,
        })
        .to_string();

        let request = self.base.prepare_request("merge-leads", Some(body), None, None)?;
        let envelope = self.base.trigger_post(request).await?;

        if !envelope.is_exactly_ok() {
            return Err(ApiError::RemoteNotFound {
                status: envelope.status(),
                message: envelope.error_message(),
            });
        }

        tracing::debug!(source = source_id, destination = destination_id, "Merged leads");
        Ok(envelope)
    }
}

fn search_filters<I, K, V>(criteria: I) -> QueryFilters
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let query = flatten_query(criteria);
    let mut filters = QueryFilters::new();
    if !query.is_empty() {
        filters.insert(QUERY_FILTER, query);
    }
    filters
}
