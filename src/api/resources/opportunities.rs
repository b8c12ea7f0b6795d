//
//  crm-client
//  api/resources/opportunities.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Opportunity resource: potential deals tracked against a lead.
//!
//! Monetary values are integers in the smallest currency unit (cents).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::client::ApiResource;
use crate::api::common::{ApiResult, Page, PageRequest};
use crate::api::entity::{Entity, ManagedField, Record};
use crate::api::request::QueryFilters;
use crate::api::resources::leads::parse_timestamp;
use crate::api::template::EndpointTable;
use crate::api::transport::Transport;

pub static OPPORTUNITY_ENDPOINTS: EndpointTable = EndpointTable::new(&[
    ("get-opportunities", "/opportunity/"),
    ("get-opportunity", "/opportunity/[:id]/"),
    ("add-opportunity", "/opportunity/"),
    ("update-opportunity", "/opportunity/[:id]/"),
    ("delete-opportunity", "/opportunity/[:id]/"),
]);

/// Filter restricting opportunity listings to one lead.
pub const LEAD_ID_FILTER: &str = "lead_id";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opportunity {
    record: Record,
}

impl Opportunity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_lead(lead_id: impl Into<String>) -> Self {
        let mut opportunity = Self::new();
        opportunity.set("lead_id", lead_id.into());
        opportunity
    }

    pub fn id(&self) -> Option<&str> {
        self.record.id()
    }

    pub fn lead_id(&self) -> Option<&str> {
        self.record.get_str("lead_id")
    }

    pub fn status_label(&self) -> Option<&str> {
        self.record.get_str("status_label")
    }

    pub fn note(&self) -> Option<&str> {
        self.record.get_str("note")
    }

    /// Value in cents.
    pub fn value(&self) -> Option<i64> {
        self.record.get("value").and_then(Value::as_i64)
    }

    pub fn value_currency(&self) -> Option<&str> {
        self.record.get_str("value_currency")
    }

    /// Win probability, 0 to 100.
    pub fn confidence(&self) -> Option<u8> {
        self.record
            .get("confidence")
            .and_then(Value::as_u64)
            .and_then(|c| u8::try_from(c).ok())
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.record.get_str("organization_id").filter(|s| !s.is_empty())
    }

    pub fn date_created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.record.get_str("date_created"))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.record.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.record.set(field, value);
    }
}

static OPPORTUNITY_MANAGED_FIELDS: [ManagedField<Opportunity>; 3] = [
    ManagedField {
        name: "id",
        is_set: |opportunity| opportunity.record.has_value("id"),
    },
    ManagedField {
        name: "organization_id",
        is_set: |opportunity| opportunity.record.has_value("organization_id"),
    },
    ManagedField {
        name: "date_created",
        is_set: |opportunity| opportunity.record.has_value("date_created"),
    },
];

impl Entity for Opportunity {
    const KIND: &'static str = "opportunity";

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
        &OPPORTUNITY_MANAGED_FIELDS
    }
}

#[derive(Clone)]
pub struct OpportunityApi {
    base: ApiResource,
}

impl OpportunityApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            base: ApiResource::new(transport, &OPPORTUNITY_ENDPOINTS),
        }
    }

    /// Lists opportunities, optionally only those of `lead_id`.
    ///
    /// Non-200 statuses yield an empty list.
    pub async fn get_all_opportunities(
        &self,
        page: &PageRequest,
        lead_id: Option<&str>,
    ) -> ApiResult<Vec<Opportunity>> {
        self.base
            .fetch_list("get-opportunities", &listing_filters(page, lead_id))
            .await
    }

    pub async fn get_opportunities_page(
        &self,
        page: &PageRequest,
        lead_id: Option<&str>,
    ) -> ApiResult<Page<Opportunity>> {
        self.base
            .fetch_page("get-opportunities", &listing_filters(page, lead_id))
            .await
    }

    pub async fn get_opportunity(&self, id: &str) -> ApiResult<Opportunity> {
        self.base.fetch_one("get-opportunity", id).await
    }

    pub async fn add_opportunity(&self, opportunity: &Opportunity) -> ApiResult<Opportunity> {
        self.base.create("add-opportunity", opportunity).await
    }

    pub async fn update_opportunity(&self, opportunity: &Opportunity) -> ApiResult<Opportunity> {
        self.base.update("update-opportunity", opportunity).await
    }

    pub async fn delete_opportunity(&self, id: &str) -> ApiResult<()> {
        self.base
            .remove::<Opportunity>("delete-opportunity", id)
            .await
    }
}

fn listing_filters(page: &PageRequest, lead_id: Option<&str>) -> QueryFilters {
    let mut filters = page.to_filters();
    if let Some(lead_id) = lead_id.filter(|id| !id.is_empty()) {
        filters.insert(LEAD_ID_FILTER, lead_id);
    }
    filters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ApiError;
    use crate::api::testing::StubTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_listing_filters_by_lead() {
        let stub = StubTransport::new().respond(
            200,
            json!({"data": [{"id": "oppo_1", "value": 150000, "confidence": 75}]}),
        );
        let api = OpportunityApi::new(stub.clone());

        let found = api
            .get_all_opportunities(&PageRequest::new().limit(10), Some("lead_1"))
            .await
            .unwrap();
        assert_eq!(found[0].value(), Some(150000));
        assert_eq!(found[0].confidence(), Some(75));
        assert_eq!(
            stub.requests()[0].url(),
            "/opportunity/?_limit=10&lead_id=lead_1"
        );
    }

    #[tokio::test]
    async fn test_add_opportunity_rejects_organization() {
        let stub = StubTransport::new();
        let api = OpportunityApi::new(stub.clone());

        let mut opportunity = Opportunity::for_lead("lead_1");
        opportunity.set("organization_id", "orga_1");

        let err = api.add_opportunity(&opportunity).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidNewField(ref f) if f == "organization_id"));
        assert!(stub.requests().is_empty());

        let mut numbered = Opportunity::for_lead("lead_1");
        numbered.set("id", 99);
        let err = api.add_opportunity(&numbered).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidNewField(ref f) if f == "id"));
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_opportunity_unexpected_status() {
        let stub = StubTransport::new().respond(404, json!({"error": "Not found"}));
        let api = OpportunityApi::new(stub.clone());

        let err = api.delete_opportunity("oppo_1").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::UnexpectedStatus { status: 404, ref message } if message == "Not found"
        ));
    }
}
