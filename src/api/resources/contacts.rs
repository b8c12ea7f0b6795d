//
//  crm-client
//  api/resources/contacts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Contact resource: the people attached to a lead.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::client::ApiResource;
use crate::api::common::{ApiResult, Page, PageRequest};
use crate::api::entity::{Entity, ManagedField, Record};
use crate::api::resources::leads::parse_timestamp;
use crate::api::template::EndpointTable;
use crate::api::transport::Transport;

/// Endpoint table for contacts.
pub static CONTACT_ENDPOINTS: EndpointTable = EndpointTable::new(&[
    ("get-contacts", "/contact/"),
    ("get-contact", "/contact/[:id]/"),
    ("add-contact", "/contact/"),
    ("update-contact", "/contact/[:id]/"),
    ("delete-contact", "/contact/[:id]/"),
]);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contact {
    record: Record,
}

impl Contact {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new contact belonging to the lead `lead_id`.
    pub fn for_lead(lead_id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut contact = Self::new();
        contact.set("lead_id", lead_id.into());
        contact.set("name", name.into());
        contact
    }

    pub fn id(&self) -> Option<&str> {
        self.record.id()
    }

    pub fn name(&self) -> Option<&str> {
        self.record.get_str("name")
    }

    pub fn title(&self) -> Option<&str> {
        self.record.get_str("title")
    }

    pub fn lead_id(&self) -> Option<&str> {
        self.record.get_str("lead_id")
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.record.get_str("organization_id").filter(|s| !s.is_empty())
    }

    /// Email addresses, in the order the API lists them.
    pub fn emails(&self) -> Vec<&str> {
        nested_strings(self.record.get("emails"), "email")
    }

    pub fn phones(&self) -> Vec<&str> {
        nested_strings(self.record.get("phones"), "phone")
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

/// Collects `key` from each object of a JSON array (`[{"email": ...}, ...]`).
fn nested_strings<'a>(list: Option<&'a Value>, key: &str) -> Vec<&'a str> {
    list.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get(key).and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

static CONTACT_MANAGED_FIELDS: [ManagedField<Contact>; 3] = [
    ManagedField {
        name: "id",
        is_set: |contact| contact.record.has_value("id"),
    },
    ManagedField {
        name: "organization_id",
        is_set: |contact| contact.record.has_value("organization_id"),
    },
    ManagedField {
        name: "date_created",
        is_set: |contact| contact.record.has_value("date_created"),
    },
];

impl Entity for Contact {
    const KIND: &'static str = "contact";

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
        &CONTACT_MANAGED_FIELDS
    }
}

/// Typed accessor for the contact endpoints.
#[derive(Clone)]
pub struct ContactApi {
    base: ApiResource,
}

impl ContactApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            base: ApiResource::new(transport, &CONTACT_ENDPOINTS),
        }
    }

    /// Lists contacts; non-200 statuses yield an empty list.
    pub async fn get_all_contacts(&self, page: &PageRequest) -> ApiResult<Vec<Contact>> {
        self.base.fetch_list("get-contacts", &page.to_filters()).await
    }

    pub async fn get_contacts_page(&self, page: &PageRequest) -> ApiResult<Page<Contact>> {
        self.base.fetch_page("get-contacts", &page.to_filters()).await
    }

    pub async fn get_contact(&self, id: &str) -> ApiResult<Contact> {
        self.base.fetch_one("get-contact", id).await
    }

    pub async fn add_contact(&self, contact: &Contact) -> ApiResult<Contact> {
        self.base.create("add-contact", contact).await
    }

    pub async fn update_contact(&self, contact: &Contact) -> ApiResult<Contact> {
        self.base.update("update-contact", contact).await
    }

    pub async fn delete_contact(&self, id: &str) -> ApiResult<()> {
        self.base.remove::<Contact>("delete-contact", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ApiError;
    use crate::api::request::HttpMethod;
    use crate::api::testing::StubTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_add_contact_rejects_server_fields() {
        let stub = StubTransport::new();
        let api = ContactApi::new(stub.clone());

        let mut contact = Contact::for_lead("lead_1", "Ada");
        contact.set("date_created", "2024-01-01T00:00:00+00:00");

        let err = api.add_contact(&contact).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidNewField(ref f) if f == "date_created"));
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_add_contact_rejects_non_string_server_fields() {
        for (field, value) in [("id", json!(7)), ("organization_id", json!({"id": "orga_1"}))] {
            let stub = StubTransport::new();
            let api = ContactApi::new(stub.clone());

            let mut contact = Contact::for_lead("lead_1", "Ada");
            contact.set(field, value);

            let err = api.add_contact(&contact).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidNewField(ref f) if f == field));
            assert!(stub.requests().is_empty());
        }
    }

    #[tokio::test]
    async fn test_add_contact_posts_record() {
        let stub = StubTransport::new().respond(
            200,
            json!({
                "id": "cont_1",
                "lead_id": "lead_1",
                "name": "Ada",
                "emails": [{"type": "office", "email": "ada@example.com"}]
            }),
        );
        let api = ContactApi::new(stub.clone());

        let created = api
            .add_contact(&Contact::for_lead("lead_1", "Ada"))
            .await
            .unwrap();
        assert_eq!(created.id(), Some("cont_1"));
        assert_eq!(created.emails(), vec!["ada@example.com"]);

        let request = &stub.requests()[0];
        assert_eq!(request.method(), HttpMethod::Post);
        assert_eq!(request.url(), "/contact/");
        assert_eq!(
            stub.last_body(),
            Some(json!({"lead_id": "lead_1", "name": "Ada"}))
        );
    }

    #[tokio::test]
    async fn test_get_contacts_page_with_paging() {
        let stub = StubTransport::new().respond(
            200,
            json!({"has_more": true, "data": [{"id": "cont_1"}, {"id": "cont_2"}]}),
        );
        let api = ContactApi::new(stub.clone());

        let page = api
            .get_contacts_page(&PageRequest::new().limit(2).skip(4))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);
        assert_eq!(stub.requests()[0].url(), "/contact/?_limit=2&_skip=4");
    }
}
