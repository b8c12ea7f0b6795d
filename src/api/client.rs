//
//  crm-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource Base for the CRM API
//!
//! This module provides [`ApiResource`], the behavior shared by every typed
//! resource. It owns the resource's endpoint table, builds requests through
//! [`RequestBuilder`], dispatches them through the injected [`Transport`],
//! wraps the results in a [`ResponseEnvelope`] and maps failures to
//! [`ApiError`].
//!
//! ## Features
//!
//! - One dispatcher per HTTP verb (`trigger_get`, `trigger_post`, ...)
//! - Generic CRUD algorithms parameterized by endpoint names and [`Entity`]
//! - Local validation before any request is sent
//! - Error message extraction from remote error bodies
//!
//! ## Status handling
//!
//! | Operation | Success | On other statuses |
//! |-----------|---------|-------------------|
//! | `fetch_list` | exactly 200 | empty `Vec`, logged |
//! | `fetch_page` | exactly 200 | `UnexpectedStatus` |
//! | `fetch_one` / `create` / `update` | 2xx | `UnexpectedStatus` |
//! | `remove` | 200 or 204 | `UnexpectedStatus` |

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;

use crate::api::common::{
    ApiError, ApiResult, Page, ResponseEnvelope, HAS_MORE_KEY, TOTAL_RESULTS_KEY,
};
use crate::api::entity::{Entity, ID_FIELD};
use crate::api::request::{HttpMethod, QueryFilters, RequestBuilder, RequestDescriptor};
use crate::api::template::{path_params, EndpointTable, PathParams};
use crate::api::transport::Transport;

/// Extracts a user-friendly message from an error response body.
///
/// The CRM reports errors in several shapes:
/// ```json
/// {"error": "Human readable message"}
/// {"error": {"message": "Human readable message"}}
/// {"field-errors": {"name": "This field is required."}}
/// {"errors": ["Human readable message"]}
/// {"message": "Human readable message"}
/// ```
///
/// Plain-text bodies are returned as-is; an empty body yields the status'
/// canonical reason.
pub fn format_api_error(status: u16, body: &Value) -> String {
    match body {
        Value::Null => {
            return StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"));
        }
        Value::String(text) if !text.is_empty() => return text.clone(),
        _ => {}
    }

    // {"error": "..."}
    if let Some(message) = body.get("error").and_then(|e| e.as_str()) {
        if !message.is_empty() {
            return message.to_string();
        }
    }

    // {"error": {"message": "..."}}
    if let Some(message) = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return message.to_string();
    }

    // {"field-errors": {"field": "reason"}}
    if let Some(fields) = body.get("field-errors").and_then(|f| f.as_object()) {
        if !fields.is_empty() {
            return fields
                .iter()
                .map(|(field, reason)| match reason.as_str() {
                    Some(text) => format!("{field}: {text}"),
                    None => format!("{field}: {reason}"),
                })
                .collect::<Vec<_>>()
                .join("; ");
        }
    }

    // {"errors": ["..."]}
    if let Some(message) = body
        .get("errors")
        .and_then(|e| e.as_array())
        .and_then(|arr| arr.first())
        .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(|m| m.as_str())))
    {
        return message.to_string();
    }

    // {"message": "..."}
    if let Some(message) = body.get("message").and_then(|m| m.as_str()) {
        return message.to_string();
    }

    format!("HTTP {status}: {body}")
}

/// Base behavior shared by all typed resources.
///
/// Holds the injected transport and the resource's static endpoint table.
/// Cheap to clone: clones share the transport.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use crm_client::api::{ApiResource, HttpTransport};
/// use crm_client::api::template::EndpointTable;
///
/// static ENDPOINTS: EndpointTable = EndpointTable::new(&[("get-users", "/user/")]);
///
/// # async fn example() -> Result<(), crm_client::api::ApiError> {
/// let transport = Arc::new(HttpTransport::new("https://api.close.com/api/v1")?);
/// let users = ApiResource::new(transport, &ENDPOINTS);
///
/// let request = users.prepare_request("get-users", None, None, None)?;
/// let envelope = users.trigger_get(request).await?;
/// println!("HTTP {}", envelope.status());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiResource {
    transport: Arc<dyn Transport>,
    builder: RequestBuilder,
}

impl ApiResource {
    pub fn new(transport: Arc<dyn Transport>, endpoints: &'static EndpointTable) -> Self {
        Self {
            transport,
            builder: RequestBuilder::new(endpoints),
        }
    }

    /// Builds a request for one of this resource's endpoints.
    pub fn prepare_request(
        &self,
        endpoint: &str,
        body: Option<String>,
        path_params: Option<&PathParams>,
        query_filters: Option<&QueryFilters>,
    ) -> ApiResult<RequestDescriptor> {
        self.builder.build(endpoint, body, path_params, query_filters)
    }

    /// Sends `request` as a GET.
    pub async fn trigger_get(&self, request: RequestDescriptor) -> ApiResult<ResponseEnvelope> {
        self.dispatch(request.with_method(HttpMethod::Get)).await
    }

    /// Sends `request` as a POST.
    pub async fn trigger_post(&self, request: RequestDescriptor) -> ApiResult<ResponseEnvelope> {
        self.dispatch(request.with_method(HttpMethod::Post)).await
    }

    /// Sends `request` as a PUT.
    pub async fn trigger_put(&self, request: RequestDescriptor) -> ApiResult<ResponseEnvelope> {
        self.dispatch(request.with_method(HttpMethod::Put)).await
    }

    /// Sends `request` as a DELETE.
    pub async fn trigger_delete(&self, request: RequestDescriptor) -> ApiResult<ResponseEnvelope> {
        self.dispatch(request.with_method(HttpMethod::Delete)).await
    }

    async fn dispatch(&self, request: RequestDescriptor) -> ApiResult<ResponseEnvelope> {
        let raw = self.transport.execute(&request).await?;
        ResponseEnvelope::from_raw(raw)
    }

    /// Lists entities, returning an empty `Vec` on any status other than 200.
    ///
    /// Callers relying on this path detect failures through the entity count
    /// only. Use [`fetch_page`](Self::fetch_page) to have the status surfaced.
    pub async fn fetch_list<E: Entity>(
        &self,
        endpoint: &str,
        filters: &QueryFilters,
    ) -> ApiResult<Vec<E>> {
        let request = self.prepare_request(endpoint, None, None, Some(filters))?;
        let envelope = self.trigger_get(request).await?;

        if !envelope.is_exactly_ok() {
            tracing::warn!(
                endpoint,
                status = envelope.status(),
                "Listing {}s failed, returning an empty result",
                E::KIND
            );
            return Ok(Vec::new());
        }

        entities_from_data(&envelope)
    }

    /// Lists one page of entities along with its pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedStatus`] for any status other than 200.
    pub async fn fetch_page<E: Entity>(
        &self,
        endpoint: &str,
        filters: &QueryFilters,
    ) -> ApiResult<Page<E>> {
        let request = self.prepare_request(endpoint, None, None, Some(filters))?;
        let envelope = self.trigger_get(request).await?;

        if !envelope.is_exactly_ok() {
            return Err(unexpected_status(&envelope));
        }

        Ok(Page {
            items: entities_from_data(&envelope)?,
            has_more: envelope
                .meta(HAS_MORE_KEY)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            total_results: envelope.meta(TOTAL_RESULTS_KEY).and_then(Value::as_u64),
        })
    }

    /// Fetches a single entity by identifier.
    pub async fn fetch_one<E: Entity>(&self, endpoint: &str, id: &str) -> ApiResult<E> {
        let params = require_id::<E>(Some(id), "fetch")?;
        let request = self.prepare_request(endpoint, None, Some(&params), None)?;
        let envelope = self.trigger_get(request).await?;
        entity_from_envelope(envelope)
    }

    /// Creates `entity` remotely and returns the stored version.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidNewField`] without sending anything when a
    /// server-managed field is set.
    pub async fn create<E: Entity>(&self, endpoint: &str, entity: &E) -> ApiResult<E> {
        if let Some(field) = entity.first_managed_field() {
            return Err(ApiError::InvalidNewField(field.to_string()));
        }

        let body = entity.record().to_json()?;
        let request = self.prepare_request(endpoint, Some(body), None, None)?;
        let envelope = self.trigger_post(request).await?;
        entity_from_envelope(envelope)
    }

    /// Sends every field of `entity` except `id` to the entity's URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] without sending anything when the
    /// entity has no identifier.
    pub async fn update<E: Entity>(&self, endpoint: &str, entity: &E) -> ApiResult<E> {
        let params = require_id::<E>(entity.id(), "update")?;
        let body = entity.record().without_id().to_json()?;
        let request = self.prepare_request(endpoint, Some(body), Some(&params), None)?;
        let envelope = self.trigger_put(request).await?;
        entity_from_envelope(envelope)
    }

    /// Deletes the entity with identifier `id`; the response body is discarded.
    pub async fn remove<E: Entity>(&self, endpoint: &str, id: &str) -> ApiResult<()> {
        let params = require_id::<E>(Some(id), "delete")?;
        let request = self.prepare_request(endpoint, None, Some(&params), None)?;
        let envelope = self.trigger_delete(request).await?;

        match envelope.status() {
            200 | 204 => Ok(()),
            _ => Err(unexpected_status(&envelope)),
        }
    }
}

/// Path parameters for an identifier-addressed endpoint.
///
/// The id is substituted into the URL as-is, so it must form a single path
/// segment: no separators, no `.`/`..`, no whitespace.
fn require_id<E: Entity>(id: Option<&str>, action: &str) -> ApiResult<PathParams> {
    let id = match id.filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => {
            return Err(ApiError::InvalidParameter(format!(
                "cannot {action} a {} without an id",
                E::KIND
            )))
        }
    };

    if !is_path_segment(id) {
        return Err(ApiError::InvalidParameter(format!(
            "invalid {} id '{id}'",
            E::KIND
        )));
    }
    Ok(path_params([(ID_FIELD, id)]))
}

fn is_path_segment(value: &str) -> bool {
    value != "."
        && value != ".."
        && !value.chars().any(|c| {
            matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
        })
}

/// Error for a status the calling operation does not interpret.
pub(crate) fn unexpected_status(envelope: &ResponseEnvelope) -> ApiError {
    ApiError::UnexpectedStatus {
        status: envelope.status(),
        message: envelope.error_message(),
    }
}

/// Maps a single-entity reply.
///
/// A success status with an empty body (e.g. 201 or 204 without content)
/// carries no entity and is reported as [`ApiError::Deserialization`].
fn entity_from_envelope<E: Entity>(envelope: ResponseEnvelope) -> ApiResult<E> {
    if !envelope.is_success() {
        return Err(unexpected_status(&envelope));
    }
    if envelope.raw().is_null() {
        return Err(ApiError::Deserialization(format!(
            "{} response (HTTP {}) has an empty body",
            E::KIND,
            envelope.status()
        )));
    }
    E::from_value(envelope.payload().clone())
}

fn entities_from_data<E: Entity>(envelope: &ResponseEnvelope) -> ApiResult<Vec<E>> {
    let items = envelope
        .data()
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ApiError::Deserialization(format!(
                "{} list response has no 'data' array",
                E::KIND
            ))
        })?;

    items.iter().cloned().map(E::from_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::entity::{ManagedField, Record};
    use crate::api::testing::{network_error, StubTransport};
    use serde_json::json;

    static ENDPOINTS: EndpointTable = EndpointTable::new(&[
        ("list", "/widget/"),
        ("get", "/widget/[:id]/"),
        ("add", "/widget/"),
        ("update", "/widget/[:id]/"),
        ("delete", "/widget/[:id]/"),
    ]);

    #[derive(Debug)]
    struct Widget(Record);

    fn owner_is_set(widget: &Widget) -> bool {
        widget.0.is_set("owner")
    }

    fn id_is_set(widget: &Widget) -> bool {
        widget.id().is_some()
    }

    static WIDGET_MANAGED: [ManagedField<Widget>; 2] = [
        ManagedField {
            name: "id",
            is_set: id_is_set,
        },
        ManagedField {
            name: "owner",
            is_set: owner_is_set,
        },
    ];

    impl Entity for Widget {
        const KIND: &'static str = "widget";

        fn from_record(record: Record) -> Self {
            Self(record)
        }

        fn record(&self) -> &Record {
            &self.0
        }

        fn into_record(self) -> Record {
            self.0
        }

        fn server_managed_fields() -> &'static [ManagedField<Self>] {
            &WIDGET_MANAGED
        }
    }

    fn widget(value: Value) -> Widget {
        Widget::from_value(value).unwrap()
    }

    #[test]
    fn test_format_error_shapes() {
        assert_eq!(format_api_error(400, &json!({"error": "Bad query"})), "Bad query");
        assert_eq!(
            format_api_error(400, &json!({"error": {"message": "Nested"}})),
            "Nested"
        );
        assert_eq!(
            format_api_error(400, &json!({"field-errors": {"name": "Required."}})),
            "name: Required."
        );
        assert_eq!(format_api_error(400, &json!({"errors": ["First"]})), "First");
        assert_eq!(format_api_error(404, &Value::Null), "Not Found");
        assert_eq!(format_api_error(500, &json!({"odd": 1})), r#"HTTP 500: {"odd":1}"#);
    }

    #[tokio::test]
    async fn test_trigger_methods_stamp_verb() {
        let stub = StubTransport::new()
            .respond(200, json!({}))
            .respond(200, json!({}))
            .respond(200, json!({}))
            .respond(204, Value::Null);
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        let req = || resource.prepare_request("list", None, None, None).unwrap();
        resource.trigger_get(req()).await.unwrap();
        resource.trigger_post(req()).await.unwrap();
        resource.trigger_put(req()).await.unwrap();
        let envelope = resource.trigger_delete(req()).await.unwrap();
        assert_eq!(envelope.status(), 204);

        let methods: Vec<_> = stub.requests().iter().map(|r| r.method()).collect();
        assert_eq!(
            methods,
            vec![
                HttpMethod::Get,
                HttpMethod::Post,
                HttpMethod::Put,
                HttpMethod::Delete
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_list_maps_data_in_order() {
        let stub = StubTransport::new().respond(
            200,
            json!({"has_more": false, "data": [{"id": "w1"}, {"id": "w2"}]}),
        );
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        let widgets: Vec<Widget> = resource
            .fetch_list("list", &QueryFilters::new())
            .await
            .unwrap();
        let ids: Vec<_> = widgets.iter().filter_map(|w| w.id()).collect();
        assert_eq!(ids, vec!["w1", "w2"]);
    }

    #[tokio::test]
    async fn test_fetch_list_swallows_non_200() {
        let stub = StubTransport::new()
            .respond(500, json!({"error": "boom"}))
            .respond(201, json!({"data": [{"id": "w1"}]}));
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        let failed: Vec<Widget> = resource
            .fetch_list("list", &QueryFilters::new())
            .await
            .unwrap();
        assert!(failed.is_empty());

        let not_exactly_ok: Vec<Widget> = resource
            .fetch_list("list", &QueryFilters::new())
            .await
            .unwrap();
        assert!(not_exactly_ok.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_list_propagates_transport_failure() {
        let stub = StubTransport::new().fail(network_error());
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        let err = resource
            .fetch_list::<Widget>("list", &QueryFilters::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(!err.is_local());
        assert_eq!(stub.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_page_surfaces_status_and_metadata() {
        let stub = StubTransport::new()
            .respond(
                200,
                json!({"has_more": true, "total_results": 9, "data": [{"id": "w1"}]}),
            )
            .respond(503, json!({"error": "Maintenance"}));
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        let page: Page<Widget> = resource
            .fetch_page("list", &QueryFilters::new())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.has_more);
        assert_eq!(page.total_results, Some(9));

        let err = resource
            .fetch_page::<Widget>("list", &QueryFilters::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::UnexpectedStatus { status: 503, ref message } if message == "Maintenance"
        ));
    }

    #[tokio::test]
    async fn test_fetch_one_passes_status_through() {
        let stub = StubTransport::new()
            .respond(200, json!({"id": "w1", "color": "red"}))
            .respond(404, json!({"error": "Empty query"}));
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        let found: Widget = resource.fetch_one("get", "w1").await.unwrap();
        assert_eq!(found.record().get_str("color"), Some("red"));
        assert_eq!(stub.requests()[0].url(), "/widget/w1/");

        let err = resource.fetch_one::<Widget>("get", "w2").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_create_rejects_managed_fields_before_dispatch() {
        let stub = StubTransport::new();
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        let err = resource
            .create("add", &widget(json!({"name": "w", "owner": "u1"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidNewField(ref f) if f == "owner"));
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_ignores_null_managed_fields() {
        let stub = StubTransport::new().respond(200, json!({"id": "w9", "name": "w"}));
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        let created = resource
            .create("add", &widget(json!({"id": null, "name": "w"})))
            .await
            .unwrap();
        assert_eq!(created.id(), Some("w9"));
        assert_eq!(stub.requests()[0].method(), HttpMethod::Post);
    }

    #[tokio::test]
    async fn test_update_strips_id_from_payload() {
        let stub = StubTransport::new().respond(200, json!({"id": "w1", "name": "new"}));
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        resource
            .update("update", &widget(json!({"id": "w1", "name": "new"})))
            .await
            .unwrap();

        let request = &stub.requests()[0];
        assert_eq!(request.method(), HttpMethod::Put);
        assert_eq!(request.url(), "/widget/w1/");
        assert_eq!(stub.last_body(), Some(json!({"name": "new"})));
    }

    #[tokio::test]
    async fn test_update_without_id_sends_nothing() {
        let stub = StubTransport::new();
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        let err = resource
            .update("update", &widget(json!({"name": "new"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_remove_accepts_200_and_204_only() {
        let stub = StubTransport::new()
            .respond(204, Value::Null)
            .respond(200, json!({}))
            .respond(202, Value::Null);
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        resource.remove::<Widget>("delete", "w1").await.unwrap();
        resource.remove::<Widget>("delete", "w1").await.unwrap();
        let err = resource.remove::<Widget>("delete", "w1").await.unwrap_err();
        assert_eq!(err.status(), Some(202));
    }

    #[tokio::test]
    async fn test_empty_success_body_is_reported() {
        let stub = StubTransport::new()
            .respond(201, Value::Null)
            .respond(204, Value::Null);
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        let err = resource
            .create("add", &widget(json!({"name": "new"})))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to decode response: widget response (HTTP 201) has an empty body"
        );

        let err = resource
            .update("update", &widget(json!({"id": "w1", "name": "new"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(ref msg) if msg.contains("HTTP 204")));
    }

    #[tokio::test]
    async fn test_ids_must_be_a_single_path_segment() {
        let stub = StubTransport::new();
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        for id in ["../contact/cont_1", "w1?x=1", "w1#top", "..", " w1", "w1%2F"] {
            let err = resource.remove::<Widget>("delete", id).await.unwrap_err();
            assert!(
                matches!(err, ApiError::InvalidParameter(ref msg) if msg.contains("invalid widget id")),
                "{id}: {err:?}"
            );
            let err = resource.fetch_one::<Widget>("get", id).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidParameter(_)), "{id}: {err:?}");
        }

        let err = resource
            .update("update", &widget(json!({"id": "a/b", "name": "x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_endpoint_is_configuration_error() {
        let stub = StubTransport::new();
        let resource = ApiResource::new(stub.clone(), &ENDPOINTS);

        let err = resource
            .fetch_list::<Widget>("missing", &QueryFilters::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UrlTemplateNotFound(_)));
        assert!(stub.requests().is_empty());
    }
}
