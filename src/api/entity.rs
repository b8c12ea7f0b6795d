//
//  crm-client
//  api/entity.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Open-schema entity records.
//!
//! CRM objects have an open schema: custom fields come and go per
//! organization. A [`Record`] keeps every field it was built from, in wire
//! order, so that a read-modify-write round trip never drops data. Typed
//! resources ([`Lead`](crate::api::resources::Lead), ...) wrap a record and
//! expose accessors for the fields they know about.
//!
//! # Example
//!
//! ```rust
//! use crm_client::api::entity::Record;
//! use serde_json::json;
//!
//! let mut record = Record::from_value(json!({"id": "lead_1", "custom.tier": "gold"})).unwrap();
//! assert_eq!(record.id(), Some("lead_1"));
//!
//! record.set("name", "Acme");
//! assert_eq!(record.get_str("name"), Some("Acme"));
//! assert_eq!(record.get_str("custom.tier"), Some("gold"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::common::{ApiError, ApiResult};

/// Name of the identifier field shared by every entity.
pub const ID_FIELD: &str = "id";

/// A mapping from field name to JSON value, with a distinguished `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Deserialization`] when `value` is not an object.
    pub fn from_value(value: Value) -> ApiResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ApiError::Deserialization(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// The identifier, when present and a non-empty string.
    pub fn id(&self) -> Option<&str> {
        self.get_str(ID_FIELD).filter(|id| !id.is_empty())
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.set(ID_FIELD, id.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Returns `true` when `field` exists and is not `null`.
    ///
    /// A field explicitly set to `null` counts as absent.
    pub fn is_set(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.is_null())
    }

    /// Returns `true` when `field` holds a value of any JSON kind.
    ///
    /// `null`, `""`, `[]` and `{}` count as absent; numbers and booleans
    /// always count as present.
    pub fn has_value(&self, field: &str) -> bool {
        self.get(field).is_some_and(is_populated)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.shift_remove(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A copy of the record without its identifier, as sent on update.
    pub fn without_id(&self) -> Record {
        let mut copy = self.clone();
        copy.remove(ID_FIELD);
        copy
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Serializes the record to the JSON wire format.
    pub fn to_json(&self) -> ApiResult<String> {
        serde_json::to_string(&self.fields).map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// A field the server assigns itself, checked through a presence test.
pub struct ManagedField<E> {
    /// Wire name of the field.
    pub name: &'static str,
    /// Returns `true` when the field is set on the entity.
    pub is_set: fn(&E) -> bool,
}

/// A typed view over a [`Record`].
///
/// Each resource type names its server-managed fields explicitly; they are
/// rejected before a create request is sent.
pub trait Entity: Sized + Send + 'static {
    /// Human-readable resource name used in messages ("lead", "contact").
    const KIND: &'static str;

    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn into_record(self) -> Record;

    /// Fields the caller must not set on a record about to be created.
    fn server_managed_fields() -> &'static [ManagedField<Self>];

    fn id(&self) -> Option<&str> {
        self.record().id()
    }

    /// Maps a raw JSON object into the entity.
    fn from_value(value: Value) -> ApiResult<Self> {
        Record::from_value(value).map(Self::from_record)
    }

    /// Returns the first server-managed field set on this entity, if any.
    fn first_managed_field(&self) -> Option<&'static str> {
        Self::server_managed_fields()
            .iter()
            .find(|field| (field.is_set)(self))
            .map(|field| field.name)
    }
}

/// `false` for `null` and for empty strings, arrays and objects.
pub(crate) fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "id": "lead_1",
            "display_name": "Acme",
            "custom.cf_industry": "Retail",
            "addresses": [{"city": "Oslo"}]
        });
        let record = Record::from_value(raw.clone()).unwrap();
        assert_eq!(record.to_value(), raw);
    }

    #[test]
    fn test_field_order_is_preserved() {
        let record = Record::from_value(json!({"z": 1, "a": 2, "m": 3})).unwrap();
        let names: Vec<_> = record.fields().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(record.to_json().unwrap(), r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn test_null_and_empty_id_are_absent() {
        let nulled = Record::from_value(json!({"id": null})).unwrap();
        assert_eq!(nulled.id(), None);
        assert!(!nulled.is_set("id"));

        let empty = Record::from_value(json!({"id": ""})).unwrap();
        assert_eq!(empty.id(), None);
    }

    #[test]
    fn test_has_value_ignores_kind() {
        let record = Record::from_value(json!({
            "id": 42,
            "flag": false,
            "tasks": "task_1",
            "org": {"id": "orga_1"},
            "blank": "",
            "none": [],
            "nothing": {},
            "nulled": null
        }))
        .unwrap();

        assert_eq!(record.id(), None);
        for field in ["id", "flag", "tasks", "org"] {
            assert!(record.has_value(field), "{field} should be present");
        }
        for field in ["blank", "none", "nothing", "nulled", "missing"] {
            assert!(!record.has_value(field), "{field} should be absent");
        }
    }

    #[test]
    fn test_without_id() {
        let record = Record::from_value(json!({"id": "x", "name": "Acme"})).unwrap();
        let stripped = record.without_id();
        assert_eq!(stripped.to_value(), json!({"name": "Acme"}));
        assert_eq!(record.id(), Some("x"));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = Record::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(msg) if msg.contains("an array")));
    }
}
