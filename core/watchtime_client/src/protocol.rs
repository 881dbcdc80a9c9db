//! Wire shapes exchanged with the storage worker.
//!
//! A request is a JSON object tagged by `operation`; each variant only carries
//! the fields its operation needs. The worker answers with the `{ok, data, error}`
//! envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// Untyped record as stored by the worker.
pub type Record = Map<String, Value>;

/// Scalar accepted as a filter/update key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for Primitive {
    fn from(v: bool) -> Self {
        Primitive::Bool(v)
    }
}

impl From<i64> for Primitive {
    fn from(v: i64) -> Self {
        Primitive::Int(v)
    }
}

impl From<f64> for Primitive {
    fn from(v: f64) -> Self {
        Primitive::Float(v)
    }
}

impl From<&str> for Primitive {
    fn from(v: &str) -> Self {
        Primitive::Text(v.to_string())
    }
}

impl From<String> for Primitive {
    fn from(v: String) -> Self {
        Primitive::Text(v)
    }
}

impl TryFrom<Value> for Primitive {
    type Error = ClientError;

    fn try_from(v: Value) -> Result<Self> {
        match v {
            Value::Bool(b) => Ok(Primitive::Bool(b)),
            Value::String(s) => Ok(Primitive::Text(s)),
            Value::Number(n) => n
                .as_i64()
                .map(Primitive::Int)
                .or_else(|| n.as_f64().map(Primitive::Float))
                .ok_or_else(|| ClientError::InvalidInput(format!("unsupported number {n}"))),
            other => Err(ClientError::InvalidInput(format!(
                "expected bool, number or string, got {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum Request {
    SelectById {
        table: String,
        index: i64,
    },
    SelectAll {
        table: String,
    },
    Filter {
        table: String,
        property: String,
        value: Primitive,
    },
    Insert {
        table: String,
        records: Vec<Record>,
    },
    #[serde(rename_all = "camelCase")]
    UpdateByProperty {
        table: String,
        property: String,
        value: Primitive,
        new_records: Record,
    },
    DeleteById {
        table: String,
        index: i64,
    },
    ResetTable {
        table: String,
    },
    /// Ask the worker to move the active page elsewhere.
    Redirect {
        page: String,
    },
}

impl Request {
    pub fn operation(&self) -> &'static str {
        match self {
            Request::SelectById { .. } => "selectById",
            Request::SelectAll { .. } => "selectAll",
            Request::Filter { .. } => "filter",
            Request::Insert { .. } => "insert",
            Request::UpdateByProperty { .. } => "updateByProperty",
            Request::DeleteById { .. } => "deleteById",
            Request::ResetTable { .. } => "resetTable",
            Request::Redirect { .. } => "redirect",
        }
    }

    pub fn table(&self) -> Option<&str> {
        match self {
            Request::SelectById { table, .. }
            | Request::SelectAll { table }
            | Request::Filter { table, .. }
            | Request::Insert { table, .. }
            | Request::UpdateByProperty { table, .. }
            | Request::DeleteById { table, .. }
            | Request::ResetTable { table } => Some(table),
            Request::Redirect { .. } => None,
        }
    }
}

/// Reply envelope. `data` is absent for operations without a payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkerReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkerReply {
    pub fn ok(data: Value) -> Self {
        WorkerReply {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: impl Into<String>) -> Self {
        WorkerReply {
            ok: false,
            data: None,
            error: Some(code.into()),
        }
    }

    /// Unwraps the envelope for `request`. `ok:false` is a worker error for
    /// every operation; an update reply also fails when its payload carries a
    /// set `error` key. Other payloads come back unchanged.
    pub fn into_payload_for(self, request: &Request) -> Result<Value> {
        if !self.ok {
            return Err(ClientError::Worker(
                self.error.unwrap_or_else(|| "not_ok".to_string()),
            ));
        }
        let data = self.data.unwrap_or(Value::Null);
        if !matches!(request, Request::UpdateByProperty { .. }) {
            return Ok(data);
        }
        if let Some(flag) = data.as_object().and_then(|o| o.get("error")) {
            match flag {
                Value::Null | Value::Bool(false) => {}
                Value::String(s) => return Err(ClientError::Worker(s.clone())),
                other => return Err(ClientError::Worker(other.to_string())),
            }
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_request_uses_camel_case_fields() {
        let mut new_records = Record::new();
        new_records.insert("active".to_string(), json!(false));
        let req = Request::UpdateByProperty {
            table: "watch-mode".to_string(),
            property: "name".to_string(),
            value: "focus".into(),
            new_records,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "operation": "updateByProperty",
                "table": "watch-mode",
                "property": "name",
                "value": "focus",
                "newRecords": {"active": false}
            })
        );
    }

    #[test]
    fn filter_request_carries_primitive_value() {
        let req = Request::Filter {
            table: "watch-mode".to_string(),
            property: "active".to_string(),
            value: true.into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "operation": "filter",
                "table": "watch-mode",
                "property": "active",
                "value": true
            })
        );
        assert_eq!(req.operation(), "filter");
        assert_eq!(req.table(), Some("watch-mode"));
    }

    #[test]
    fn request_without_required_field_is_rejected() {
        let parsed = serde_json::from_value::<Request>(json!({
            "operation": "filter",
            "table": "watch-time"
        }));
        assert!(parsed.is_err());
    }

    fn update_request() -> Request {
        Request::UpdateByProperty {
            table: "watch-mode".to_string(),
            property: "name".to_string(),
            value: "focus".into(),
            new_records: Record::new(),
        }
    }

    fn select_request() -> Request {
        Request::SelectById {
            table: "videos".to_string(),
            index: 3,
        }
    }

    #[test]
    fn reply_not_ok_maps_to_worker_error() {
        let reply: WorkerReply =
            serde_json::from_value(json!({"ok": false, "error": "no_such_table"})).unwrap();
        assert_eq!(
            reply.clone().into_payload_for(&select_request()),
            Err(ClientError::Worker("no_such_table".to_string()))
        );
        assert_eq!(
            reply.into_payload_for(&update_request()),
            Err(ClientError::Worker("no_such_table".to_string()))
        );
    }

    #[test]
    fn update_reply_with_error_flag_maps_to_worker_error() {
        let reply = WorkerReply::ok(json!({"error": "update failed", "updated": 0}));
        assert_eq!(
            reply.into_payload_for(&update_request()),
            Err(ClientError::Worker("update failed".to_string()))
        );

        let reply = WorkerReply::ok(json!({"error": true}));
        assert_eq!(
            reply.into_payload_for(&update_request()),
            Err(ClientError::Worker("true".to_string()))
        );
    }

    #[test]
    fn error_field_in_other_replies_is_plain_data() {
        let record = json!({"id": 3, "error": "video unavailable", "title": "x"});
        let reply = WorkerReply::ok(record.clone());
        assert_eq!(reply.into_payload_for(&select_request()), Ok(record));
    }

    #[test]
    fn reply_with_cleared_error_flag_is_success() {
        let reply = WorkerReply::ok(json!({"error": null, "updated": 1}));
        assert_eq!(
            reply.into_payload_for(&update_request()),
            Ok(json!({"error": null, "updated": 1}))
        );

        let reply: WorkerReply = serde_json::from_value(json!({"ok": true})).unwrap();
        assert_eq!(reply.into_payload_for(&update_request()), Ok(Value::Null));
    }

    #[test]
    fn primitive_from_json_value() {
        assert_eq!(Primitive::try_from(json!(3)), Ok(Primitive::Int(3)));
        assert_eq!(Primitive::try_from(json!(1.5)), Ok(Primitive::Float(1.5)));
        assert_eq!(Primitive::try_from(json!("x")), Ok(Primitive::Text("x".to_string())));
        assert!(Primitive::try_from(json!([1])).is_err());
        assert!(Primitive::try_from(Value::Null).is_err());
    }
}
