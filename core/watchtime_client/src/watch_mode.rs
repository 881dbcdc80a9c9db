use serde_json::Value;
use tracing::error;

use crate::client::{payload_records, single_match, WorkerClient};
use crate::config::Schema;
use crate::error::{ClientError, Result};
use crate::protocol::Record;

/// The configuration entry currently flagged active.
#[derive(Clone, Debug, PartialEq)]
pub struct WatchModeRecord {
    pub active: bool,
    pub fields: Record,
}

impl WatchModeRecord {
    pub fn from_value(value: Value, schema: &Schema) -> Result<Self> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(ClientError::InvalidInput(format!(
                    "watch-mode record is not an object: {other}"
                )))
            }
        };
        let active = fields
            .get(&schema.active_key)
            .and_then(Value::as_bool)
            .ok_or_else(|| {
                ClientError::InvalidInput(format!(
                    "watch-mode record has no boolean '{}'",
                    schema.active_key
                ))
            })?;
        Ok(WatchModeRecord { active, fields })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl WorkerClient {
    /// The active watch mode. `NotFound` when no record is active.
    pub async fn current_watch_mode(&self) -> Result<WatchModeRecord> {
        let schema = &self.config().schema;
        let payload = self
            .filter(&schema.watch_mode_table, &schema.active_key, true)
            .await?;
        let picked = payload_records(payload)
            .and_then(|records| {
                single_match(
                    &schema.watch_mode_table,
                    &format!("{} = true", schema.active_key),
                    records,
                    self.config().match_policy,
                )
            })
            .and_then(|rec| WatchModeRecord::from_value(rec, schema));
        if let Err(e) = &picked {
            if !matches!(e, ClientError::NotFound(_)) {
                error!("current watch mode: {e}");
            }
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_requires_boolean_flag() {
        let schema = Schema::default();
        let mode =
            WatchModeRecord::from_value(json!({"name": "focus", "active": true}), &schema).unwrap();
        assert!(mode.active);
        assert_eq!(mode.get("name"), Some(&json!("focus")));

        let numeric_flag = json!({"name": "focus", "active": 1});
        assert!(WatchModeRecord::from_value(numeric_flag, &schema).is_err());
        assert!(WatchModeRecord::from_value(json!([]), &schema).is_err());
    }
}
