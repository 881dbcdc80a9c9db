//! Daily and all-time watch-time lookups.

use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::error;

use crate::client::{payload_records, single_match, WorkerClient};
use crate::config::Schema;
use crate::error::{ClientError, Result};
use crate::protocol::Record;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// u64::MAX rounds up to 2^64, the first float out of range.
const U64_LIMIT: f64 = u64::MAX as f64;

/// A day's accumulated watch time.
#[derive(Clone, Debug, PartialEq)]
pub struct WatchTimeRecord {
    pub date: String,
    pub seconds: u64,
    /// The record as the worker returned it.
    pub fields: Record,
}

impl WatchTimeRecord {
    pub fn from_value(value: Value, schema: &Schema) -> Result<Self> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(ClientError::InvalidInput(format!(
                    "watch-time record is not an object: {other}"
                )))
            }
        };
        let date = fields
            .get(&schema.date_key)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ClientError::InvalidInput(format!("watch-time record has no '{}'", schema.date_key))
            })?
            .to_string();
        let seconds = duration_field(&fields, &schema.duration_key)?;
        Ok(WatchTimeRecord {
            date,
            seconds,
            fields,
        })
    }
}

fn duration_field(fields: &Record, key: &str) -> Result<u64> {
    let Some(raw) = fields.get(key) else {
        return Err(ClientError::InvalidInput(format!("missing '{key}'")));
    };
    if let Some(n) = raw.as_u64() {
        return Ok(n);
    }
    match raw.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f < U64_LIMIT => Ok(f.trunc() as u64),
        _ => Err(ClientError::InvalidInput(format!(
            "'{key}' is not a non-negative number in range: {raw}"
        ))),
    }
}

/// Sums the duration field over `records`. Any record without a usable
/// duration fails the whole sum.
pub fn sum_watch_time(records: &[Value], schema: &Schema) -> Result<u64> {
    records.iter().enumerate().try_fold(0u64, |acc, (i, rec)| {
        let fields = rec.as_object().ok_or_else(|| {
            ClientError::InvalidInput(format!("record {i} is not an object"))
        })?;
        let secs = duration_field(fields, &schema.duration_key)
            .map_err(|e| match e {
                ClientError::InvalidInput(m) => {
                    ClientError::InvalidInput(format!("record {i}: {m}"))
                }
                other => other,
            })?;
        acc.checked_add(secs)
            .ok_or_else(|| ClientError::InvalidInput("watch time total overflowed".to_string()))
    })
}

impl WorkerClient {
    /// Today's record, "today" being the local system date.
    pub async fn current_watch_time(&self) -> Result<WatchTimeRecord> {
        self.current_watch_time_on(Local::now().date_naive()).await
    }

    pub async fn current_watch_time_on(&self, date: NaiveDate) -> Result<WatchTimeRecord> {
        let schema = &self.config().schema;
        let day = date.format(DATE_FORMAT).to_string();
        let payload = self
            .filter(&schema.watch_time_table, &schema.date_key, day.as_str())
            .await?;
        let picked = payload_records(payload)
            .and_then(|records| {
                single_match(
                    &schema.watch_time_table,
                    &format!("{} = {day}", schema.date_key),
                    records,
                    self.config().match_policy,
                )
            })
            .and_then(|rec| WatchTimeRecord::from_value(rec, schema));
        if let Err(e) = &picked {
            if !matches!(e, ClientError::NotFound(_)) {
                error!("watch time for {day}: {e}");
            }
        }
        picked
    }

    /// Seconds watched across every stored day.
    pub async fn total_watch_time(&self) -> Result<u64> {
        let schema = &self.config().schema;
        let payload = self.select_all(&schema.watch_time_table).await?;
        let total = payload_records(payload).and_then(|records| sum_watch_time(&records, schema));
        if let Err(e) = &total {
            error!("total watch time: {e}");
        }
        total
    }
}
