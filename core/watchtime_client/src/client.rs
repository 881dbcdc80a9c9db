//! Request helpers, one per storage verb, on top of a [`Transport`].

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{ClientConfig, MatchPolicy};
use crate::error::{ClientError, Result};
use crate::protocol::{Primitive, Record, Request};
use crate::transport::{HttpTransport, Transport};

#[derive(Clone)]
pub struct WorkerClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl WorkerClient {
    /// Client talking HTTP to `config.worker_url`.
    pub fn new(config: ClientConfig) -> Self {
        let transport = HttpTransport::new(config.message_endpoint());
        Self::with_transport(Arc::new(transport), config)
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        WorkerClient { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends one request and waits for its reply, bounded by the configured
    /// timeout. Does not log; the helpers below do.
    pub async fn send(&self, request: &Request) -> Result<Value> {
        debug!(
            "dispatch {} table={}",
            request.operation(),
            request.table().unwrap_or("-")
        );
        let reply = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.transport.round_trip(request))
                .await
                .map_err(|_| ClientError::WorkerUnavailable { timeout: limit })??,
            None => self.transport.round_trip(request).await?,
        };
        reply.into_payload_for(request)
    }

    pub(crate) async fn call(&self, request: Request) -> Result<Value> {
        match self.send(&request).await {
            Ok(v) => Ok(v),
            Err(e) => {
                error!(
                    "{} on '{}' failed: {e}",
                    request.operation(),
                    request.table().unwrap_or("-")
                );
                Err(e)
            }
        }
    }

    pub async fn select_by_id(&self, table: &str, id: i64) -> Result<Value> {
        self.call(Request::SelectById {
            table: table.to_string(),
            index: id,
        })
        .await
    }

    pub async fn select_all(&self, table: &str) -> Result<Value> {
        self.call(Request::SelectAll {
            table: table.to_string(),
        })
        .await
    }

    pub async fn filter(
        &self,
        table: &str,
        property: &str,
        value: impl Into<Primitive>,
    ) -> Result<Value> {
        self.call(Request::Filter {
            table: table.to_string(),
            property: property.to_string(),
            value: value.into(),
        })
        .await
    }

    pub async fn insert(&self, table: &str, records: Vec<Record>) -> Result<Value> {
        self.call(Request::Insert {
            table: table.to_string(),
            records,
        })
        .await
    }

    /// Replaces the fields of every record whose `property` equals `value`.
    /// An `error` flag inside the reply is reported as `ClientError::Worker`;
    /// the other helpers hand such fields back as data.
    pub async fn update_by_property(
        &self,
        table: &str,
        property: &str,
        value: impl Into<Primitive>,
        new_record: Record,
    ) -> Result<Value> {
        self.call(Request::UpdateByProperty {
            table: table.to_string(),
            property: property.to_string(),
            value: value.into(),
            new_records: new_record,
        })
        .await
    }

    pub async fn delete_by_id(&self, table: &str, id: i64) -> Result<Value> {
        self.call(Request::DeleteById {
            table: table.to_string(),
            index: id,
        })
        .await
    }

    pub async fn reset_table(&self, table: &str) -> Result<Value> {
        self.call(Request::ResetTable {
            table: table.to_string(),
        })
        .await
    }

    /// Asks the worker to navigate to `page`. The outcome is only logged.
    pub async fn redirect(&self, page: &str) {
        let request = Request::Redirect {
            page: page.to_string(),
        };
        match self.send(&request).await {
            Ok(reply) => info!("redirect to {page}: {reply}"),
            Err(e) => error!("redirect to {page} failed: {e}"),
        }
    }

    /// Fire-and-forget variant of [`WorkerClient::redirect`].
    pub fn spawn_redirect(&self, page: &str) -> JoinHandle<()> {
        let client = self.clone();
        let page = page.to_string();
        tokio::spawn(async move { client.redirect(&page).await })
    }
}

/// Interprets a lookup payload as a list of records. `null` is an empty list
/// and a bare object is a list of one.
pub(crate) fn payload_records(payload: Value) -> Result<Vec<Value>> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        obj @ Value::Object(_) => Ok(vec![obj]),
        other => Err(ClientError::InvalidInput(format!(
            "expected a record list, got {other}"
        ))),
    }
}

/// Narrows a lookup result expected to hold one record.
pub(crate) fn single_match(
    table: &str,
    what: &str,
    mut records: Vec<Value>,
    policy: MatchPolicy,
) -> Result<Value> {
    match records.len() {
        0 => Err(ClientError::NotFound(format!("{what} in '{table}'"))),
        1 => Ok(records.remove(0)),
        n if policy == MatchPolicy::Strict => Err(ClientError::Ambiguous {
            table: table.to_string(),
            matches: n,
        }),
        n => {
            warn!("{n} records match {what} in '{table}'; using the first");
            Ok(records.remove(0))
        }
    }
}
