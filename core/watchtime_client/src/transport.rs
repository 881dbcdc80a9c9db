//! Single-shot message channel to the storage worker.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ClientError, Result};
use crate::protocol::{Request, WorkerReply};

/// One request, one reply. Implementations report channel failures as
/// `ClientError::Transport` and hand back the worker's envelope untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, request: &Request) -> Result<WorkerReply>;
}

/// Posts each request as JSON to the worker's `/message` endpoint.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        HttpTransport {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(&self, request: &Request) -> Result<WorkerReply> {
        let res = self.client.post(&self.endpoint).json(request).send().await?;
        if !res.status().is_success() {
            return Err(ClientError::Transport(format!(
                "http_{}",
                res.status().as_u16()
            )));
        }
        Ok(res.json::<WorkerReply>().await?)
    }
}
