#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use watchtime_client::{ClientConfig, ClientError, Request, Transport, WorkerClient, WorkerReply};

type Responder = dyn Fn(&Request) -> Result<WorkerReply, ClientError> + Send + Sync;

/// In-memory transport answering from a closure and remembering every request.
pub struct ScriptedTransport {
    responder: Box<Responder>,
    pub seen: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new(
        responder: impl Fn(&Request) -> Result<WorkerReply, ClientError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(ScriptedTransport {
            responder: Box::new(responder),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<Request> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn round_trip(&self, request: &Request) -> Result<WorkerReply, ClientError> {
        self.seen.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}

/// Transport whose worker never answers.
pub struct SilentTransport;

#[async_trait]
impl Transport for SilentTransport {
    async fn round_trip(&self, _request: &Request) -> Result<WorkerReply, ClientError> {
        std::future::pending().await
    }
}

pub fn client_with(transport: Arc<dyn Transport>) -> WorkerClient {
    WorkerClient::with_transport(transport, ClientConfig::default())
}

pub fn unreachable() -> Result<WorkerReply, ClientError> {
    Err(ClientError::Transport("connection refused".to_string()))
}
