use std::time::Duration;

pub const DEFAULT_WORKER_URL: &str = "http://127.0.0.1:17600";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// What to do when a lookup expected to be unique matches several records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Use the first match and log a warning.
    #[default]
    First,
    /// Fail with `ClientError::Ambiguous`.
    Strict,
}

/// Table and key names the watch-time/watch-mode helpers read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    pub watch_time_table: String,
    pub date_key: String,
    pub duration_key: String,
    pub watch_mode_table: String,
    pub active_key: String,
}

impl Default for Schema {
    fn default() -> Self {
        Schema {
            watch_time_table: "watch-time".to_string(),
            date_key: "date".to_string(),
            duration_key: "total-watch-time".to_string(),
            watch_mode_table: "watch-mode".to_string(),
            active_key: "active".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Worker base URL, e.g. http://127.0.0.1:17600
    pub worker_url: String,
    /// `None` waits for the worker forever.
    pub timeout: Option<Duration>,
    pub schema: Schema,
    pub match_policy: MatchPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            worker_url: DEFAULT_WORKER_URL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            schema: Schema::default(),
            match_policy: MatchPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_worker_url(mut self, url: impl Into<String>) -> Self {
        self.worker_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    /// Endpoint every request is posted to.
    pub fn message_endpoint(&self) -> String {
        format!("{}/message", self.worker_url.trim_end_matches('/'))
    }
}
