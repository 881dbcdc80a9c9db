//! Client-side helpers for a watch-time tracker whose records live in a
//! separate storage worker.
//!
//! Every storage verb is a single request/reply round trip through a
//! [`Transport`]; failures come back as [`ClientError`] and are logged once.

pub mod client;
pub mod config;
pub mod duration;
pub mod error;
pub mod notification;
pub mod protocol;
pub mod transport;
pub mod watch_mode;
pub mod watch_time;

pub use client::WorkerClient;
pub use config::{ClientConfig, MatchPolicy, Schema};
pub use duration::format_duration;
pub use error::{ClientError, Result};
pub use notification::{BannerSurface, Notification, NotificationKind, Notifier};
pub use protocol::{Primitive, Record, Request, WorkerReply};
pub use transport::{HttpTransport, Transport};
pub use watch_mode::WatchModeRecord;
pub use watch_time::{sum_watch_time, WatchTimeRecord};
