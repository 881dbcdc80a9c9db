//! Notification banner: one region, last write wins.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(3000);

/// The region a banner is drawn into (a DOM node, a terminal line, ...).
pub trait BannerSurface: Send + 'static {
    fn set_content(&mut self, message: &str, icon: &str, color: &str);
    fn fade_in(&mut self);
    fn fade_out(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "✔",
            NotificationKind::Info => "ℹ",
            NotificationKind::Warning => "⚠",
            NotificationKind::Error => "✖",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            NotificationKind::Success => "#2e7d32",
            NotificationKind::Info => "#1565c0",
            NotificationKind::Warning => "#f9a825",
            NotificationKind::Error => "#c62828",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub message: String,
    pub icon: String,
    pub color: String,
    /// How long the banner stays up. Ignored when `persistent`.
    pub delay: Duration,
    pub persistent: bool,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Notification {
            message: message.into(),
            icon: kind.icon().to_string(),
            color: kind.color().to_string(),
            delay: DEFAULT_DELAY,
            persistent: false,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}

/// Shows notifications on a single surface. A new `show` overwrites whatever
/// is on screen and cancels the previous auto-dismiss; nothing is queued.
pub struct Notifier<S: BannerSurface> {
    surface: Arc<Mutex<S>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<S: BannerSurface> Notifier<S> {
    pub fn new(surface: S) -> Self {
        Notifier {
            surface: Arc::new(Mutex::new(surface)),
            pending: Mutex::new(None),
        }
    }

    pub fn surface(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.surface)
    }

    /// Returns once the banner is visible; the fade-out runs in the background.
    pub async fn show(&self, n: &Notification) {
        let mut pending = self.pending.lock().await;
        if let Some(prev) = pending.take() {
            prev.abort();
        }

        {
            let mut surface = self.surface.lock().await;
            surface.set_content(&n.message, &n.icon, &n.color);
            surface.fade_in();
        }
        debug!("notification shown: {}", n.message);

        if n.persistent {
            return;
        }
        let surface = Arc::clone(&self.surface);
        let delay = n.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            surface.lock().await.fade_out();
        }));
    }

    /// Waits for the scheduled fade-out, if one is pending.
    pub async fn settle(&self) {
        let pending = self.pending.lock().await.take();
        if let Some(handle) = pending {
            let _ = handle.await;
        }
    }

    /// Hides the banner now, e.g. a persistent one.
    pub async fn dismiss(&self) {
        if let Some(prev) = self.pending.lock().await.take() {
            prev.abort();
        }
        self.surface.lock().await.fade_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl BannerSurface for Recorder {
        fn set_content(&mut self, message: &str, icon: &str, color: &str) {
            self.events.push(format!("content {icon} {color} {message}"));
        }

        fn fade_in(&mut self) {
            self.events.push("in".to_string());
        }

        fn fade_out(&mut self) {
            self.events.push("out".to_string());
        }
    }

    async fn events(n: &Notifier<Recorder>) -> Vec<String> {
        n.surface().lock().await.events.clone()
    }

    #[tokio::test]
    async fn timed_banner_fades_out_after_delay() {
        let notifier = Notifier::new(Recorder::default());
        let note = Notification::new(NotificationKind::Success, "saved")
            .with_delay(Duration::from_millis(20));
        notifier.show(&note).await;
        assert_eq!(events(&notifier).await, vec!["content ✔ #2e7d32 saved", "in"]);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(
            events(&notifier).await,
            vec!["content ✔ #2e7d32 saved", "in", "out"]
        );
    }

    #[tokio::test]
    async fn settle_waits_for_fade_out() {
        let notifier = Notifier::new(Recorder::default());
        let note =
            Notification::new(NotificationKind::Info, "hi").with_delay(Duration::from_millis(10));
        notifier.show(&note).await;
        notifier.settle().await;
        assert_eq!(events(&notifier).await.last().map(String::as_str), Some("out"));
    }

    #[tokio::test]
    async fn persistent_banner_stays_until_dismissed() {
        let notifier = Notifier::new(Recorder::default());
        let note = Notification::new(NotificationKind::Error, "worker offline")
            .with_delay(Duration::from_millis(10))
            .persistent();
        notifier.show(&note).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(events(&notifier).await.last().map(String::as_str), Some("in"));

        notifier.dismiss().await;
        assert_eq!(events(&notifier).await.last().map(String::as_str), Some("out"));
    }

    #[tokio::test]
    async fn later_show_overwrites_and_cancels_earlier_dismiss() {
        let notifier = Notifier::new(Recorder::default());
        let first = Notification::new(NotificationKind::Info, "first")
            .with_delay(Duration::from_millis(30));
        let second = Notification::new(NotificationKind::Warning, "second")
            .with_icon("!")
            .with_color("orange")
            .with_delay(Duration::from_millis(400));
        notifier.show(&first).await;
        notifier.show(&second).await;

        tokio::time::sleep(Duration::from_millis(120)).await;
        let seen = events(&notifier).await;
        assert_eq!(seen.last().map(String::as_str), Some("in"));
        assert_eq!(seen[2], "content ! orange second");
        assert!(!seen.iter().any(|e| e == "out"));
    }
}
