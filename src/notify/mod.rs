//! Notification delivery
//!
//! A ranked list of backends probed once at startup. The desktop toast goes
//! first; an in-app backend that posts a message back to the UI channel goes
//! last and cannot fail, so a joke is never silently dropped.

use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::poller::PollerMessage;
use crate::APP_NAME;

/// A notification backend failed to deliver.
#[derive(Debug, thiserror::Error)]
#[error("{backend}: {reason}")]
pub struct NotifyError {
    pub backend: &'static str,
    pub reason: String,
}

/// One way of putting a title/body pair in front of the user.
pub trait NotificationBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this backend can deliver on the current platform. Called once
    /// at startup.
    fn probe(&self) -> bool;

    fn notify(&self, title: &str, body: &str, duration: Duration) -> Result<(), NotifyError>;
}

/// Native OS toast via `notify-rust`.
pub struct DesktopToast;

impl NotificationBackend for DesktopToast {
    fn name(&self) -> &'static str {
        "desktop toast"
    }

    fn probe(&self) -> bool {
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            // Requires a freedesktop notification server on the session bus.
            notify_rust::get_server_information().is_ok()
        }
        #[cfg(any(target_os = "windows", target_os = "macos"))]
        {
            true
        }
    }

    fn notify(&self, title: &str, body: &str, duration: Duration) -> Result<(), NotifyError> {
        notify_rust::Notification::new()
            .appname(APP_NAME)
            .summary(title)
            .body(body)
            .timeout(notify_rust::Timeout::Milliseconds(duration.as_millis() as u32))
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError {
                backend: self.name(),
                reason: e.to_string(),
            })
    }
}

/// Last-resort backend: hands the notification to the UI channel, which
/// renders it as a modal window.
pub struct InAppBackend {
    tx: Sender<PollerMessage>,
}

impl InAppBackend {
    pub fn new(tx: Sender<PollerMessage>) -> Self {
        Self { tx }
    }
}

impl NotificationBackend for InAppBackend {
    fn name(&self) -> &'static str {
        "in-app"
    }

    fn probe(&self) -> bool {
        true
    }

    fn notify(&self, title: &str, body: &str, _duration: Duration) -> Result<(), NotifyError> {
        self.tx
            .send(PollerMessage::FallbackNotification {
                title: title.to_string(),
                body: body.to_string(),
            })
            .map_err(|e| NotifyError {
                backend: self.name(),
                reason: e.to_string(),
            })
    }
}

/// The ranked backend list. Delivery walks it in order until one succeeds.
pub struct Notifier {
    backends: Vec<Box<dyn NotificationBackend>>,
}

impl Notifier {
    /// Probe the platform once and assemble the ranked list, ending with the
    /// in-app backend so delivery always has somewhere to land.
    pub fn probe(tx: Sender<PollerMessage>) -> Self {
        let mut backends: Vec<Box<dyn NotificationBackend>> = Vec::new();

        let desktop = DesktopToast;
        if desktop.probe() {
            tracing::info!("Notification backend available: {}", desktop.name());
            backends.push(Box::new(desktop));
        } else {
            tracing::warn!("No desktop notification server found, using in-app fallback only");
        }

        backends.push(Box::new(InAppBackend::new(tx)));
        Self { backends }
    }

    /// Explicit backend list, used by tests.
    pub fn with_backends(backends: Vec<Box<dyn NotificationBackend>>) -> Self {
        Self { backends }
    }

    /// Deliver through the first backend that accepts. Returns the name of
    /// the backend that delivered, or `None` if every one refused.
    pub fn notify(&self, title: &str, body: &str, duration: Duration) -> Option<&'static str> {
        for backend in &self.backends {
            match backend.notify(title, body, duration) {
                Ok(()) => return Some(backend.name()),
                Err(e) => tracing::warn!("Notification delivery failed, trying next: {}", e),
            }
        }
        tracing::error!("All notification backends failed");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct AlwaysFails;

    impl NotificationBackend for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }
        fn probe(&self) -> bool {
            true
        }
        fn notify(&self, _: &str, _: &str, _: Duration) -> Result<(), NotifyError> {
            Err(NotifyError {
                backend: self.name(),
                reason: "nope".to_string(),
            })
        }
    }

    struct Recording {
        delivered: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl NotificationBackend for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }
        fn probe(&self) -> bool {
            true
        }
        fn notify(&self, title: &str, body: &str, _: Duration) -> Result<(), NotifyError> {
            self.delivered
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_falls_through_to_next_backend() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let notifier = Notifier::with_backends(vec![
            Box::new(AlwaysFails),
            Box::new(Recording {
                delivered: delivered.clone(),
            }),
        ]);

        let used = notifier.notify("T", "B", Duration::from_secs(5));
        assert_eq!(used, Some("recording"));
        assert_eq!(
            delivered.lock().unwrap().as_slice(),
            &[("T".to_string(), "B".to_string())]
        );
    }

    #[test]
    fn test_in_app_backend_posts_to_channel() {
        let (tx, rx) = std::sync::mpsc::channel();
        let notifier = Notifier::with_backends(vec![Box::new(InAppBackend::new(tx))]);

        let used = notifier.notify("Title", "Body", Duration::from_secs(5));
        assert_eq!(used, Some("in-app"));

        match rx.try_recv().unwrap() {
            PollerMessage::FallbackNotification { title, body } => {
                assert_eq!(title, "Title");
                assert_eq!(body, "Body");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_all_backends_failing_reports_none() {
        let notifier = Notifier::with_backends(vec![Box::new(AlwaysFails)]);
        assert_eq!(notifier.notify("T", "B", Duration::from_secs(5)), None);
    }
}
