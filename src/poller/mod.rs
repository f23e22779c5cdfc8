//! Notification polling loop
//!
//! One background task per run: an immediate fetch-and-notify cycle, then a
//! deadline wait loop that ticks once per second, emits the countdown, and
//! honors the cancellation token between ticks. Everything the UI needs to
//! know travels over a [`PollerMessage`] channel.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::jokeapi::{FetchedJoke, JokeClient, JokeRecord};
use crate::notify::Notifier;

/// Wait-loop tick; bounds stop latency.
const TICK: Duration = Duration::from_secs(1);

/// Events the poller task hands to the UI layer.
#[derive(Debug)]
pub enum PollerMessage {
    /// Short human-readable status line.
    Status(String),
    /// Remaining time until the next fetch.
    Countdown(String),
    /// A freshly fetched joke for the history list.
    Joke(JokeRecord),
    /// Notification that no OS backend could deliver; shown as a modal.
    FallbackNotification { title: String, body: String },
}

/// Whether the poll loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollerState {
    #[default]
    Stopped,
    Running,
}

/// Handle to a spawned poller task.
pub struct PollerHandle {
    handle: tokio::task::JoinHandle<()>,
    cancel: CancellationToken,
}

impl PollerHandle {
    /// Spawn the loop with a snapshot of the current settings. Settings
    /// changes are applied by replacing the task, never by mutating it.
    pub fn spawn(
        runtime: &Handle,
        settings: Settings,
        client: Arc<JokeClient>,
        notifier: Arc<Notifier>,
        tx: Sender<PollerMessage>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let handle = runtime.spawn(run_poller(settings, client, notifier, tx, cancel.clone()));
        Self { handle, cancel }
    }

    /// Stop the loop. No countdown or joke message is delivered afterwards.
    pub fn stop(self) {
        self.cancel.cancel();
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Remaining time as shown in the countdown line.
pub fn format_countdown(remaining_secs: u64) -> String {
    format!(
        "Next joke in: {}m {}s",
        remaining_secs / 60,
        remaining_secs % 60
    )
}

/// The poll loop itself. Runs until cancelled.
pub async fn run_poller(
    settings: Settings,
    client: Arc<JokeClient>,
    notifier: Arc<Notifier>,
    tx: Sender<PollerMessage>,
    cancel: CancellationToken,
) {
    tracing::info!(
        frequency_minutes = settings.frequency_minutes,
        "Poller started"
    );

    // First joke right away, then on cadence.
    fetch_and_notify(&settings, &client, &notifier, &tx).await;

    loop {
        let deadline =
            Instant::now() + Duration::from_secs(u64::from(settings.frequency_minutes) * 60);

        loop {
            if cancel.is_cancelled() {
                tracing::info!("Poller stopped");
                return;
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }

            let remaining = deadline - now;
            let _ = tx.send(PollerMessage::Countdown(format_countdown(
                remaining.as_secs(),
            )));

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Poller stopped");
                    return;
                }
                _ = tokio::time::sleep(remaining.min(TICK)) => {}
            }
        }

        fetch_and_notify(&settings, &client, &notifier, &tx).await;
    }
}

/// One cycle: fetch, push the record to the UI, raise the notification,
/// report status. A failed fetch only produces a status line.
async fn fetch_and_notify(
    settings: &Settings,
    client: &JokeClient,
    notifier: &Notifier,
    tx: &Sender<PollerMessage>,
) {
    match client.fetch(settings).await {
        Ok(fetched) => {
            let FetchedJoke { record, title, body } = fetched;
            let timestamp = record.timestamp.clone();
            let _ = tx.send(PollerMessage::Joke(record));

            let duration = Duration::from_secs(u64::from(settings.notification_duration_seconds));
            notifier.notify(&title, &body, duration);

            let _ = tx.send(PollerMessage::Status(format!(
                "Last joke delivered at {timestamp}"
            )));
        }
        Err(e) => {
            tracing::warn!("Fetch cycle failed: {}", e);
            let _ = tx.send(PollerMessage::Status(format!("Error: {e}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(0), "Next joke in: 0m 0s");
        assert_eq!(format_countdown(59), "Next joke in: 0m 59s");
        assert_eq!(format_countdown(61), "Next joke in: 1m 1s");
        assert_eq!(format_countdown(1800), "Next joke in: 30m 0s");
    }
}
