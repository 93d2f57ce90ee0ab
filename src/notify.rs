//! User-visible notifications.
//!
//! Rendering is the host's business; the crate only hands over the text.

use parking_lot::Mutex;

/// Level of a user-visible message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// Shows short messages to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.notify(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

/// Sends notifications to the log only.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!(target: "modelsync::notify", "{message}"),
            Level::Error => tracing::error!(target: "modelsync::notify", "{message}"),
        }
    }
}

/// Keeps every notification in memory, for headless hosts.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Mutex<Vec<(Level, String)>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().clone()
    }

    /// True if any message of `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages
            .lock()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl Notifier for MessageLog {
    fn notify(&self, level: Level, message: &str) {
        tracing::debug!(?level, text = message, "notification");
        self.messages.lock().push((level, message.to_string()));
    }
}
