//! User-visible notifications.

use tracing::warn;

/// Message shown when the feed cannot be loaded.
pub const REFRESH_FAILED_MESSAGE: &str = "There was a problem getting data";

/// Surface a blocking message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!(message, "user notification");
    }
}
