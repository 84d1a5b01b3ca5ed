pub const SYNC_SUCCESS_MESSAGE: &str = "Events added to Google Calendar!";
pub const SYNC_FAILURE_MESSAGE: &str = "Failed to sync events. Check the console for details.";
pub const API_NOT_INITIALIZED_MESSAGE: &str = "Google API not initialized.";

/// Outcome shown to the user once per sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Failure(String),
}

/// Blocking, user-facing notification sink
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints successes to stdout and failures to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success(message) => println!("✅ {}", message),
            Notification::Failure(message) => eprintln!("❌ {}", message),
        }
    }
}
