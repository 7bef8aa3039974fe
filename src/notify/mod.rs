//! Out-of-band notification of site administrators.

/// Tracing target of administrator notifications.
///
/// The CLI can route this target to its own log file.
pub const ADMINS_TARGET: &str = "admins";

/// Receives failures that site administrators must hear about.
pub trait Notifier: Send + Sync {
    /// Deliver `message` under `subject`.
    fn notify(&self, subject: &str, message: &str);
}

/// Notifier that emits an error event on the [`ADMINS_TARGET`] target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, subject: &str, message: &str) {
        tracing::error!(target: ADMINS_TARGET, subject, "{message}");
    }
}
