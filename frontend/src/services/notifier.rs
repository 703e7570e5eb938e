use tracing::{error, info};

/// User-visible feedback, fire-and-forget
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier for headless use: notices go to the log under the `notice` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        info!(target: "notice", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "notice", "{}", message);
    }
}
