//! Tracing Notifier
//!
//! Implements DetectionNotifier by writing notices to the log, for
//! deployments without a UI to show toasts.

use crate::domain::entities::{Notification, Severity};
use crate::domain::ports::DetectionNotifier;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl DetectionNotifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        let message = notification.message();
        match notification.severity() {
            Severity::Info | Severity::Success => tracing::info!("{}", message),
            Severity::Warning => tracing::warn!("{}", message),
            Severity::Error => tracing::error!("{}", message),
        }
    }
}
