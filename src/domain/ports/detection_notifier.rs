//! Detection Notifier Port
//!
//! Side channel for user-facing progress and outcome notices.

use crate::domain::entities::Notification;

/// Receiver for detection notices.
///
/// The UI layer typically turns these into toasts. Implementations must
/// not block: they are called inline from the detection flow.
pub trait DetectionNotifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}
