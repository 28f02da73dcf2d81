//! Notification sink consumed by the polling engine.
//!
//! The host application provides the real sink (toast/banner rendering);
//! `TracingNotifier` is the default for headless use.

/// User-facing notification texts.
pub mod text {
    /// Shown after the confirmation email was resent successfully.
    pub const RESEND_SUCCESS: &str =
        "Mail has been resent. Please check your mails and click the confirmation link provided.";

    /// Shown when resending the confirmation email failed.
    pub const RESEND_FAILURE: &str = "Could not resend mail.";

    /// Generic fallback for unexpected server failures.
    pub const INTERNAL_ERROR: &str = "An internal error occurred.";

    /// Token confirmed remotely but the local backend rejected it.
    pub const TOKEN_STORE_FAILURE: &str =
        "The trial was confirmed but the token could not be stored locally.";

    /// Trial key could not be persisted for later resumption.
    pub const TRIAL_KEY_FAILURE: &str =
        "Could not store the trial key for session resumption.";
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    /// Report a successful action.
    fn add_success(&self, text: &str);

    /// Report a degraded but non-fatal condition.
    fn add_warning(&self, text: &str);

    /// Report a hard failure.
    fn add_error(&self, text: &str);
}

/// Notifier that routes everything through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn add_success(&self, text: &str) {
        tracing::info!(target: "trialflow::notify", "{text}");
    }

    fn add_warning(&self, text: &str) {
        tracing::warn!(target: "trialflow::notify", "{text}");
    }

    fn add_error(&self, text: &str) {
        tracing::error!(target: "trialflow::notify", "{text}");
    }
}

/// Notifier that records every message, for assertions in tests.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: std::sync::Mutex<Vec<(Severity, String)>>,
}

/// Severity of a recorded notification.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// `add_success`
    Success,
    /// `add_warning`
    Warning,
    /// `add_error`
    Error,
}

#[cfg(any(test, feature = "test-seams"))]
impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded messages in order.
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Messages of a given severity.
    pub fn of(&self, severity: Severity) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    fn record(&self, severity: Severity, text: &str) {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((severity, text.to_string()));
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl Notifier for RecordingNotifier {
    fn add_success(&self, text: &str) {
        self.record(Severity::Success, text);
    }

    fn add_warning(&self, text: &str) {
        self.record(Severity::Warning, text);
    }

    fn add_error(&self, text: &str) {
        self.record(Severity::Error, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.add_success("a");
        notifier.add_warning("b");
        notifier.add_error("c");

        let messages = notifier.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], (Severity::Success, "a".to_string()));
        assert_eq!(messages[1], (Severity::Warning, "b".to_string()));
        assert_eq!(messages[2], (Severity::Error, "c".to_string()));
    }

    #[test]
    fn severity_filter() {
        let notifier = RecordingNotifier::new();
        notifier.add_warning("w1");
        notifier.add_error("e1");
        notifier.add_warning("w2");
        assert_eq!(notifier.of(Severity::Warning), vec!["w1", "w2"]);
    }
}
