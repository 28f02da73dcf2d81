//! Trial session state shared between the poller and presentation adapters.
//!
//! `SessionHandle` is the one piece of shared state per session. Adapters
//! read it; mutation happens only through the poller's loop steps and the
//! explicit public operations on `TrialManager` / `SessionHandle`.

use crate::protocol::models::TrialDetails;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Lifecycle status of a trial session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrialStatus {
    /// No trial requested yet.
    #[default]
    Idle,

    /// Form submitted, trial created, first status probe not yet answered.
    Submitted,

    /// The service is waiting for the user to click the confirmation email.
    WaitingForVerification,

    /// Email confirmed and token retrieved. Terminal.
    Confirmed,

    /// Cancelled by the user or by retry exhaustion. Terminal until resend.
    Cancelled,
}

/// Retry policy for one polling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    /// Delay between consecutive status probes.
    pub delay: Duration,

    /// Probes left before the session is cancelled.
    pub retries_remaining: u32,
}

impl RetryBudget {
    /// Create a budget with an explicit delay and retry count.
    pub const fn new(delay: Duration, retries_remaining: u32) -> Self {
        Self {
            delay,
            retries_remaining,
        }
    }

    /// Budget for the initial wait after submission: 5 s x 60, about 5 minutes.
    pub const fn initial() -> Self {
        Self::new(Duration::from_secs(5), 60)
    }

    /// Shorter budget after an explicit resend: 5 s x 6, about 30 seconds.
    pub const fn resend() -> Self {
        Self::new(Duration::from_secs(5), 6)
    }
}

#[derive(Debug, Default)]
struct SessionInner {
    trial_link: Option<String>,
    resend_link: Option<String>,
    status: TrialStatus,
    error_message: Option<String>,
    cancelled: bool,
    confirmed: bool,
    trial_key_saved: bool,
    resumption_key: Option<String>,
    details: Option<TrialDetails>,
}

/// Shared handle to the in-progress trial session.
///
/// Cloning is cheap; all clones observe the same session.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionInner>>,
}

impl SessionHandle {
    /// Create a fresh idle session.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle status.
    pub fn status(&self) -> TrialStatus {
        self.lock().status
    }

    /// Link identifying the created trial, once submitted.
    pub fn trial_link(&self) -> Option<String> {
        self.lock().trial_link.clone()
    }

    /// Link for resending the confirmation email, once waiting.
    pub fn resend_link(&self) -> Option<String> {
        self.lock().resend_link.clone()
    }

    /// Inline error message from a rejected submission, if any.
    pub fn error_message(&self) -> Option<String> {
        self.lock().error_message.clone()
    }

    /// Subscriber details for display, populated on resumption.
    pub fn details(&self) -> Option<TrialDetails> {
        self.lock().details.clone()
    }

    /// Resumption key still pending confirmation, if any.
    pub fn resumption_key(&self) -> Option<String> {
        self.lock().resumption_key.clone()
    }

    /// Whether the session has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Whether the email was confirmed.
    pub fn is_confirmed(&self) -> bool {
        self.lock().confirmed
    }

    /// Cancel the session. Takes effect at the poller's next scheduled
    /// check; an in-flight probe completes but its result is discarded.
    /// No-op once the session is confirmed.
    pub fn cancel(&self) {
        let mut inner = self.lock();
        if inner.confirmed {
            return;
        }
        inner.cancelled = true;
        inner.status = TrialStatus::Cancelled;
    }

    /// Replace the session with a freshly submitted one.
    pub(crate) fn begin(&self, trial_link: String) {
        *self.lock() = SessionInner {
            trial_link: Some(trial_link),
            status: TrialStatus::Submitted,
            ..SessionInner::default()
        };
    }

    /// Replace the session with one resumed from a persisted trial key.
    /// The key is already stored, so it is never re-persisted.
    pub(crate) fn begin_resumed(
        &self,
        trial_link: String,
        resumption_key: String,
        details: TrialDetails,
    ) {
        *self.lock() = SessionInner {
            trial_link: Some(trial_link),
            status: TrialStatus::WaitingForVerification,
            trial_key_saved: true,
            resumption_key: Some(resumption_key),
            details: Some(details),
            ..SessionInner::default()
        };
    }

    /// Record an inline submission error.
    pub(crate) fn set_error_message(&self, message: String) {
        self.lock().error_message = Some(message);
    }

    /// Record a pending probe: enter the waiting state and remember the
    /// resend link. Returns true exactly once per session, when the trial
    /// key still needs to be persisted.
    pub(crate) fn note_pending(&self, resend_link: &str) -> bool {
        let mut inner = self.lock();
        if inner.confirmed || inner.cancelled {
            return false;
        }
        inner.resend_link = Some(resend_link.to_string());
        inner.status = TrialStatus::WaitingForVerification;
        if inner.trial_key_saved {
            false
        } else {
            inner.trial_key_saved = true;
            true
        }
    }

    /// Mark the session confirmed. Returns false when the session already
    /// reached a terminal state, in which case the caller must discard the
    /// probe result.
    pub(crate) fn confirm(&self) -> bool {
        let mut inner = self.lock();
        if inner.confirmed || inner.cancelled {
            return false;
        }
        inner.confirmed = true;
        inner.status = TrialStatus::Confirmed;
        inner.resumption_key = None;
        inner.error_message = None;
        true
    }

    /// Clear cancellation ahead of a resend-driven repoll.
    pub(crate) fn reopen_for_resend(&self) {
        let mut inner = self.lock();
        if inner.confirmed {
            return;
        }
        inner.cancelled = false;
        inner.status = TrialStatus::WaitingForVerification;
        inner.error_message = None;
    }
}
