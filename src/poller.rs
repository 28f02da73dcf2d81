//! Confirmation poller - the retry/backoff engine.
//!
//! Drives the session through `Submitted -> Waiting -> {Confirmed |
//! Cancelled}` by probing the trial link under a bounded retry budget.
//! Probes are strictly sequential: the delay for attempt N+1 is armed only
//! after attempt N's response is processed, so at most one probe is ever in
//! flight and the total wall-clock wait is bounded by `delay * retries`.

use crate::bridge::{trial_key_from_resend_link, TokenStore};
use crate::client::{ProbeOutcome, TrialService};
use crate::notify::{text, Notifier};
use crate::pacing::Pacer;
use crate::session::{RetryBudget, SessionHandle};
use crate::TrialError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Polls the trial link until the email is confirmed, the budget is
/// exhausted, or the session is cancelled.
#[derive(Clone)]
pub struct ConfirmationPoller {
    session: SessionHandle,
    service: Arc<dyn TrialService>,
    store: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    pacer: Arc<dyn Pacer>,
    polling: Arc<AtomicBool>,
}

impl ConfirmationPoller {
    pub(crate) fn new(
        session: SessionHandle,
        service: Arc<dyn TrialService>,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            session,
            service,
            store,
            notifier,
            pacer,
            polling: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run the poll cycle to completion, blocking the calling thread.
    ///
    /// Idempotent: a second call while a cycle is already running returns
    /// immediately without scheduling additional probes. Returns once the
    /// session reaches a terminal state or a hard error halts the loop.
    pub fn start(&self, budget: RetryBudget) {
        if self
            .polling
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("poll cycle already running; ignoring start");
            return;
        }
        self.run(budget);
        self.polling.store(false, Ordering::SeqCst);
    }

    fn run(&self, mut budget: RetryBudget) {
        loop {
            let Some(link) = self.next_attempt(&mut budget) else {
                return;
            };

            let outcome = self.service.fetch_status(&link);

            // Cancellation observed after the probe: discard its result.
            if self.session.is_cancelled() {
                tracing::debug!("session cancelled; discarding in-flight probe result");
                return;
            }

            match outcome {
                Ok(ProbeOutcome::Confirmed(grant)) => {
                    if !self.session.confirm() {
                        return;
                    }
                    tracing::debug!("trial confirmed");
                    if !grant.token_retrieved {
                        self.store_token(&grant.token);
                    }
                    return;
                }
                Ok(ProbeOutcome::Pending { resend_link }) => {
                    if self.session.note_pending(&resend_link) {
                        self.save_trial_key(&resend_link);
                    }
                    self.pacer.pause(budget.delay);
                }
                Err(err) => {
                    // A hard error means the backend is broken, not slow.
                    // Retrying would spin forever, so halt and surface it.
                    tracing::warn!(error = %err, "status probe failed; halting poll cycle");
                    self.notifier.add_warning(&warn_text(&err));
                    return;
                }
            }
        }
    }

    /// Terminal-state and budget check at the loop boundary. Consumes one
    /// retry and returns the trial link for the next probe, or `None` when
    /// no further probe may be scheduled.
    fn next_attempt(&self, budget: &mut RetryBudget) -> Option<String> {
        if self.session.is_cancelled() || self.session.is_confirmed() {
            return None;
        }
        if budget.retries_remaining == 0 {
            tracing::debug!("retry budget exhausted; cancelling session");
            self.session.cancel();
            return None;
        }
        let link = self.session.trial_link()?;
        budget.retries_remaining -= 1;
        Some(link)
    }

    fn store_token(&self, token: &str) {
        if let Err(err) = self.store.store_token(token) {
            // Remote confirmation is the source of truth; a local store
            // failure degrades bookkeeping but never reopens the flow.
            tracing::warn!(error = %err, "confirmed token could not be stored locally");
            self.notifier.add_warning(text::TOKEN_STORE_FAILURE);
        }
    }

    fn save_trial_key(&self, resend_link: &str) {
        match trial_key_from_resend_link(resend_link) {
            Some(key) => {
                if let Err(err) = self.store.create_trial_key(&key) {
                    tracing::warn!(error = %err, "trial key could not be persisted");
                    self.notifier.add_warning(text::TRIAL_KEY_FAILURE);
                }
            }
            None => {
                tracing::warn!(%resend_link, "resend link has no trial key segment");
                self.notifier.add_warning(text::TRIAL_KEY_FAILURE);
            }
        }
    }
}

fn warn_text(err: &TrialError) -> String {
    match err {
        TrialError::Remote(message) => message.clone(),
        _ => text::INTERNAL_ERROR.to_string(),
    }
}
