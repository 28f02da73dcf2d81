//! Trial Manager - the main public API for trialflow.
//!
//! The `TrialManager` ties the layers together for a presentation adapter:
//! - submit the trial request and create the remote trial
//! - run the confirmation poll cycle
//! - resend the confirmation email with a fresh (shorter) budget
//! - resume a pending session after a page reload

use crate::bridge::{AdminBackend, TokenStore};
use crate::client::http::AugurClient;
use crate::client::TrialService;
use crate::config::TrialConfig;
use crate::notify::{text, Notifier, TracingNotifier};
use crate::pacing::{Pacer, SystemPacer};
use crate::poller::ConfirmationPoller;
use crate::protocol::models::TrialRequest;
use crate::session::{RetryBudget, SessionHandle};
use crate::TrialError;
use std::sync::Arc;

/// Main entry point for the trial confirmation flow.
///
/// Create one instance per trial form or banner. `start` blocks the calling
/// thread for the duration of the poll cycle; run it on a worker thread when
/// the adapter needs to stay responsive, and call `cancel` from anywhere.
pub struct TrialManager {
    config: TrialConfig,
    service: Arc<dyn TrialService>,
    notifier: Arc<dyn Notifier>,
    session: SessionHandle,
    poller: ConfirmationPoller,
}

impl TrialManager {
    /// Create a manager with the production HTTP client and backend bridge.
    ///
    /// # Errors
    /// Returns an error if configuration validation or HTTP client
    /// construction fails.
    pub fn new(config: TrialConfig) -> Result<Self, TrialError> {
        config.validate()?;
        let service = Arc::new(AugurClient::new(&config)?);
        let store = Arc::new(AdminBackend::new(&config)?);
        Ok(Self::assemble(
            config,
            service,
            store,
            Arc::new(TracingNotifier),
            Arc::new(SystemPacer),
        ))
    }

    /// Create a manager with injected collaborators (for testing).
    #[cfg(any(test, feature = "test-seams"))]
    pub fn with_parts(
        config: TrialConfig,
        service: Arc<dyn TrialService>,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        pacer: Arc<dyn Pacer>,
    ) -> Result<Self, TrialError> {
        config.validate()?;
        Ok(Self::assemble(config, service, store, notifier, pacer))
    }

    fn assemble(
        config: TrialConfig,
        service: Arc<dyn TrialService>,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        let session = SessionHandle::new();
        let poller = ConfirmationPoller::new(
            session.clone(),
            service.clone(),
            store,
            notifier.clone(),
            pacer,
        );
        Self {
            config,
            service,
            notifier,
            session,
            poller,
        }
    }

    /// Submit the trial request and record the created trial's link.
    ///
    /// Validation failures (malformed data, duplicate email) are recorded as
    /// an inline error message on the session; any other failure is surfaced
    /// through the notification sink as a generic internal error.
    pub fn submit(&self, request: &TrialRequest) -> Result<(), TrialError> {
        if let Err(err) = request.validate() {
            if let TrialError::Validation(message) = &err {
                self.session.set_error_message(message.clone());
            }
            return Err(err);
        }

        match self.service.create_trial(request) {
            Ok(trial_link) => {
                self.session.begin(trial_link);
                Ok(())
            }
            Err(TrialError::Validation(message)) => {
                self.session.set_error_message(message.clone());
                Err(TrialError::Validation(message))
            }
            Err(err) => {
                self.notifier.add_warning(text::INTERNAL_ERROR);
                Err(err)
            }
        }
    }

    /// Run the confirmation poll cycle with an explicit budget.
    pub fn start(&self, budget: RetryBudget) -> Result<(), TrialError> {
        if self.session.trial_link().is_none() {
            return Err(TrialError::MissingTrialLink);
        }
        self.poller.start(budget);
        Ok(())
    }

    /// Run the confirmation poll cycle with the default initial budget.
    pub fn start_default(&self) -> Result<(), TrialError> {
        self.start(RetryBudget::initial())
    }

    /// Cancel the session; the poll cycle stops at its next check.
    pub fn cancel(&self) {
        self.session.cancel();
    }

    /// Resend the confirmation email and repoll with the shorter resend
    /// budget. Clears a previous cancellation on success.
    pub fn resend(&self) -> Result<(), TrialError> {
        let resend_link = self
            .session
            .resend_link()
            .ok_or(TrialError::MissingResendLink)?;

        match self.service.resend(&resend_link) {
            Ok(()) => {
                self.notifier.add_success(text::RESEND_SUCCESS);
                self.session.reopen_for_resend();
                self.poller.start(RetryBudget::resend());
                Ok(())
            }
            Err(err) => {
                self.notifier.add_warning(text::RESEND_FAILURE);
                Err(err)
            }
        }
    }

    /// Resume a session from the configured resumption key, if present.
    ///
    /// Fetches the originally submitted details for display and puts the
    /// session straight into the waiting state, as if the form had just
    /// been submitted; the caller then drives `start_default`. Returns
    /// `Ok(false)` when there is nothing to resume.
    pub fn resume(&self) -> Result<bool, TrialError> {
        let Some(key) = self.config.resumption_key.clone() else {
            return Ok(false);
        };

        let trial_link = self.config.trial_url_for_key(&key);
        match self.service.fetch_details(&trial_link) {
            Ok(details) => {
                tracing::debug!(subscriber = %details.subscriber(), "resumed pending trial");
                self.session.begin_resumed(trial_link, key, details);
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not resume trial; cancelling session");
                self.session.cancel();
                Err(err)
            }
        }
    }

    /// The shared session state, for presentation adapters to read.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// The current configuration.
    pub fn config(&self) -> &TrialConfig {
        &self.config
    }
}
