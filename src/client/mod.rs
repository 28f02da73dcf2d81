//! Remote trial service client.

pub mod http;

use crate::protocol::models::{TokenGrant, TrialDetails, TrialRequest};
use crate::TrialError;

/// Outcome of a single status probe against the trial link.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// Email confirmed; the token is available.
    Confirmed(TokenGrant),

    /// Email not yet verified; carries the resend-email link.
    Pending {
        /// Link that re-triggers the confirmation email.
        resend_link: String,
    },
}

/// The remote trial service operations.
///
/// Each operation is a single round trip with no internal retry: the retry
/// policy lives entirely in the confirmation poller. `AugurClient` is the
/// production implementation; tests script this trait directly.
pub trait TrialService: Send + Sync {
    /// Create a trial from the submitted form data, returning the trial link.
    fn create_trial(&self, request: &TrialRequest) -> Result<String, TrialError>;

    /// Probe the trial's confirmation status.
    fn fetch_status(&self, trial_link: &str) -> Result<ProbeOutcome, TrialError>;

    /// Fetch the subscriber details originally submitted with the trial.
    fn fetch_details(&self, trial_link: &str) -> Result<TrialDetails, TrialError>;

    /// Re-trigger the confirmation email.
    fn resend(&self, resend_link: &str) -> Result<(), TrialError>;
}
