//! Persistence bridge to the local application backend.
//!
//! Hands a confirmed token (and the pre-confirmation trial key) to the
//! local backend. Failures here are non-fatal to the confirmation flow:
//! the remote trial is the source of truth, local storage is bookkeeping.

use crate::config::TrialConfig;
use crate::TrialError;
use reqwest::blocking::Client;

/// Local token persistence operations.
pub trait TokenStore: Send + Sync {
    /// Store the confirmed license token.
    fn store_token(&self, encoded_token: &str) -> Result<(), TrialError>;

    /// Persist the trial key so a reload can resume the pending session.
    fn create_trial_key(&self, trial_key: &str) -> Result<(), TrialError>;
}

/// Token store backed by the credentialed admin endpoints.
pub struct AdminBackend {
    client: Client,
    enterprise_url: String,
    trial_key_url: String,
}

impl AdminBackend {
    /// Create a new backend bridge from config.
    pub fn new(config: &TrialConfig) -> Result<Self, TrialError> {
        // Session cookies carry the admin credentials.
        let client = Client::builder()
            .timeout(config.request_timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| TrialError::Transport(format!("Failed to create client: {e}")))?;

        let base = config.backend_base_path.trim_end_matches('/');
        Ok(Self {
            client,
            enterprise_url: format!("{base}/admin/enterprise"),
            trial_key_url: format!("{base}/admin/enterprise/create_trial_key"),
        })
    }

    fn post(&self, url: &str, body: serde_json::Value) -> Result<(), TrialError> {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .map_err(|e| TrialError::Persistence(format!("Request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TrialError::Persistence(format!(
                "Backend returned status {status}"
            )))
        }
    }
}

impl TokenStore for AdminBackend {
    fn store_token(&self, encoded_token: &str) -> Result<(), TrialError> {
        tracing::debug!("storing confirmed enterprise token");
        self.post(
            &self.enterprise_url,
            serde_json::json!({ "enterprise_token": { "encoded_token": encoded_token } }),
        )
    }

    fn create_trial_key(&self, trial_key: &str) -> Result<(), TrialError> {
        tracing::debug!("persisting trial key for resumption");
        self.post(
            &self.trial_key_url,
            serde_json::json!({ "trial_key": trial_key }),
        )
    }
}

/// Extract the trial key from a resend link.
///
/// The key is the path segment following `trials`, e.g.
/// `https://augur.example/public/v1/trials/abc123/resend` -> `abc123`.
pub fn trial_key_from_resend_link(resend_link: &str) -> Option<String> {
    let mut segments = resend_link.split('/');
    segments
        .by_ref()
        .find(|s| *s == "trials")
        .and_then(|_| segments.next())
        .filter(|key| !key.is_empty())
        .map(String::from)
}
