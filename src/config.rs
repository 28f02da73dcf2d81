//! Trialflow configuration.

use std::time::Duration;

/// Default base URL of the remote trial service.
pub const DEFAULT_TRIAL_SERVICE_URL: &str = "https://augur.openproject-edge.com";

/// Configuration for the trial confirmation client.
///
/// All remote endpoints are derived from `trial_service_url`; local
/// persistence endpoints are derived from `backend_base_path`. The optional
/// `resumption_key` is the page-bootstrap value that lets a reloaded page
/// resume a pending session — it is injected here explicitly rather than
/// read from any ambient global state.
#[derive(Debug, Clone)]
pub struct TrialConfig {
    /// Base URL of the remote trial service (no trailing slash).
    pub trial_service_url: String,

    /// Base path of the local application backend (e.g. "https://host/op").
    pub backend_base_path: String,

    /// User-Agent product identifier (e.g. "openproject-admin").
    pub user_agent_product: String,

    /// Timeout applied to every remote request.
    pub request_timeout: Duration,

    /// Trial key persisted by an earlier session, if any.
    pub resumption_key: Option<String>,
}

impl TrialConfig {
    /// Create a configuration with default service URL and timeout.
    pub fn new(backend_base_path: impl Into<String>) -> Self {
        Self {
            trial_service_url: DEFAULT_TRIAL_SERVICE_URL.to_string(),
            backend_base_path: backend_base_path.into(),
            user_agent_product: "trialflow".to_string(),
            request_timeout: Duration::from_secs(30),
            resumption_key: None,
        }
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), crate::TrialError> {
        if !self.trial_service_url.starts_with("http") {
            return Err(crate::TrialError::Config(format!(
                "trial_service_url must be an absolute http(s) URL, got {:?}",
                self.trial_service_url
            )));
        }
        if self.trial_service_url.ends_with('/') {
            return Err(crate::TrialError::Config(
                "trial_service_url must not end with a slash".to_string(),
            ));
        }
        if self.backend_base_path.is_empty() {
            return Err(crate::TrialError::Config(
                "backend_base_path cannot be empty".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(crate::TrialError::Config(
                "request_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// URL of the trial-creation endpoint.
    pub fn trials_url(&self) -> String {
        format!("{}/public/v1/trials", self.trial_service_url)
    }

    /// URL of the trial identified by a resumption key.
    pub fn trial_url_for_key(&self, key: &str) -> String {
        format!("{}/public/v1/trials/{}", self.trial_service_url, key)
    }
}
