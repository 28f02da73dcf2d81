//! Reqwest-based HTTP client for the trial service.
//!
//! Maps every non-2xx response into the crate's error taxonomy at the call
//! site; raw transport and parse errors never reach session state.

use crate::client::{ProbeOutcome, TrialService};
use crate::config::TrialConfig;
use crate::protocol::models::{
    parse_body, parse_error_body, TokenGrant, TrialCreated, TrialDetails, TrialRequest,
};
use crate::TrialError;
use reqwest::blocking::{Client, Response};
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;

/// HTTP client for the remote trial service.
pub struct AugurClient {
    client: Client,
    trials_url: String,
    user_agent: String,
}

impl AugurClient {
    /// Create a new client from config.
    pub fn new(config: &TrialConfig) -> Result<Self, TrialError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TrialError::Transport(format!("Failed to create client: {e}")))?;

        Ok(Self {
            client,
            trials_url: config.trials_url(),
            user_agent: build_user_agent(config),
        })
    }

    fn get(&self, url: &str) -> Result<(StatusCode, String), TrialError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .map_err(|e| TrialError::Transport(format!("Request failed: {e}")))?;
        read_response(response)
    }
}

impl TrialService for AugurClient {
    fn create_trial(&self, request: &TrialRequest) -> Result<String, TrialError> {
        let response = self
            .client
            .post(&self.trials_url)
            .header(USER_AGENT, &self.user_agent)
            .json(request)
            .send()
            .map_err(|e| TrialError::Transport(format!("Request failed: {e}")))?;
        let (status, body) = read_response(response)?;

        if status.is_success() {
            let created: TrialCreated = parse_body(&body)?;
            tracing::debug!(link = %created.links.self_link.href, "trial created");
            return Ok(created.links.self_link.href);
        }

        // 400/422 carry a user-facing description (duplicate email, bad data)
        if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::BAD_REQUEST {
            let description = parse_error_body(&body)
                .and_then(|e| e.description)
                .unwrap_or_else(|| "Trial request was rejected".to_string());
            return Err(TrialError::Validation(description));
        }

        tracing::warn!(status = %status, "trial creation failed");
        Err(TrialError::Internal)
    }

    fn fetch_status(&self, trial_link: &str) -> Result<ProbeOutcome, TrialError> {
        let (status, body) = self.get(trial_link)?;

        if status.is_success() {
            let grant: TokenGrant = parse_body(&body)?;
            return Ok(ProbeOutcome::Confirmed(grant));
        }

        if let Some(error) = parse_error_body(&body) {
            if error.is_waiting_for_verification() {
                let resend_link = error
                    .links
                    .resend
                    .map(|l| l.href)
                    .ok_or_else(|| {
                        TrialError::Protocol("waiting response without resend link".to_string())
                    })?;
                return Ok(ProbeOutcome::Pending { resend_link });
            }
            if error.kind.as_deref() == Some("Error") {
                return Err(TrialError::Remote(
                    error.message.unwrap_or_else(|| "Unknown error".to_string()),
                ));
            }
        }

        Err(TrialError::Protocol(format!(
            "Unexpected status {status} from trial status endpoint"
        )))
    }

    fn fetch_details(&self, trial_link: &str) -> Result<TrialDetails, TrialError> {
        let (status, body) = self.get(&format!("{trial_link}/details"))?;

        if status.is_success() {
            return parse_body(&body);
        }
        Err(TrialError::Protocol(format!(
            "Unexpected status {status} from trial details endpoint"
        )))
    }

    fn resend(&self, resend_link: &str) -> Result<(), TrialError> {
        let response = self
            .client
            .post(resend_link)
            .header(USER_AGENT, &self.user_agent)
            .json(&serde_json::json!({}))
            .send()
            .map_err(|e| TrialError::Transport(format!("Request failed: {e}")))?;
        let (status, _body) = read_response(response)?;

        if status.is_success() {
            tracing::debug!("confirmation email resent");
            Ok(())
        } else {
            Err(TrialError::Protocol(format!(
                "Unexpected status {status} from resend endpoint"
            )))
        }
    }
}

fn read_response(response: Response) -> Result<(StatusCode, String), TrialError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| TrialError::Transport(format!("Failed to read body: {e}")))?;
    Ok((status, body))
}

/// Build a User-Agent string from config.
///
/// Format: `<product>/trialflow-<version>`
pub fn build_user_agent(config: &TrialConfig) -> String {
    format!(
        "{}/trialflow-{}",
        config.user_agent_product,
        env!("CARGO_PKG_VERSION")
    )
}
