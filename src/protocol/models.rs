//! Trial service request/response structs and parsing.

use crate::TrialError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error identifier the service returns while the email is unverified.
pub const WAITING_IDENTIFIER: &str = "waiting_for_email_verification";

/// Form data submitted to create a trial.
#[derive(Debug, Clone, Serialize)]
pub struct TrialRequest {
    /// Company name.
    pub company: String,

    /// Requester first name.
    pub first_name: String,

    /// Requester last name.
    pub last_name: String,

    /// Email address the confirmation link is sent to.
    pub email: String,

    /// Instance domain the trial is bound to.
    pub domain: String,

    /// Consent to the terms of service; must be true.
    pub general_consent: bool,

    /// Optional newsletter opt-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newsletter_consent: Option<bool>,
}

impl TrialRequest {
    /// Check required fields before any network call is attempted.
    pub fn validate(&self) -> Result<(), TrialError> {
        for (field, value) in [
            ("company", &self.company),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("domain", &self.domain),
        ] {
            if value.trim().is_empty() {
                return Err(TrialError::Validation(format!("{field} is required")));
            }
        }
        if !is_well_formed_email(&self.email) {
            return Err(TrialError::Validation(
                "Invalid e-mail address".to_string(),
            ));
        }
        if !self.general_consent {
            return Err(TrialError::Validation(
                "general_consent is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loose structural check, enough to catch obvious typos before submission.
/// The service performs the authoritative validation.
fn is_well_formed_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
}

/// A hypermedia link.
#[derive(Debug, Clone, Deserialize)]
pub struct Href {
    /// Link target.
    pub href: String,
}

/// Links attached to a created trial.
#[derive(Debug, Clone, Deserialize)]
pub struct TrialCreatedLinks {
    /// The trial's own status endpoint.
    #[serde(rename = "self")]
    pub self_link: Href,
}

/// Response to a successful trial creation.
#[derive(Debug, Clone, Deserialize)]
pub struct TrialCreated {
    /// Hypermedia links.
    #[serde(rename = "_links")]
    pub links: TrialCreatedLinks,
}

/// Links attached to an error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorLinks {
    /// Resend-confirmation-email endpoint, present while unverified.
    #[serde(default)]
    pub resend: Option<Href>,
}

/// Error body shape used by the trial service for non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    /// User-facing description (validation failures).
    #[serde(default)]
    pub description: Option<String>,

    /// Machine-readable error identifier.
    #[serde(default)]
    pub identifier: Option<String>,

    /// Error type marker; "Error" indicates a hard server-side error.
    #[serde(rename = "_type", default)]
    pub kind: Option<String>,

    /// Server-provided error message.
    #[serde(default)]
    pub message: Option<String>,

    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: ApiErrorLinks,
}

impl ApiErrorBody {
    /// Whether this body reports the expected waiting-for-verification state.
    pub fn is_waiting_for_verification(&self) -> bool {
        self.identifier.as_deref() == Some(WAITING_IDENTIFIER)
    }
}

/// Token payload returned once the email was confirmed.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    /// The encoded license token.
    pub token: String,

    /// True when a previous poll already retrieved (and stored) this token.
    #[serde(default)]
    pub token_retrieved: bool,
}

/// Subscriber details submitted with the original request, re-fetched on
/// resumption to repopulate the display.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TrialDetails {
    /// Company name.
    #[serde(default)]
    pub company: Option<String>,

    /// Requester first name.
    pub first_name: String,

    /// Requester last name.
    pub last_name: String,

    /// Requester email address.
    pub email: String,

    /// Trial start, once active.
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,

    /// Trial expiry, once active.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// Licensed user count.
    #[serde(default)]
    pub user_count: Option<u32>,
}

impl TrialDetails {
    /// Display name of the subscriber.
    pub fn subscriber(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Parse a JSON body, mapping failures to `TrialError::Protocol`.
pub fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, TrialError> {
    serde_json::from_str(body)
        .map_err(|e| TrialError::Protocol(format!("Failed to parse response body: {e}")))
}

/// Parse an error body leniently; `None` when the body is not the
/// service's error shape at all.
pub fn parse_error_body(body: &str) -> Option<ApiErrorBody> {
    serde_json::from_str(body).ok()
}
