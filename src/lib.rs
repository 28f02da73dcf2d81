//! # Trialflow
//!
//! **Enterprise trial request and email-confirmation polling client.**
//!
//! Trialflow submits an enterprise trial request to the remote licensing
//! service, polls the returned trial link until the user confirms their
//! email address, and hands the resulting license token to the local
//! application backend for storage.
//!
//! ## Features
//!
//! - **Bounded polling** — strictly sequential status probes under an
//!   explicit retry budget (5 s x 60 by default, 5 s x 6 after a resend)
//! - **Cooperative cancellation** — `cancel` takes effect at the next
//!   scheduled check; in-flight results are discarded, never applied
//! - **Session resumption** — a persisted trial key lets a reloaded page
//!   pick up a pending confirmation without re-submitting the form
//! - **At-most-once persistence** — the confirmed token and the trial key
//!   are each handed to the backend at most once per session
//!
//! ## Quickstart
//!
//! ```no_run
//! use trialflow::{TrialConfig, TrialManager, TrialRequest};
//!
//! fn main() -> Result<(), trialflow::TrialError> {
//!     let manager = TrialManager::new(TrialConfig::new("https://myhost/op"))?;
//!
//!     manager.submit(&TrialRequest {
//!         company: "Acme".to_string(),
//!         first_name: "Ada".to_string(),
//!         last_name: "Lovelace".to_string(),
//!         email: "ada@acme.example".to_string(),
//!         domain: "acme.example".to_string(),
//!         general_consent: true,
//!         newsletter_consent: None,
//!     })?;
//!
//!     // Blocks until confirmed, cancelled, or the budget runs out.
//!     manager.start_default()?;
//!
//!     if manager.session().is_confirmed() {
//!         println!("Trial confirmed!");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error handling
//!
//! Remote failures are translated at the call site into [`TrialError`]
//! variants; raw transport or parse errors never reach the caller's UI
//! layer. Validation failures become inline error messages on the session,
//! unexpected server failures become warnings on the [`Notifier`] sink, and
//! a local persistence failure after remote confirmation is warned about
//! but never reverts the confirmed state.

#![deny(warnings)]
#![deny(missing_docs)]
#![doc(html_root_url = "https://docs.rs/trialflow/0.1.0")]

// Core modules
pub mod config;
pub mod errors;
pub mod pacing;

// Protocol layer
pub mod protocol;

// Client layer
pub mod client;

// Persistence bridge
pub mod bridge;

// Notification sink
pub mod notify;

// Session state and polling engine
pub mod poller;
pub mod session;

// Manager (main public API)
pub mod manager;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for public API
pub use bridge::{AdminBackend, TokenStore};
pub use client::{http::AugurClient, ProbeOutcome, TrialService};
pub use config::TrialConfig;
pub use errors::TrialError;
pub use manager::TrialManager;
pub use notify::{Notifier, TracingNotifier};
pub use pacing::{Pacer, SystemPacer};
pub use poller::ConfirmationPoller;
pub use protocol::models::{TokenGrant, TrialDetails, TrialRequest};
pub use session::{RetryBudget, SessionHandle, TrialStatus};

#[cfg(any(test, feature = "test-seams"))]
pub use notify::{RecordingNotifier, Severity};
#[cfg(any(test, feature = "test-seams"))]
pub use pacing::MockPacer;
