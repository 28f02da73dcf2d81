//! Shared test doubles for the service and persistence seams.

use crate::bridge::TokenStore;
use crate::client::{ProbeOutcome, TrialService};
use crate::protocol::models::{TokenGrant, TrialDetails, TrialRequest};
use crate::TrialError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

/// One scripted `fetch_status` response.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Pending(String),
    Confirmed { token: String, already_stored: bool },
    HardError(String),
    ProtocolError(String),
}

/// Outcome of a scripted `create_trial` call.
#[derive(Debug, Clone)]
pub(crate) enum CreateOutcome {
    Link(String),
    Validation(String),
    Internal,
}

type FetchHook = Box<dyn Fn(u32) + Send + Sync>;

/// Trial service scripted per test: `fetch_status` consumes `steps` in
/// order, then repeats `fallback` (or fails) once the script runs out.
pub(crate) struct ScriptedService {
    steps: Mutex<VecDeque<Step>>,
    fallback: Mutex<Option<Step>>,
    create: Mutex<CreateOutcome>,
    details: Mutex<Option<TrialDetails>>,
    resend_ok: AtomicBool,
    calls: AtomicU32,
    resends: AtomicU32,
    on_fetch: Mutex<Option<FetchHook>>,
}

impl ScriptedService {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            fallback: Mutex::new(None),
            create: Mutex::new(CreateOutcome::Link(
                "https://augur.example/public/v1/trials/abc123".to_string(),
            )),
            details: Mutex::new(Some(sample_details())),
            resend_ok: AtomicBool::new(true),
            calls: AtomicU32::new(0),
            resends: AtomicU32::new(0),
            on_fetch: Mutex::new(None),
        }
    }

    pub(crate) fn set_fallback(&self, step: Step) {
        *self.fallback.lock().unwrap() = Some(step);
    }

    pub(crate) fn set_create(&self, outcome: CreateOutcome) {
        *self.create.lock().unwrap() = outcome;
    }

    pub(crate) fn fail_details(&self) {
        *self.details.lock().unwrap() = None;
    }

    pub(crate) fn fail_resend(&self) {
        self.resend_ok.store(false, Ordering::SeqCst);
    }

    /// Install a hook invoked at the start of every `fetch_status` call,
    /// with the 1-based call number. Used to inject cancellation or
    /// reentrant starts while a probe is "in flight".
    pub(crate) fn set_on_fetch(&self, hook: impl Fn(u32) + Send + Sync + 'static) {
        *self.on_fetch.lock().unwrap() = Some(Box::new(hook));
    }

    /// Number of `fetch_status` calls so far.
    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of `resend` calls so far.
    pub(crate) fn resends(&self) -> u32 {
        self.resends.load(Ordering::SeqCst)
    }
}

impl TrialService for ScriptedService {
    fn create_trial(&self, _request: &TrialRequest) -> Result<String, TrialError> {
        match self.create.lock().unwrap().clone() {
            CreateOutcome::Link(link) => Ok(link),
            CreateOutcome::Validation(msg) => Err(TrialError::Validation(msg)),
            CreateOutcome::Internal => Err(TrialError::Internal),
        }
    }

    fn fetch_status(&self, _trial_link: &str) -> Result<ProbeOutcome, TrialError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(hook) = self.on_fetch.lock().unwrap().as_ref() {
            hook(call);
        }

        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.fallback.lock().unwrap().clone())
            .ok_or_else(|| TrialError::Protocol("script exhausted".to_string()))?;

        match step {
            Step::Pending(resend_link) => Ok(ProbeOutcome::Pending { resend_link }),
            Step::Confirmed {
                token,
                already_stored,
            } => Ok(ProbeOutcome::Confirmed(TokenGrant {
                token,
                token_retrieved: already_stored,
            })),
            Step::HardError(message) => Err(TrialError::Remote(message)),
            Step::ProtocolError(message) => Err(TrialError::Protocol(message)),
        }
    }

    fn fetch_details(&self, _trial_link: &str) -> Result<TrialDetails, TrialError> {
        self.details
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TrialError::Protocol("details unavailable".to_string()))
    }

    fn resend(&self, _resend_link: &str) -> Result<(), TrialError> {
        self.resends.fetch_add(1, Ordering::SeqCst);
        if self.resend_ok.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TrialError::Protocol("resend failed".to_string()))
        }
    }
}

/// Token store that records calls and can be told to fail.
#[derive(Default)]
pub(crate) struct RecordingStore {
    tokens: Mutex<Vec<String>>,
    trial_keys: Mutex<Vec<String>>,
    fail_token: AtomicBool,
    fail_trial_key: AtomicBool,
}

impl RecordingStore {
    pub(crate) fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    pub(crate) fn trial_keys(&self) -> Vec<String> {
        self.trial_keys.lock().unwrap().clone()
    }

    pub(crate) fn fail_token(&self) {
        self.fail_token.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_trial_key(&self) {
        self.fail_trial_key.store(true, Ordering::SeqCst);
    }
}

impl TokenStore for RecordingStore {
    fn store_token(&self, encoded_token: &str) -> Result<(), TrialError> {
        if self.fail_token.load(Ordering::SeqCst) {
            return Err(TrialError::Persistence("store_token failed".to_string()));
        }
        self.tokens.lock().unwrap().push(encoded_token.to_string());
        Ok(())
    }

    fn create_trial_key(&self, trial_key: &str) -> Result<(), TrialError> {
        if self.fail_trial_key.load(Ordering::SeqCst) {
            return Err(TrialError::Persistence(
                "create_trial_key failed".to_string(),
            ));
        }
        self.trial_keys.lock().unwrap().push(trial_key.to_string());
        Ok(())
    }
}

pub(crate) fn sample_details() -> TrialDetails {
    TrialDetails {
        company: Some("Acme".to_string()),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@acme.example".to_string(),
        starts_at: None,
        expires_at: None,
        user_count: None,
    }
}
