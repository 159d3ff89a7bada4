use std::fmt;

use thiserror::Error;

/// Failures of the harness itself, plus contract violations detected by
/// [`crate::rest::ApiResponse::expect`].
///
/// Error statuses returned by the service are not errors here: a `400` is an
/// ordinary response that scenarios assert on.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("harness error: transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("harness error: invalid request: {0}")]
    InvalidRequest(String),

    #[error("harness error: response body is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("harness error: invalid json path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("harness error: no value at `{0}`")]
    FieldNotFound(String),

    #[error("harness error: configuration: {0}")]
    Config(String),

    #[error("harness error: stub server: {0}")]
    Stub(String),

    #[error("contract violation: {0}")]
    Contract(ContractViolation),
}

impl HarnessError {
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, HarnessError::Contract(_))
    }
}

/// Structural mismatch between a response and its expected status line or
/// content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    Status {
        expected: u16,
        actual: u16,
        body: String,
    },
    ContentType {
        expected: String,
        actual: Option<String>,
    },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::Status {
                expected,
                actual,
                body,
            } => write!(f, "expected status {expected}, got {actual} (body: {body})"),
            ContractViolation::ContentType {
                expected,
                actual: Some(actual),
            } => write!(f, "expected content type {expected}, got {actual}"),
            ContractViolation::ContentType {
                expected,
                actual: None,
            } => write!(f, "expected content type {expected}, header missing"),
        }
    }
}
