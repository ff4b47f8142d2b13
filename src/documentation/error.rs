use serde::Serialize;
use thiserror::Error;

use crate::admin::collaborators::Permission;

/// Failure category surfaced to the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Network,
    Server,
    Parse,
    Request,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Network => "network",
            FailureReason::Server => "server",
            FailureReason::Parse => "parse",
            FailureReason::Request => "request",
        }
    }
}

/// Error raised by a request against the documentation service
///
/// Holds rendered messages rather than the transport error itself so that a
/// failure can live inside `FetchState` and be cloned into every observer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server responded with status {status}{}", message_suffix(.message))]
    Server { status: u16, message: Option<String> },

    #[error("Invalid response: {0}")]
    Parse(String),

    /// Rejected before anything was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl FetchError {
    pub fn reason(&self) -> FailureReason {
        match self {
            FetchError::Network(_) => FailureReason::Network,
            FetchError::Server { .. } => FailureReason::Server,
            FetchError::Parse(_) => FailureReason::Parse,
            FetchError::InvalidRequest(_) => FailureReason::Request,
        }
    }
}

/// Mutating action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Regenerate,
    Delete,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Regenerate => "regenerate",
            ActionKind::Delete => "delete",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Cannot {requested} while {running} is in progress")]
    Conflict {
        requested: ActionKind,
        running: ActionKind,
    },

    #[error("Permission denied: {0}")]
    PermissionDenied(Permission),

    #[error("The current version {0} cannot be deleted")]
    CurrentVersion(String),

    #[error("Unknown documentation version: {0}")]
    UnknownVersion(String),

    #[error("No current documentation version is available")]
    NoCurrentVersion,

    #[error(transparent)]
    Request(#[from] FetchError),
}
