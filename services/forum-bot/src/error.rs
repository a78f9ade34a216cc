//! Error taxonomy for forum operations
//!
//! Every variant is fatal for the current invocation. Nothing is retried.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// A single entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    /// GitHub error type, e.g. `NOT_FOUND` or `FORBIDDEN`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,
}

impl GraphQlError {
    pub fn is_not_found(&self) -> bool {
        self.kind.as_deref() == Some("NOT_FOUND")
    }
}

/// Errors that can occur while talking to the forum repository
#[derive(Debug, Error)]
pub enum ForumError {
    /// Private key file missing or unreadable
    #[error("Private key not found: {} ({reason})", .path.display())]
    CredentialsNotFound { path: PathBuf, reason: String },

    /// GitHub rejected the app credentials or installation id
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Neither the requested nor the default category exists
    #[error(
        "Category \"{requested}\" not found and default \"{default}\" is missing too (available: {})",
        .known.join(", ")
    )]
    CategoryNotFound {
        requested: String,
        default: String,
        known: Vec<String>,
    },

    /// Reply target does not exist in the repository
    #[error("Discussion #{0} not found")]
    DiscussionNotFound(u64),

    /// Configured repository does not exist or is not visible to the installation
    #[error("Repository {0} not found")]
    RepositoryNotFound(String),

    /// Network failure, timeout or non-success HTTP status
    #[error("Request failed: {0}")]
    Transport(String),

    /// The GraphQL endpoint answered with an `errors` array
    #[error("GraphQL error: {}", summarize(.0))]
    GraphQl(Vec<GraphQlError>),

    /// Response body did not match the expected schema
    #[error("Unexpected response from GitHub: {0}")]
    UnexpectedResponse(String),

    /// Missing or malformed configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or malformed command-line arguments
    #[error("{0}")]
    Usage(String),
}

fn summarize(errors: &[GraphQlError]) -> String {
    if errors.is_empty() {
        return "unknown error".to_string();
    }
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ForumError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Raw GraphQL error entries, if any, for diagnostic output
    pub fn graphql_errors(&self) -> Option<&[GraphQlError]> {
        match self {
            ForumError::GraphQl(errors) => Some(errors),
            _ => None,
        }
    }

    /// Whether this error belongs to the transport family
    /// (network, HTTP status, GraphQL errors, schema mismatch)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ForumError::Transport(_) | ForumError::GraphQl(_) | ForumError::UnexpectedResponse(_)
        )
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: std::time::Duration) -> Self {
        if err.is_timeout() {
            ForumError::Transport(format!("timed out after {:?}", timeout))
        } else if err.is_decode() {
            ForumError::UnexpectedResponse(err.to_string())
        } else {
            ForumError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ForumError>;
