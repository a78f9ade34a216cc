//! GraphQL over HTTP
//!
//! Thin client for GitHub's v4 endpoint. Every response is decoded into an
//! explicit schema; shape mismatches surface as `UnexpectedResponse`.

use crate::auth::{API_VERSION, USER_AGENT};
use crate::error::{ForumError, GraphQlError, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// HTTP client shared by the REST and GraphQL calls of one invocation
pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ForumError::Transport(format!("Failed to build HTTP client: {}", e)))
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

/// Raw GraphQL envelope: `data` may be partially null alongside `errors`
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// Authenticated client for the GraphQL endpoint
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: Client,
    endpoint: String,
    token: String,
    timeout: Duration,
}

impl GraphQlClient {
    pub fn new(
        http: Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
            timeout,
        }
    }

    /// Send a document and return the envelope without interpreting `errors`
    pub async fn send<V, T>(
        &self,
        operation: &str,
        query: &str,
        variables: V,
    ) -> Result<GraphQlResponse<T>>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        debug!(operation, endpoint = %self.endpoint, "GraphQL request");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(|e| ForumError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ForumError::from_reqwest(e, self.timeout))?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ForumError::Authentication(format!(
                "GitHub API error ({}): {}",
                status, body
            )));
        }

        match serde_json::from_str::<GraphQlResponse<T>>(&body) {
            Ok(envelope) if status.is_success() || !envelope.errors.is_empty() => Ok(envelope),
            Err(e) if status.is_success() => Err(ForumError::UnexpectedResponse(format!(
                "{}: {}",
                operation, e
            ))),
            // A non-2xx `{"message": ...}` body still parses, as an empty envelope.
            _ => Err(ForumError::Transport(format!(
                "GitHub API error ({}): {}",
                status, body
            ))),
        }
    }

    /// Send a document and require a clean response: no errors, `data` present
    pub async fn execute<V, T>(&self, operation: &str, query: &str, variables: V) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let envelope = self.send(operation, query, variables).await?;
        if !envelope.errors.is_empty() {
            return Err(ForumError::GraphQl(envelope.errors));
        }
        envelope
            .data
            .ok_or_else(|| ForumError::UnexpectedResponse(format!("{}: missing data", operation)))
    }
}
