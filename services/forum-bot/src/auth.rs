//! GitHub App Authentication
//!
//! Signs an app JWT with the private key and exchanges it for a short-lived
//! installation access token. Nothing is cached; every invocation mints a
//! fresh token.

use crate::config::ForumConfig;
use crate::error::{ForumError, Result};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

pub(crate) const USER_AGENT: &str = "linktrust-forum-bot";
pub(crate) const API_VERSION: &str = "2022-11-28";

/// JWT claims for GitHub App authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct GitHubAppClaims {
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issuer (GitHub App ID)
    pub iss: String,
}

/// App identity loaded from disk for one invocation
#[derive(Clone)]
pub struct Credentials {
    pub app_id: String,
    pub installation_id: u64,
    private_key: Vec<u8>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("installation_id", &self.installation_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read the PEM private key from `path`
    pub fn load(app_id: &str, installation_id: u64, path: &Path) -> Result<Self> {
        let private_key = fs::read(path).map_err(|e| ForumError::CredentialsNotFound {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), "Loaded private key");

        Ok(Self {
            app_id: app_id.to_string(),
            installation_id,
            private_key,
        })
    }

    pub fn from_config(config: &ForumConfig) -> Result<Self> {
        Self::load(
            &config.app_id,
            config.installation_id,
            &config.private_key_path,
        )
    }

    pub fn jwt(&self) -> Result<String> {
        generate_jwt(&self.app_id, &self.private_key)
    }
}

/// Generate a JWT for GitHub App authentication
///
/// # Arguments
/// * `app_id` - The GitHub App ID
/// * `private_key_pem` - The private key in PEM format
///
/// # Returns
/// A JWT string valid for 10 minutes
pub fn generate_jwt(app_id: &str, private_key_pem: &[u8]) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ForumError::Authentication(format!("Failed to get current time: {}", e)))?
        .as_secs();

    let claims = GitHubAppClaims {
        iat: now.saturating_sub(60), // 60 seconds ago to account for clock skew
        exp: now + 600,              // Expires in 10 minutes
        iss: app_id.to_string(),
    };

    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem).map_err(|e| {
        ForumError::Authentication(format!("Failed to parse private key as RSA PEM: {}", e))
    })?;

    let header = Header::new(Algorithm::RS256);

    encode(&header, &claims, &encoding_key)
        .map_err(|e| ForumError::Authentication(format!("Failed to encode JWT: {}", e)))
}

/// Response from GitHub installation token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationToken {
    pub token: String,
    pub expires_at: String,
}

/// Response from `GET /app`
#[derive(Debug, Clone, Deserialize)]
pub struct AppInfo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallationAccount {
    pub login: String,
}

/// Response from `GET /app/installations/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationInfo {
    pub id: u64,
    pub account: InstallationAccount,
    #[serde(default)]
    pub permissions: BTreeMap<String, String>,
}

/// REST client authenticated as the GitHub App itself
pub struct Authenticator {
    http: Client,
    api_url: String,
    timeout: Duration,
    credentials: Credentials,
}

impl Authenticator {
    pub fn new(http: Client, config: &ForumConfig, credentials: Credentials) -> Self {
        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            credentials,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn github_headers(&self, request: RequestBuilder, jwt: &str) -> RequestBuilder {
        request
            .bearer_auth(jwt)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Exchange the app JWT for an installation access token
    pub async fn installation_token(&self) -> Result<InstallationToken> {
        let jwt = self.credentials.jwt()?;
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.api_url, self.credentials.installation_id
        );
        debug!(%url, "Requesting installation token");

        let request = self.github_headers(self.http.post(&url), &jwt);
        self.send_json(request).await
    }

    /// Fetch the app's own metadata, proving the JWT is accepted
    pub async fn app_info(&self) -> Result<AppInfo> {
        let jwt = self.credentials.jwt()?;
        let url = format!("{}/app", self.api_url);
        let request = self.github_headers(self.http.get(&url), &jwt);
        self.send_json(request).await
    }

    /// Fetch the configured installation
    pub async fn installation_info(&self) -> Result<InstallationInfo> {
        let jwt = self.credentials.jwt()?;
        let url = format!(
            "{}/app/installations/{}",
            self.api_url, self.credentials.installation_id
        );
        let request = self.github_headers(self.http.get(&url), &jwt);
        self.send_json(request).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ForumError::from_reqwest(e, self.timeout))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ForumError::Authentication(format!(
                "GitHub API error ({}): {}",
                status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ForumError::from_reqwest(e, self.timeout))
    }
}
