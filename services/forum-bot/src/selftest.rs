//! Connection self-test
//!
//! Walks the authentication chain one stage at a time and stops at the
//! first failure. The throwaway discussion stage only runs on request.

use crate::auth::{Authenticator, Credentials};
use crate::config::ForumConfig;
use crate::discussions::ForumClient;
use crate::error::{ForumError, Result};
use crate::graphql::{self, GraphQlClient};
use tracing::{error, info};

pub const TEST_TITLE: &str = "🤖 LinkTrust AI bot identity test";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AppConnection,
    Installation,
    Repository,
    TestDiscussion,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::AppConnection => write!(f, "GitHub App connection"),
            Stage::Installation => write!(f, "Installation"),
            Stage::Repository => write!(f, "Repository access"),
            Stage::TestDiscussion => write!(f, "Test discussion"),
        }
    }
}

/// Outcome of one stage
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub passed: bool,
    /// Detail lines on success, the error message on failure
    pub details: Vec<String>,
}

impl StageReport {
    fn pass(stage: Stage, details: Vec<String>) -> Self {
        info!("✅ {}", stage);
        Self {
            stage,
            passed: true,
            details,
        }
    }

    fn fail(stage: Stage, err: &ForumError) -> Self {
        error!("❌ {}: {}", stage, err);
        Self {
            stage,
            passed: false,
            details: vec![err.to_string()],
        }
    }

    pub fn render(&self) -> String {
        let mark = if self.passed { "✅" } else { "❌" };
        let mut out = format!("{} {}", mark, self.stage);
        for line in &self.details {
            out.push_str("\n   ");
            out.push_str(line);
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelfTestReport {
    pub stages: Vec<StageReport>,
}

impl SelfTestReport {
    pub fn passed(&self) -> bool {
        !self.stages.is_empty() && self.stages.iter().all(|s| s.passed)
    }

    fn record(&mut self, stage: Stage, outcome: Result<Vec<String>>) -> bool {
        let report = match outcome {
            Ok(details) => StageReport::pass(stage, details),
            Err(err) => StageReport::fail(stage, &err),
        };
        let passed = report.passed;
        self.stages.push(report);
        passed
    }
}

/// Run the staged connection check
///
/// A missing private key is returned as an error before any stage runs.
pub async fn run(config: &ForumConfig, create_discussion: bool) -> Result<SelfTestReport> {
    let credentials = Credentials::from_config(config)?;
    let http = graphql::http_client(config.timeout)?;
    let auth = Authenticator::new(http.clone(), config, credentials);
    let mut report = SelfTestReport::default();

    info!("🔄 Testing GitHub App connection...");
    let outcome = auth.app_info().await.map(|app| {
        vec![
            format!("App Name: {}", app.name),
            format!("App ID: {}", app.id),
            format!("Created: {}", app.created_at.as_deref().unwrap_or("unknown")),
        ]
    });
    if !report.record(Stage::AppConnection, outcome) {
        return Ok(report);
    }

    info!("🔄 Verifying installation {}...", config.installation_id);
    let outcome = auth.installation_info().await.map(|installation| {
        let permissions: Vec<&str> = installation.permissions.keys().map(String::as_str).collect();
        vec![
            format!("Account: {}", installation.account.login),
            format!("Installation ID: {}", installation.id),
            format!("Permissions: {}", permissions.join(", ")),
        ]
    });
    if !report.record(Stage::Installation, outcome) {
        return Ok(report);
    }

    info!("🔄 Fetching repository {}...", config.repository);
    let client = match auth.installation_token().await {
        Ok(token) => {
            let graphql =
                GraphQlClient::new(http, config.graphql_url(), token.token, config.timeout);
            ForumClient::with_graphql(config.clone(), graphql)
        }
        Err(err) => {
            report.record(Stage::Repository, Err(err));
            return Ok(report);
        }
    };
    let directory = match client.categories().await {
        Ok(directory) => directory,
        Err(err) => {
            report.record(Stage::Repository, Err(err));
            return Ok(report);
        }
    };
    report.record(
        Stage::Repository,
        Ok(vec![
            format!("Repository: {}", config.repository),
            format!("Repository ID: {}", directory.repository_id()),
            format!("Categories: {}", directory.names().join(", ")),
        ]),
    );

    if !create_discussion {
        return Ok(report);
    }

    info!("🔄 Creating test discussion...");
    let outcome = match directory.lookup(&config.default_category, &config.default_category) {
        Ok(found) => {
            let body = client.attribution().sign(&test_body(config));
            client
                .create_discussion(&directory, &found.category.id, TEST_TITLE, &body)
                .await
                .map(|d| {
                    vec![
                        format!("Number: #{}", d.number),
                        format!("Title: {}", d.title),
                        format!("URL: {}", d.url),
                    ]
                })
        }
        Err(err) => Err(err),
    };
    report.record(Stage::TestDiscussion, outcome);

    Ok(report)
}

fn test_body(config: &ForumConfig) -> String {
    format!(
        "## Test post\n\n\
         Posted by the {} GitHub App to verify its identity.\n\n\
         ### Checks\n\
         - ✅ GitHub App authentication\n\
         - ✅ Installation token\n\
         - ✅ GraphQL API call\n\
         - ✅ Discussion creation\n\n\
         - Installation ID: {}\n\n\
         *Maintainers may delete this discussion once the test is done.*",
        config.bot_name, config.installation_id
    )
}
