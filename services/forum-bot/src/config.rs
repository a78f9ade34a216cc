//! Forum Bot Configuration
//!
//! All settings come from command-line flags, each backed by an environment
//! variable. Secrets are never compiled in.

use crate::error::{ForumError, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REPOSITORY: &str = "link-trust/forum";
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_BOT_NAME: &str = "LinkTrust AI Assistant";

/// Target repository, parsed from `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn parse(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(ForumError::Config(format!(
                "Invalid repository format: {}. Expected: owner/repo",
                value
            ))),
        }
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Connection and behaviour flags shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// GitHub App ID
    #[arg(long, env = "GITHUB_APP_ID", global = true)]
    pub app_id: Option<String>,

    /// GitHub App Installation ID
    #[arg(long, env = "GITHUB_INSTALLATION_ID", global = true)]
    pub installation_id: Option<u64>,

    /// Path to the private key PEM file
    #[arg(long, env = "GITHUB_PRIVATE_KEY_PATH", global = true)]
    pub private_key_path: Option<PathBuf>,

    /// Repository hosting the discussions, in format owner/repo
    #[arg(long, env = "FORUM_REPOSITORY", default_value = DEFAULT_REPOSITORY, global = true)]
    pub repo: String,

    /// Category used when the requested one does not exist
    #[arg(long, env = "FORUM_DEFAULT_CATEGORY", default_value = DEFAULT_CATEGORY, global = true)]
    pub default_category: String,

    /// Number of discussions shown by `list`
    #[arg(long, env = "FORUM_LIST_PAGE_SIZE", default_value_t = 20, global = true)]
    pub list_page_size: u32,

    /// Number of discussion categories fetched per lookup
    #[arg(long, env = "FORUM_CATEGORY_PAGE_SIZE", default_value_t = 20, global = true)]
    pub category_page_size: u32,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "FORUM_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Name shown in the attribution footer of posted discussions
    #[arg(long, env = "FORUM_BOT_NAME", default_value = DEFAULT_BOT_NAME, global = true)]
    pub bot_name: String,
}

/// Validated configuration for one invocation
#[derive(Debug, Clone)]
pub struct ForumConfig {
    pub app_id: String,
    pub installation_id: u64,
    pub private_key_path: PathBuf,
    pub repository: RepositoryRef,
    pub default_category: String,
    pub list_page_size: u32,
    pub category_page_size: u32,
    pub api_url: String,
    pub timeout: Duration,
    pub bot_name: String,
}

impl ForumConfig {
    /// Config with library defaults for everything but the credentials
    pub fn new(
        app_id: impl Into<String>,
        installation_id: u64,
        private_key_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            installation_id,
            private_key_path: private_key_path.into(),
            repository: RepositoryRef {
                owner: "link-trust".to_string(),
                name: "forum".to_string(),
            },
            default_category: DEFAULT_CATEGORY.to_string(),
            list_page_size: 20,
            category_page_size: 20,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            bot_name: DEFAULT_BOT_NAME.to_string(),
        }
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.api_url.trim_end_matches('/'))
    }
}

impl TryFrom<ConnectionArgs> for ForumConfig {
    type Error = ForumError;

    fn try_from(args: ConnectionArgs) -> Result<Self> {
        let app_id = args
            .app_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| missing("--app-id", "GITHUB_APP_ID"))?;
        let installation_id = args
            .installation_id
            .ok_or_else(|| missing("--installation-id", "GITHUB_INSTALLATION_ID"))?;
        let private_key_path = args
            .private_key_path
            .ok_or_else(|| missing("--private-key-path", "GITHUB_PRIVATE_KEY_PATH"))?;

        if args.list_page_size == 0 || args.category_page_size == 0 {
            return Err(ForumError::Config(
                "page sizes must be greater than zero".to_string(),
            ));
        }
        if args.timeout_secs == 0 {
            return Err(ForumError::Config(
                "timeout must be at least one second".to_string(),
            ));
        }
        if args.default_category.trim().is_empty() {
            return Err(ForumError::Config(
                "default category must not be empty".to_string(),
            ));
        }

        Ok(Self {
            app_id,
            installation_id,
            private_key_path,
            repository: RepositoryRef::parse(&args.repo)?,
            default_category: args.default_category,
            list_page_size: args.list_page_size,
            category_page_size: args.category_page_size,
            api_url: args.api_url,
            timeout: Duration::from_secs(args.timeout_secs),
            bot_name: args.bot_name,
        })
    }
}

fn missing(flag: &str, env: &str) -> ForumError {
    ForumError::Config(format!("{} is required (or set {})", flag, env))
}
