//! LinkTrust Forum Bot Library
//!
//! Rust client that posts to a repository's GitHub Discussions as a GitHub
//! App installation.
//!
//! ## Binaries
//!
//! - `forum`: list, post, reply and self-test commands
//!
//! ## Flow
//!
//! Every invocation re-authenticates from scratch:
//!
//! 1. Read the app private key and sign an RS256 JWT
//! 2. Exchange the JWT for an installation access token
//! 3. Resolve category or discussion ids live over GraphQL
//! 4. Issue a single query or mutation and print the result
//!
//! ## Example
//!
//! ```bash
//! GITHUB_APP_ID=2937684 \
//! GITHUB_INSTALLATION_ID=112126783 \
//! GITHUB_PRIVATE_KEY_PATH=./linktrust-ai.private-key.pem \
//! forum post "Hello" "Welcome all" "General"
//! ```

pub mod auth;
pub mod categories;
pub mod config;
pub mod discussions;
pub mod error;
pub mod graphql;
pub mod queries;
pub mod render;
pub mod selftest;
pub mod signature;

pub use categories::{Category, CategoryDirectory, CategoryMatch};
pub use config::{ConnectionArgs, ForumConfig, RepositoryRef};
pub use discussions::{DiscussionRequest, ForumClient};
pub use error::{ForumError, GraphQlError, Result};
