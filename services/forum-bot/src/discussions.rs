//! Discussion Operations
//!
//! Each operation is at most one resolution query followed by at most one
//! mutation, against the repository named in the config.

use crate::auth::{Authenticator, Credentials};
use crate::categories::CategoryDirectory;
use crate::config::ForumConfig;
use crate::error::{ForumError, Result};
use crate::graphql::{self, GraphQlClient, GraphQlResponse};
use crate::queries::{
    self, AddDiscussionCommentData, AddDiscussionCommentInput, CreateDiscussionData,
    CreateDiscussionInput, CreatedComment, CreatedDiscussion, DiscussionNumber,
    DiscussionRepository, DiscussionSummary, DiscussionsRepository, MutationInput,
    RepositoryData, RepositoryPage,
};
use crate::signature::Attribution;
use tracing::{debug, info};

/// A new discussion as requested by the caller
#[derive(Debug, Clone)]
pub struct DiscussionRequest {
    pub title: String,
    /// Caller's body, before the attribution footer is appended
    pub body: String,
    /// Falls back to the configured default when `None`
    pub category: Option<String>,
}

impl DiscussionRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            category: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Installation-scoped client for the configured forum repository
pub struct ForumClient {
    config: ForumConfig,
    graphql: GraphQlClient,
    attribution: Attribution,
}

impl ForumClient {
    /// Load credentials, mint an installation token and build the client
    ///
    /// The private key is read before any request is sent.
    pub async fn connect(config: ForumConfig) -> Result<Self> {
        let credentials = Credentials::from_config(&config)?;
        let http = graphql::http_client(config.timeout)?;
        let auth = Authenticator::new(http.clone(), &config, credentials);

        info!(
            "🔐 Authenticating as GitHub App {} (installation: {})...",
            config.app_id, config.installation_id
        );
        let token = auth.installation_token().await?;
        debug!(expires_at = %token.expires_at, "Installation token issued");

        let graphql = GraphQlClient::new(
            http,
            config.graphql_url(),
            token.token,
            config.timeout,
        );
        Ok(Self::with_graphql(config, graphql))
    }

    /// Wrap an already-authenticated GraphQL client
    pub fn with_graphql(config: ForumConfig, graphql: GraphQlClient) -> Self {
        let attribution = Attribution::new(config.bot_name.clone(), Some(config.app_id.clone()));
        Self {
            config,
            graphql,
            attribution,
        }
    }

    pub fn config(&self) -> &ForumConfig {
        &self.config
    }

    pub fn attribution(&self) -> &Attribution {
        &self.attribution
    }

    /// Fetch the live category directory
    pub async fn categories(&self) -> Result<CategoryDirectory> {
        CategoryDirectory::fetch(
            &self.graphql,
            &self.config.repository,
            self.config.category_page_size,
        )
        .await
    }

    /// Most recent discussions, newest first
    pub async fn list(&self) -> Result<Vec<DiscussionSummary>> {
        let repo = &self.config.repository;
        info!("📋 Listing discussions from {}", repo);

        let data: RepositoryData<DiscussionsRepository> = self
            .graphql
            .execute(
                "RecentDiscussions",
                queries::RECENT_DISCUSSIONS,
                RepositoryPage {
                    owner: &repo.owner,
                    name: &repo.name,
                    first: self.config.list_page_size,
                },
            )
            .await?;

        let repository = data
            .repository
            .ok_or_else(|| ForumError::RepositoryNotFound(repo.to_string()))?;
        Ok(repository.discussions.nodes)
    }

    /// Create a discussion with the attribution footer appended
    pub async fn post(&self, request: &DiscussionRequest) -> Result<CreatedDiscussion> {
        let category_name = request
            .category
            .as_deref()
            .unwrap_or(&self.config.default_category);
        info!(title = %request.title, category = %category_name, "📝 Posting new discussion...");

        let directory = self.categories().await?;
        let category = directory
            .lookup(category_name, &self.config.default_category)?
            .category;

        let body = self.attribution.sign(&request.body);
        self.create_discussion(&directory, &category.id, &request.title, &body)
            .await
    }

    /// Send the create mutation with a body that is already final
    pub(crate) async fn create_discussion(
        &self,
        directory: &CategoryDirectory,
        category_id: &str,
        title: &str,
        body: &str,
    ) -> Result<CreatedDiscussion> {
        let data: CreateDiscussionData = self
            .graphql
            .execute(
                "CreateDiscussion",
                queries::CREATE_DISCUSSION,
                MutationInput {
                    input: CreateDiscussionInput {
                        repository_id: directory.repository_id(),
                        category_id,
                        title,
                        body,
                    },
                },
            )
            .await?;
        Ok(data.create_discussion.discussion)
    }

    /// Resolve a discussion number to its node id
    pub async fn discussion_id(&self, number: u64) -> Result<String> {
        let repo = &self.config.repository;
        let envelope: GraphQlResponse<RepositoryData<DiscussionRepository>> = self
            .graphql
            .send(
                "DiscussionId",
                queries::DISCUSSION_ID,
                DiscussionNumber {
                    owner: &repo.owner,
                    name: &repo.name,
                    num: number,
                },
            )
            .await?;

        // GitHub reports an unknown number or repository as a NOT_FOUND error
        // next to the null field; any other error is fatal as-is.
        if envelope.errors.iter().any(|e| !e.is_not_found()) {
            return Err(ForumError::GraphQl(envelope.errors));
        }

        let repository = envelope.data.and_then(|data| data.repository);
        match repository {
            Some(DiscussionRepository {
                discussion: Some(discussion),
            }) => {
                debug!(number, title = %discussion.title, "Resolved discussion");
                Ok(discussion.id)
            }
            Some(_) => Err(ForumError::DiscussionNotFound(number)),
            None => Err(ForumError::RepositoryNotFound(repo.to_string())),
        }
    }

    /// Add a comment to discussion `number`; the body is sent unchanged
    pub async fn reply(&self, number: u64, body: &str) -> Result<CreatedComment> {
        info!("💬 Replying to discussion #{}...", number);

        let discussion_id = self.discussion_id(number).await?;

        let data: AddDiscussionCommentData = self
            .graphql
            .execute(
                "AddDiscussionComment",
                queries::ADD_DISCUSSION_COMMENT,
                MutationInput {
                    input: AddDiscussionCommentInput {
                        discussion_id: &discussion_id,
                        body,
                    },
                },
            )
            .await?;
        Ok(data.add_discussion_comment.comment)
    }
}
