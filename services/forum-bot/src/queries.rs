//! GraphQL documents and their response schemas
//!
//! [GitHub's v4 API Docs](https://docs.github.com/en/graphql/guides/using-the-graphql-api-for-discussions)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CATEGORY_DIRECTORY: &str = r#"
query CategoryDirectory($owner: String!, $name: String!, $first: Int!) {
  repository(owner: $owner, name: $name) {
    id
    discussionCategories(first: $first) {
      nodes {
        id
        name
        emoji
      }
    }
  }
}
"#;

pub const DISCUSSION_ID: &str = r#"
query DiscussionId($owner: String!, $name: String!, $num: Int!) {
  repository(owner: $owner, name: $name) {
    discussion(number: $num) {
      id
      title
    }
  }
}
"#;

pub const RECENT_DISCUSSIONS: &str = r#"
query RecentDiscussions($owner: String!, $name: String!, $first: Int!) {
  repository(owner: $owner, name: $name) {
    discussions(first: $first, orderBy: {field: CREATED_AT, direction: DESC}) {
      nodes {
        number
        title
        category {
          name
          emoji
        }
        author {
          login
        }
        comments {
          totalCount
        }
        createdAt
      }
    }
  }
}
"#;

pub const CREATE_DISCUSSION: &str = r#"
mutation CreateDiscussion($input: CreateDiscussionInput!) {
  createDiscussion(input: $input) {
    discussion {
      id
      number
      title
      url
      category {
        name
        emoji
      }
      author {
        login
      }
      createdAt
    }
  }
}
"#;

pub const ADD_DISCUSSION_COMMENT: &str = r#"
mutation AddDiscussionComment($input: AddDiscussionCommentInput!) {
  addDiscussionComment(input: $input) {
    comment {
      id
      url
    }
  }
}
"#;

// ============================================================
// Variables
// ============================================================

#[derive(Debug, Serialize)]
pub struct RepositoryPage<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub first: u32,
}

#[derive(Debug, Serialize)]
pub struct DiscussionNumber<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub num: u64,
}

#[derive(Debug, Serialize)]
pub struct MutationInput<T> {
    pub input: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionInput<'a> {
    pub repository_id: &'a str,
    pub category_id: &'a str,
    pub title: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDiscussionCommentInput<'a> {
    pub discussion_id: &'a str,
    pub body: &'a str,
}

// ============================================================
// Response Types
// ============================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryData<T> {
    pub repository: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRepository {
    pub id: String,
    pub discussion_categories: Nodes<CategoryNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscussionRepository {
    pub discussion: Option<DiscussionRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscussionRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscussionsRepository {
    pub discussions: Nodes<DiscussionSummary>,
}

/// Category as embedded in a discussion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabel {
    pub name: String,
    #[serde(default)]
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCount {
    pub total_count: u64,
}

/// One row of the discussion list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionSummary {
    pub number: u64,
    pub title: String,
    pub category: CategoryLabel,
    /// Null when the author's account was deleted
    pub author: Option<Actor>,
    pub comments: CommentCount,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionData {
    pub create_discussion: CreateDiscussionPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiscussionPayload {
    pub discussion: CreatedDiscussion,
}

/// Discussion returned by the create mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDiscussion {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub category: CategoryLabel,
    pub author: Option<Actor>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDiscussionCommentData {
    pub add_discussion_comment: AddDiscussionCommentPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddDiscussionCommentPayload {
    pub comment: CreatedComment,
}

/// Comment returned by the add-comment mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedComment {
    pub id: String,
    pub url: String,
}
