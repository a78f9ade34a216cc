//! Discussion category resolution
//!
//! The directory is fetched live once per invocation and passed by value to
//! whatever needs it. Keys are lowercased display names.

use crate::config::RepositoryRef;
use crate::error::{ForumError, Result};
use crate::graphql::GraphQlClient;
use crate::queries::{self, CategoryRepository, RepositoryData, RepositoryPage};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub emoji: String,
}

/// Outcome of a category lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMatch<'a> {
    pub category: &'a Category,
    /// True when the requested name was unknown and the default was used
    pub fell_back: bool,
}

/// Repository id plus its categories, keyed by lowercase name
#[derive(Debug, Clone)]
pub struct CategoryDirectory {
    repository_id: String,
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl CategoryDirectory {
    /// Build a directory; a later category whose lowercase name collides
    /// with an earlier one replaces it.
    pub fn new(repository_id: impl Into<String>, categories: Vec<Category>) -> Self {
        let mut index = HashMap::with_capacity(categories.len());
        for (position, category) in categories.iter().enumerate() {
            index.insert(category.name.to_lowercase(), position);
        }
        Self {
            repository_id: repository_id.into(),
            categories,
            index,
        }
    }

    /// Query the repository id and the first `page_size` categories
    pub async fn fetch(
        client: &GraphQlClient,
        repo: &RepositoryRef,
        page_size: u32,
    ) -> Result<Self> {
        let data: RepositoryData<CategoryRepository> = client
            .execute(
                "CategoryDirectory",
                queries::CATEGORY_DIRECTORY,
                RepositoryPage {
                    owner: &repo.owner,
                    name: &repo.name,
                    first: page_size,
                },
            )
            .await?;

        let repository = data
            .repository
            .ok_or_else(|| ForumError::RepositoryNotFound(repo.to_string()))?;

        let categories: Vec<Category> = repository
            .discussion_categories
            .nodes
            .into_iter()
            .map(|node| Category {
                id: node.id,
                name: node.name,
                emoji: node.emoji,
            })
            .collect();

        debug!(count = categories.len(), "Fetched discussion categories");
        Ok(Self::new(repository.id, categories))
    }

    pub fn repository_id(&self) -> &str {
        &self.repository_id
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Display names of the categories reachable through the index, in fetch order
    pub fn names(&self) -> Vec<String> {
        self.categories
            .iter()
            .enumerate()
            .filter(|(position, c)| self.index.get(&c.name.to_lowercase()) == Some(position))
            .map(|(_, c)| c.name.clone())
            .collect()
    }

    fn find(&self, name: &str) -> Option<&Category> {
        self.index
            .get(name)
            .or_else(|| self.index.get(&name.to_lowercase()))
            .map(|&position| &self.categories[position])
    }

    /// Resolve `name`, falling back to `default_name` when it is unknown
    pub fn lookup(&self, name: &str, default_name: &str) -> Result<CategoryMatch<'_>> {
        if let Some(category) = self.find(name) {
            return Ok(CategoryMatch {
                category,
                fell_back: false,
            });
        }

        warn!(
            "⚠️  Unknown category \"{}\", using default: {}",
            name, default_name
        );

        self.find(default_name)
            .map(|category| CategoryMatch {
                category,
                fell_back: true,
            })
            .ok_or_else(|| ForumError::CategoryNotFound {
                requested: name.to_string(),
                default: default_name.to_string(),
                known: self.names(),
            })
    }
}
