//! Terminal output for command results

use crate::queries::{Actor, CategoryLabel, CreatedComment, CreatedDiscussion, DiscussionSummary};

/// Longest title shown in the list table, in characters
pub const TITLE_WIDTH: usize = 30;

/// Shown in place of a deleted author
const GHOST: &str = "ghost";

pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn author(actor: &Option<Actor>) -> &str {
    actor.as_ref().map(|a| a.login.as_str()).unwrap_or(GHOST)
}

fn category(label: &CategoryLabel) -> String {
    if label.emoji.is_empty() {
        label.name.clone()
    } else {
        format!("{} {}", label.emoji, label.name)
    }
}

/// Markdown table of discussions
pub fn discussion_table(discussions: &[DiscussionSummary]) -> String {
    let mut out = String::from("| # | Title | Category | Author | Comments |\n");
    out.push_str("|---|-------|----------|--------|----------|\n");
    for d in discussions {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            d.number,
            truncate(&d.title, TITLE_WIDTH).replace('|', "\\|"),
            category(&d.category),
            author(&d.author),
            d.comments.total_count
        ));
    }
    out
}

pub fn created_discussion(d: &CreatedDiscussion) -> String {
    format!(
        "✅ Discussion created!\n   Number: #{}\n   Title: {}\n   Category: {}\n   Author: {}\n   Created: {}\n   URL: {}",
        d.number,
        d.title,
        category(&d.category),
        author(&d.author),
        d.created_at.format("%Y-%m-%d %H:%M UTC"),
        d.url
    )
}

pub fn created_comment(c: &CreatedComment) -> String {
    format!("✅ Comment added!\n   URL: {}", c.url)
}
