//! Post summary rendered by the infinite listing screen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one listed post.
pub type ItemId = Uuid;

/// Listing row for one published post.
///
/// Only `id` matters to pagination; the remaining fields are display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: ItemId,
    pub title: String,
    /// Tag labels; clicking one issues a tag search.
    pub tags: Vec<String>,
    /// Publish time in epoch milliseconds.
    pub published_at: i64,
}

impl PostSummary {
    /// Creates a summary with a generated id.
    pub fn new(title: impl Into<String>, tags: Vec<String>, published_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            tags,
            published_at,
        }
    }

    /// Returns whether the post carries `tag`, ignoring ASCII case.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|value| value.eq_ignore_ascii_case(tag))
    }
}
