//! Tag value attached to a draft record.

use serde::{Deserialize, Serialize};

/// Stable per-collection tag key. Never compacted after deletion.
pub type SortRank = u32;

/// One tag in a record's ordered tag collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Display label, matched case-sensitively for duplicates.
    pub label: String,
    /// Position and identity within the owning collection.
    pub sort_rank: SortRank,
}

impl Tag {
    pub fn new(label: impl Into<String>, sort_rank: SortRank) -> Self {
        Self {
            label: label.into(),
            sort_rank,
        }
    }
}
