use crate::model::tag::{SortRank, Tag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Tag operation failures. All of them are user-correctable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// Label is empty after trimming.
    InvalidLabel(String),
    /// Label already present (case-sensitive exact match).
    Duplicate(String),
    /// No tag with this rank.
    NotFound(SortRank),
    /// Highest rank already used; no rank left to assign.
    RankOverflow,
    /// Remote mirror rejected the change and the local change was rolled back.
    Remote(String),
}

impl Display for TagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLabel(value) => write!(f, "invalid tag label: `{value}`"),
            Self::Duplicate(label) => write!(f, "tag already added: `{label}`"),
            Self::NotFound(rank) => write!(f, "tag not found for rank {rank}"),
            Self::RankOverflow => write!(f, "no sort rank left to assign"),
            Self::Remote(message) => write!(f, "tag change was not saved: {message}"),
        }
    }
}

impl Error for TagError {}

/// Ordered, rank-keyed tags owned by one draft record.
///
/// Operations return a new collection and leave `self` untouched, so a caller
/// can keep the previous value for rollback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Tag>", into = "Vec<Tag>")]
pub struct TagCollection {
    tags: Vec<Tag>,
}

impl TagCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in ascending rank order.
    pub fn as_slice(&self) -> &[Tag] {
        &self.tags
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.label.as_str()).collect()
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.tags.iter().any(|tag| tag.label == label)
    }

    pub fn get(&self, rank: SortRank) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.sort_rank == rank)
    }

    /// Tag with the highest rank, i.e. the most recently added one.
    pub fn last(&self) -> Option<&Tag> {
        self.tags.last()
    }

    /// Rank the next added tag receives: `max + 1`, or `0` when empty.
    pub fn next_rank(&self) -> Result<SortRank, TagError> {
        match self.tags.last() {
            None => Ok(0),
            Some(tag) => tag.sort_rank.checked_add(1).ok_or(TagError::RankOverflow),
        }
    }

    /// Appends `label` with a fresh rank.
    ///
    /// # Errors
    /// - `InvalidLabel` when the trimmed label is empty.
    /// - `Duplicate` when the trimmed label is already present.
    pub fn add_tag(&self, label: &str) -> Result<Self, TagError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(TagError::InvalidLabel(label.to_string()));
        }
        if self.contains_label(trimmed) {
            return Err(TagError::Duplicate(trimmed.to_string()));
        }

        let rank = self.next_rank()?;
        let mut tags = self.tags.clone();
        tags.push(Tag::new(trimmed, rank));
        Ok(Self { tags })
    }

    /// Removes the tag holding `rank`. Other ranks are left as they are.
    pub fn delete_tag(&self, rank: SortRank) -> Result<Self, TagError> {
        let position = self
            .tags
            .iter()
            .position(|tag| tag.sort_rank == rank)
            .ok_or(TagError::NotFound(rank))?;

        let mut tags = self.tags.clone();
        tags.remove(position);
        Ok(Self { tags })
    }
}

impl From<Vec<Tag>> for TagCollection {
    /// Builds a collection from persisted tags.
    ///
    /// Sorts by rank; on a repeated rank or label the first occurrence wins.
    fn from(mut value: Vec<Tag>) -> Self {
        value.sort_by_key(|tag| tag.sort_rank);
        let mut ranks = BTreeSet::new();
        let mut labels = BTreeSet::new();
        value.retain(|tag| ranks.insert(tag.sort_rank) && labels.insert(tag.label.clone()));
        Self { tags: value }
    }
}

impl From<TagCollection> for Vec<Tag> {
    fn from(value: TagCollection) -> Self {
        value.tags
    }
}

#[cfg(test)]
mod tests {
    use super::{TagCollection, TagError};
    use crate::model::tag::Tag;
    use std::collections::BTreeSet;

    #[test]
    fn first_tag_gets_rank_zero_then_max_plus_one() {
        let tags = TagCollection::new()
            .add_tag("go")
            .and_then(|tags| tags.add_tag("rust"))
            .expect("distinct labels should be added");
        assert_eq!(
            tags.as_slice(),
            &[Tag::new("go", 0), Tag::new("rust", 1)]
        );
    }

    #[test]
    fn delete_does_not_compact_ranks() {
        let tags = TagCollection::new()
            .add_tag("go")
            .and_then(|tags| tags.add_tag("rust"))
            .and_then(|tags| tags.delete_tag(0))
            .expect("tag operations should succeed");
        assert_eq!(tags.as_slice(), &[Tag::new("rust", 1)]);

        let extended = tags.add_tag("zig").expect("zig should be added");
        assert_eq!(extended.last(), Some(&Tag::new("zig", 2)));
    }

    #[test]
    fn ranks_follow_the_maximum_after_deleting_the_top() {
        let tags = TagCollection::from(vec![Tag::new("a", 0), Tag::new("b", 4)])
            .delete_tag(4)
            .expect("rank 4 exists");
        assert_eq!(tags.next_rank(), Ok(1));
    }

    #[test]
    fn duplicate_label_fails_and_leaves_collection_unchanged() {
        let tags = TagCollection::new().add_tag("rust").expect("rust added");
        let before = tags.clone();
        let err = tags.add_tag("rust").expect_err("duplicate must fail");
        assert_eq!(err, TagError::Duplicate("rust".to_string()));
        assert_eq!(tags, before);
    }

    #[test]
    fn duplicate_check_is_case_sensitive() {
        let tags = TagCollection::new()
            .add_tag("Rust")
            .and_then(|tags| tags.add_tag("rust"))
            .expect("labels differing by case are distinct");
        assert_eq!(tags.labels(), vec!["Rust", "rust"]);
    }

    #[test]
    fn blank_label_is_rejected() {
        let err = TagCollection::new()
            .add_tag("   ")
            .expect_err("blank label must fail");
        assert!(matches!(err, TagError::InvalidLabel(_)));
    }

    #[test]
    fn deleting_missing_rank_fails() {
        let tags = TagCollection::new().add_tag("go").expect("go added");
        assert_eq!(tags.delete_tag(7), Err(TagError::NotFound(7)));
    }

    #[test]
    fn add_then_delete_restores_label_set() {
        let original = TagCollection::from(vec![Tag::new("web", 3), Tag::new("cli", 1)]);
        let added = original.add_tag("wasm").expect("wasm added");
        let rank = added.last().expect("new tag present").sort_rank;
        let restored = added.delete_tag(rank).expect("new tag removable");

        let before: BTreeSet<&str> = original.labels().into_iter().collect();
        let after: BTreeSet<&str> = restored.labels().into_iter().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn rank_overflow_is_reported() {
        let tags = TagCollection::from(vec![Tag::new("max", u32::MAX)]);
        assert_eq!(tags.add_tag("next"), Err(TagError::RankOverflow));
    }

    #[test]
    fn persisted_tags_are_sorted_and_deduplicated() {
        let tags = TagCollection::from(vec![
            Tag::new("b", 2),
            Tag::new("a", 0),
            Tag::new("dup-rank", 2),
            Tag::new("a", 5),
        ]);
        assert_eq!(tags.as_slice(), &[Tag::new("a", 0), Tag::new("b", 2)]);
    }
}
