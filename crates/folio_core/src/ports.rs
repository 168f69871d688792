//! Collaborator ports consumed by the listing and form screens.
//!
//! # Responsibility
//! - Describe the network-facing services as async traits.
//! - Define the collaborator error taxonomy surfaced to screen state.
//!
//! # Invariants
//! - Ports never mutate screen state; callers apply their results.
//! - Transport framing is an implementation concern of each adapter.

use crate::form::payload::SubmissionPayload;
use crate::model::draft::{DraftRecord, RecordId};
use crate::model::listing::{ListingPage, PageRequest};
use crate::model::tag::{SortRank, Tag};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Listing page load or record hydration failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Requested record does not exist.
    NotFound(RecordId),
    /// Source could not answer; retrying may succeed.
    Unavailable(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Unavailable(message) => write!(f, "source unavailable: {message}"),
        }
    }
}

impl Error for FetchError {}

/// Submission was rejected or could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceError {
    pub message: String,
}

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "record was not saved: {}", self.message)
    }
}

impl Error for PersistenceError {}

/// Remote tag mirror failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTagError {
    NotFound(SortRank),
    Rejected(String),
    /// Remote stored a tag that differs from the local one.
    Mismatch { expected: Tag, actual: Tag },
}

impl Display for RemoteTagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(rank) => write!(f, "remote tag not found for rank {rank}"),
            Self::Rejected(message) => write!(f, "remote tag change rejected: {message}"),
            Self::Mismatch { expected, actual } => write!(
                f,
                "remote stored tag {}@{}, expected {}@{}",
                actual.label, actual.sort_rank, expected.label, expected.sort_rank
            ),
        }
    }
}

impl Error for RemoteTagError {}

/// Paged item source backing an infinite listing.
#[async_trait]
pub trait ListingSource<T>: Send + Sync {
    async fn fetch_listing_page(&self, request: &PageRequest) -> Result<ListingPage<T>, FetchError>;
}

/// Record hydration and persistence for the project form.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    async fn fetch_record_by_id(&self, id: RecordId) -> Result<DraftRecord, FetchError>;
    /// Server-side defaults for a record that does not exist yet.
    async fn fetch_blank_record(&self) -> Result<DraftRecord, FetchError>;
    /// Persists the payload and returns the stored record id.
    async fn persist_record(&self, payload: &SubmissionPayload)
        -> Result<RecordId, PersistenceError>;
}

/// Tag collection a remote tag mutation applies to.
///
/// Saved records own their taggings; an unsaved draft gets a fresh key on
/// every form activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagScope {
    Record(RecordId),
    Draft(Uuid),
}

impl TagScope {
    pub fn new_draft() -> Self {
        Self::Draft(Uuid::new_v4())
    }
}

impl Display for TagScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Record(id) => write!(f, "record:{id}"),
            Self::Draft(key) => write!(f, "draft:{key}"),
        }
    }
}

/// Remote mirror of tag mutations made in the form.
#[async_trait]
pub trait TagGateway: Send + Sync {
    /// Stores `label` in `scope` and returns the tag as the remote ranked it.
    async fn create_tag_remote(&self, scope: TagScope, label: &str) -> Result<Tag, RemoteTagError>;
    async fn delete_tag_remote(
        &self,
        scope: TagScope,
        sort_rank: SortRank,
    ) -> Result<(), RemoteTagError>;
    /// Known labels offered as completions.
    async fn list_tag_suggestions(&self) -> Result<Vec<String>, FetchError>;
}
