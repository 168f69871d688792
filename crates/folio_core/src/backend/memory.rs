//! In-memory backend implementing every collaborator port.
//!
//! # Invariants
//! - Listing pages are sliced after filtering; `total` counts filtered posts.
//! - Every tag scope has its own remote mirror. A record's mirror starts
//!   from its stored tags and is reset by hydration and persistence.

use crate::form::payload::SubmissionPayload;
use crate::model::draft::{DraftRecord, RecordId};
use crate::model::listing::{ListingPage, PageRequest, SearchCriteria};
use crate::model::post::PostSummary;
use crate::model::tag::{SortRank, Tag};
use crate::ports::{
    FetchError, ListingSource, PersistenceError, RecordGateway, RemoteTagError, TagGateway,
    TagScope,
};
use crate::tags::{TagCollection, TagError};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const SAMPLE_TAGS: [&str; 4] = ["rust", "web", "design", "tooling"];
const SAMPLE_EPOCH_MS: i64 = 1_700_000_000_000;
const SAMPLE_SPACING_MS: i64 = 86_400_000;

/// Process-local posts, projects and tag mirror.
#[derive(Default)]
pub struct MemoryBackend {
    posts: Vec<PostSummary>,
    projects: Mutex<BTreeMap<RecordId, DraftRecord>>,
    remote_tags: Mutex<BTreeMap<TagScope, TagCollection>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend listing `posts` in the given order.
    pub fn with_posts(posts: Vec<PostSummary>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    /// Backend with `count` generated posts, newest first, tagged round-robin.
    pub fn sample(count: usize) -> Self {
        let posts = (0..count)
            .map(|index| {
                let tag = SAMPLE_TAGS[index % SAMPLE_TAGS.len()];
                let offset = i64::try_from(index).unwrap_or(i64::MAX);
                PostSummary::new(
                    format!("Post {}", index + 1),
                    vec![tag.to_string()],
                    SAMPLE_EPOCH_MS.saturating_sub(offset.saturating_mul(SAMPLE_SPACING_MS)),
                )
            })
            .collect();
        Self::with_posts(posts)
    }

    /// Stores `record` as persisted and returns its id.
    pub fn insert_project(&self, mut record: DraftRecord) -> Result<RecordId, PersistenceError> {
        let id = *record.id.get_or_insert_with(Uuid::new_v4);
        lock(&self.projects)
            .map_err(PersistenceError::new)?
            .insert(id, record);
        Ok(id)
    }

    pub fn project(&self, id: RecordId) -> Option<DraftRecord> {
        lock(&self.projects).ok()?.get(&id).cloned()
    }

    /// Current state of the remote tag mirror of `scope`.
    pub fn remote_tags(&self, scope: TagScope) -> Vec<Tag> {
        let seed = self.scope_seed(scope);
        lock(&self.remote_tags)
            .map(|mirrors| mirrors.get(&scope).unwrap_or(&seed).as_slice().to_vec())
            .unwrap_or_default()
    }

    fn filtered_posts(&self, criteria: Option<&SearchCriteria>) -> Vec<&PostSummary> {
        self.posts
            .iter()
            .filter(|post| match criteria {
                None => true,
                Some(criteria) => matches_criteria(post, criteria),
            })
            .collect()
    }

    fn mirror_tags(&self, scope: TagScope, tags: TagCollection) -> Result<(), String> {
        lock(&self.remote_tags)?.insert(scope, tags);
        Ok(())
    }

    fn scope_seed(&self, scope: TagScope) -> TagCollection {
        match scope {
            TagScope::Record(id) => self
                .project(id)
                .map(|record| record.tags)
                .unwrap_or_default(),
            TagScope::Draft(_) => TagCollection::new(),
        }
    }

    /// Runs `change` against the mirror of `scope` and stores its result.
    fn change_mirror<R>(
        &self,
        scope: TagScope,
        change: impl FnOnce(&TagCollection) -> Result<(TagCollection, R), RemoteTagError>,
    ) -> Result<R, RemoteTagError> {
        let seed = self.scope_seed(scope);
        let mut mirrors = lock(&self.remote_tags).map_err(RemoteTagError::Rejected)?;
        let tags = mirrors.entry(scope).or_insert(seed);
        let (next, output) = change(tags)?;
        *tags = next;
        Ok(output)
    }
}

fn matches_criteria(post: &PostSummary, criteria: &SearchCriteria) -> bool {
    let tag_matches = criteria
        .tag
        .as_deref()
        .map_or(true, |tag| post.has_tag(tag));
    let keyword_matches = criteria.keyword.as_deref().map_or(true, |keyword| {
        post.title
            .to_lowercase()
            .contains(keyword.to_lowercase().as_str())
    });
    tag_matches && keyword_matches
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, String> {
    mutex
        .lock()
        .map_err(|_| "memory backend lock poisoned".to_string())
}

#[async_trait]
impl ListingSource<PostSummary> for MemoryBackend {
    async fn fetch_listing_page(
        &self,
        request: &PageRequest,
    ) -> Result<ListingPage<PostSummary>, FetchError> {
        let matching = self.filtered_posts(request.criteria.as_ref());
        let total = u32::try_from(matching.len())
            .map_err(|_| FetchError::Unavailable("listing total exceeds u32".to_string()))?;
        let limit = request.limit.max(1);
        let page = request.page.max(1);
        let offset = (page as usize - 1).saturating_mul(limit as usize);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(ListingPage {
            items,
            page,
            limit,
            total,
        })
    }
}

#[async_trait]
impl RecordGateway for MemoryBackend {
    async fn fetch_record_by_id(&self, id: RecordId) -> Result<DraftRecord, FetchError> {
        let record = lock(&self.projects)
            .map_err(FetchError::Unavailable)?
            .get(&id)
            .cloned()
            .ok_or(FetchError::NotFound(id))?;
        self.mirror_tags(TagScope::Record(id), record.tags.clone())
            .map_err(FetchError::Unavailable)?;
        Ok(record)
    }

    async fn fetch_blank_record(&self) -> Result<DraftRecord, FetchError> {
        Ok(DraftRecord::blank())
    }

    async fn persist_record(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<RecordId, PersistenceError> {
        let (id, record) = {
            let mut projects = lock(&self.projects).map_err(PersistenceError::new)?;
            let id = match payload.project.id {
                Some(id) if !projects.contains_key(&id) => {
                    return Err(PersistenceError::new(format!("project {id} does not exist")));
                }
                Some(id) => id,
                None => Uuid::new_v4(),
            };
            let record = payload.clone().into_record(id);
            projects.insert(id, record.clone());
            (id, record)
        };
        self.mirror_tags(TagScope::Record(id), record.tags)
            .map_err(PersistenceError::new)?;
        Ok(id)
    }
}

#[async_trait]
impl TagGateway for MemoryBackend {
    async fn create_tag_remote(&self, scope: TagScope, label: &str) -> Result<Tag, RemoteTagError> {
        self.change_mirror(scope, |tags| {
            let next = tags
                .add_tag(label)
                .map_err(|err| RemoteTagError::Rejected(err.to_string()))?;
            let created = next
                .last()
                .cloned()
                .ok_or_else(|| RemoteTagError::Rejected("tag was not stored".to_string()))?;
            Ok((next, created))
        })
    }

    async fn delete_tag_remote(
        &self,
        scope: TagScope,
        sort_rank: SortRank,
    ) -> Result<(), RemoteTagError> {
        self.change_mirror(scope, |tags| {
            let next = tags.delete_tag(sort_rank).map_err(|err| match err {
                TagError::NotFound(rank) => RemoteTagError::NotFound(rank),
                other => RemoteTagError::Rejected(other.to_string()),
            })?;
            Ok((next, ()))
        })
    }

    async fn list_tag_suggestions(&self) -> Result<Vec<String>, FetchError> {
        let labels: BTreeSet<&str> = self
            .posts
            .iter()
            .flat_map(|post| post.tags.iter().map(String::as_str))
            .collect();
        Ok(labels.into_iter().map(str::to_string).collect())
    }
}
