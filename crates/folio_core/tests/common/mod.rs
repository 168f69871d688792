#![allow(dead_code)]

use async_trait::async_trait;
use folio_core::{
    DraftRecord, FetchError, ListingPage, ListingSource, PageRequest, PersistenceError,
    RecordGateway, RecordId, RemoteTagError, SortRank, SubmissionPayload, Tag, TagCollection,
    TagGateway, TagScope,
};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Mutex;

/// Numbered items `0..total`; pages listed in `fail_once` fail on their first request.
pub struct NumberSource {
    total: u32,
    fail_once: Mutex<BTreeSet<u32>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl NumberSource {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            fail_once: Mutex::new(BTreeSet::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_once(total: u32, page: u32) -> Self {
        let source = Self::new(total);
        source.fail_once.lock().unwrap().insert(page);
        source
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn page(&self, page: u32, limit: u32) -> ListingPage<u32> {
        let start = (page - 1) * limit;
        let end = (start + limit).min(self.total);
        ListingPage {
            items: (start.min(end)..end).collect(),
            page,
            limit,
            total: self.total,
        }
    }
}

#[async_trait]
impl ListingSource<u32> for NumberSource {
    async fn fetch_listing_page(
        &self,
        request: &PageRequest,
    ) -> Result<ListingPage<u32>, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_once.lock().unwrap().remove(&request.page) {
            return Err(FetchError::Unavailable("connection reset".to_string()));
        }
        Ok(self.page(request.page, request.limit))
    }
}

/// Record gateway with scripted persistence results.
#[derive(Default)]
pub struct FakeRecords {
    records: Mutex<BTreeMap<RecordId, DraftRecord>>,
    persist_results: Mutex<VecDeque<Result<RecordId, PersistenceError>>>,
    persisted: Mutex<Vec<SubmissionPayload>>,
    blank_unavailable: bool,
}

impl FakeRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_blank_template() -> Self {
        Self {
            blank_unavailable: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, id: RecordId, record: DraftRecord) {
        self.records.lock().unwrap().insert(id, record);
    }

    pub fn push_persist_result(&self, result: Result<RecordId, PersistenceError>) {
        self.persist_results.lock().unwrap().push_back(result);
    }

    pub fn persisted(&self) -> Vec<SubmissionPayload> {
        self.persisted.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordGateway for FakeRecords {
    async fn fetch_record_by_id(&self, id: RecordId) -> Result<DraftRecord, FetchError> {
        self.records
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(FetchError::NotFound(id))
    }

    async fn fetch_blank_record(&self) -> Result<DraftRecord, FetchError> {
        if self.blank_unavailable {
            return Err(FetchError::Unavailable("template service down".to_string()));
        }
        let mut draft = DraftRecord::blank();
        draft.description = "<p></p>".to_string();
        Ok(draft)
    }

    async fn persist_record(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<RecordId, PersistenceError> {
        self.persisted.lock().unwrap().push(payload.clone());
        self.persist_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(payload.project.id.unwrap_or_else(uuid::Uuid::new_v4)))
    }
}

/// Tag gateway keeping one collection per scope; failures are configured per operation.
#[derive(Default)]
pub struct FakeTags {
    pub reject_create: bool,
    /// Added to every rank the remote reports back from a create.
    pub rank_skew: SortRank,
    pub delete_error: Option<RemoteTagError>,
    pub suggestions: Vec<String>,
    pub suggestions_unavailable: bool,
    pub created: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<SortRank>>,
    pub stored: Mutex<BTreeMap<TagScope, TagCollection>>,
}

impl FakeTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<SortRank> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn stored(&self, scope: TagScope) -> Vec<Tag> {
        self.stored
            .lock()
            .unwrap()
            .get(&scope)
            .map(|tags| tags.as_slice().to_vec())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TagGateway for FakeTags {
    async fn create_tag_remote(&self, scope: TagScope, label: &str) -> Result<Tag, RemoteTagError> {
        self.created.lock().unwrap().push(label.to_string());
        if self.reject_create {
            return Err(RemoteTagError::Rejected("tag service down".to_string()));
        }
        let mut stored = self.stored.lock().unwrap();
        let tags = stored.entry(scope).or_default();
        let rank = tags.next_rank().unwrap() + self.rank_skew;
        let tag = Tag::new(label, rank);
        let mut next = tags.as_slice().to_vec();
        next.push(tag.clone());
        *tags = TagCollection::from(next);
        Ok(tag)
    }

    async fn delete_tag_remote(
        &self,
        scope: TagScope,
        sort_rank: SortRank,
    ) -> Result<(), RemoteTagError> {
        self.deleted.lock().unwrap().push(sort_rank);
        if let Some(err) = &self.delete_error {
            return Err(err.clone());
        }
        let mut stored = self.stored.lock().unwrap();
        let tags = stored.entry(scope).or_default();
        *tags = tags
            .delete_tag(sort_rank)
            .map_err(|_| RemoteTagError::NotFound(sort_rank))?;
        Ok(())
    }

    async fn list_tag_suggestions(&self) -> Result<Vec<String>, FetchError> {
        if self.suggestions_unavailable {
            return Err(FetchError::Unavailable("suggestions down".to_string()));
        }
        Ok(self.suggestions.clone())
    }
}
