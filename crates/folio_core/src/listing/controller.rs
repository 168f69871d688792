use crate::config::ListingConfig;
use crate::listing::store::RecordStore;
use crate::model::listing::{Generation, ListingPage, ListingState, PageRequest, SearchCriteria};
use crate::ports::{FetchError, ListingSource};
use log::{debug, info, warn};
use std::sync::Arc;

/// Returns whether `state` has pages left: `total - limit * page > 0`.
pub fn can_load_more<T>(state: &ListingState<T>) -> bool {
    state.can_load_more()
}

/// Collaborators handed to a listing screen at construction.
pub struct ListingContext<T> {
    pub source: Arc<dyn ListingSource<T>>,
    pub config: ListingConfig,
}

impl<T> ListingContext<T> {
    pub fn new(source: Arc<dyn ListingSource<T>>, config: ListingConfig) -> Self {
        Self { source, config }
    }
}

/// What happened to one completed page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page merged into the store.
    Applied,
    /// Fetch failed; the store is unchanged.
    Failed(FetchError),
    /// Result belonged to a superseded query or an inactive screen and was dropped.
    Stale,
}

/// Drives page loads for one listing screen.
///
/// Event loops that run fetches themselves use the two-phase API: a `begin_*`
/// call returns the `PageRequest` to fetch, and `complete` applies its result.
/// The async `bootstrap`/`request_next`/`request_search` wrappers do both.
pub struct PaginationController<T> {
    context: ListingContext<T>,
    store: RecordStore<T>,
    generation: Generation,
    active: bool,
    bootstrapped: bool,
    page_loaded: bool,
    in_flight: Option<PageRequest>,
    criteria: Option<SearchCriteria>,
    last_error: Option<FetchError>,
}

impl<T: Clone> PaginationController<T> {
    pub fn new(context: ListingContext<T>) -> Self {
        let limit = context.config.limit;
        Self {
            context,
            store: RecordStore::new(limit),
            generation: 0,
            active: false,
            bootstrapped: false,
            page_loaded: false,
            in_flight: None,
            criteria: None,
            last_error: None,
        }
    }

    /// Activates the screen and returns its single bootstrap request.
    ///
    /// Returns `None` when the screen is already active; a screen gets
    /// exactly one bootstrap fetch per activation.
    pub fn activate(&mut self) -> Option<PageRequest> {
        self.activate_with(SearchCriteria::default())
    }

    /// Like `activate`, with the bootstrap fetch already filtered by `criteria`.
    pub fn activate_with(&mut self, criteria: SearchCriteria) -> Option<PageRequest> {
        if self.active {
            debug!(
                "event=listing_activate module=listing status=skipped reason=already_active generation={}",
                self.generation
            );
            return None;
        }

        self.active = true;
        self.criteria = Some(criteria).filter(|criteria| !criteria.is_empty());
        Some(self.start_query("bootstrap"))
    }

    /// Invalidates the current query; in-flight results are dropped on arrival.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.bootstrapped = false;
        self.in_flight = None;
        self.generation += 1;
        info!(
            "event=listing_deactivate module=listing status=ok generation={}",
            self.generation
        );
    }

    /// Returns the request for the next page, or `None` when no load is allowed.
    ///
    /// While the current query has no page merged yet (its first fetch
    /// failed), the next page is page 1 again.
    pub fn begin_next(&mut self) -> Option<PageRequest> {
        let skip_reason = if !self.active {
            Some("inactive")
        } else if !self.bootstrapped {
            Some("not_bootstrapped")
        } else if self.in_flight.is_some() {
            Some("in_flight")
        } else if self.page_loaded && !self.store.state().can_load_more() {
            Some("exhausted")
        } else {
            None
        };
        if let Some(reason) = skip_reason {
            debug!(
                "event=listing_next module=listing status=skipped reason={} page={}",
                reason,
                self.store.state().page
            );
            return None;
        }

        let state = self.store.state();
        let request = PageRequest {
            page: if self.page_loaded { state.page + 1 } else { 1 },
            limit: state.limit,
            criteria: self.criteria.clone(),
            generation: self.generation,
        };
        info!(
            "event=listing_next module=listing status=ok page={} limit={} retry={} generation={}",
            request.page,
            request.limit,
            !self.page_loaded,
            request.generation
        );
        self.in_flight = Some(request.clone());
        Some(request)
    }

    /// Starts a new query from page 1, discarding accumulated items.
    ///
    /// Any page fetch still in flight becomes stale.
    pub fn begin_search(&mut self, criteria: SearchCriteria) -> Option<PageRequest> {
        if !self.active {
            debug!("event=listing_search module=listing status=skipped reason=inactive");
            return None;
        }

        self.criteria = if criteria.is_empty() {
            None
        } else {
            Some(criteria)
        };
        Some(self.start_query("search"))
    }

    /// Applies the result of `request` if it still belongs to the current query.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        result: Result<ListingPage<T>, FetchError>,
    ) -> LoadOutcome {
        if self.in_flight.as_ref() != Some(request) {
            debug!(
                "event=listing_result module=listing status=skipped reason=stale page={} generation={} current_generation={}",
                request.page, request.generation, self.generation
            );
            return LoadOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.last_error = None;
                self.page_loaded = true;
                self.store.merge_page(page);
                LoadOutcome::Applied
            }
            Err(err) => {
                warn!(
                    "event=listing_result module=listing status=error page={} error={}",
                    request.page, err
                );
                self.last_error = Some(err.clone());
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Activates and loads page 1.
    ///
    /// Returns `None` once the screen is active, even when the bootstrap
    /// fetch failed; `request_next` retries that page instead.
    pub async fn bootstrap(&mut self) -> Option<LoadOutcome> {
        let request = self.activate()?;
        Some(self.run(request).await)
    }

    /// Activates and loads page 1 of `criteria`.
    pub async fn bootstrap_with(&mut self, criteria: SearchCriteria) -> Option<LoadOutcome> {
        let request = self.activate_with(criteria)?;
        Some(self.run(request).await)
    }

    /// Loads the next page when `can_load_more` allows it; otherwise a no-op.
    pub async fn request_next(&mut self) -> Option<LoadOutcome> {
        let request = self.begin_next()?;
        Some(self.run(request).await)
    }

    /// Replaces the listing with page 1 of `criteria`.
    pub async fn request_search(&mut self, criteria: SearchCriteria) -> Option<LoadOutcome> {
        let request = self.begin_search(criteria)?;
        Some(self.run(request).await)
    }

    async fn run(&mut self, request: PageRequest) -> LoadOutcome {
        let source = Arc::clone(&self.context.source);
        let result = source.fetch_listing_page(&request).await;
        self.complete(&request, result)
    }

    fn start_query(&mut self, trigger: &str) -> PageRequest {
        self.generation += 1;
        self.bootstrapped = true;
        self.page_loaded = false;
        self.last_error = None;
        self.store.reset(self.context.config.limit);

        let request = PageRequest {
            page: 1,
            limit: self.context.config.limit,
            criteria: self.criteria.clone(),
            generation: self.generation,
        };
        info!(
            "event=listing_query module=listing status=ok trigger={} limit={} filtered={} generation={}",
            trigger,
            request.limit,
            request.criteria.is_some(),
            request.generation
        );
        self.in_flight = Some(request.clone());
        request
    }

    pub fn can_load_more(&self) -> bool {
        can_load_more(self.store.state())
    }

    pub fn snapshot(&self) -> ListingState<T> {
        self.store.snapshot()
    }

    pub fn state(&self) -> &ListingState<T> {
        self.store.state()
    }

    /// True until the first non-empty page is merged.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn criteria(&self) -> Option<&SearchCriteria> {
        self.criteria.as_ref()
    }

    /// Error of the most recent failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }
}
