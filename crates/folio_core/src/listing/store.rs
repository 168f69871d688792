use crate::model::listing::{ListingPage, ListingState};
use log::debug;

/// Accumulated pages of the current listing query.
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    state: ListingState<T>,
}

impl<T: Clone> RecordStore<T> {
    pub fn new(limit: u32) -> Self {
        Self {
            state: ListingState::empty(limit),
        }
    }

    /// Merges one fetched page.
    ///
    /// The page is appended when `page_number` is exactly the page after the
    /// current one. Any other number (page 1, a repeat, a gap, or `0`) starts
    /// over with this page only, so replaying a result never duplicates items.
    pub fn merge(&mut self, items: Vec<T>, page_number: u32, limit: u32, total: u32) {
        let appends = page_number >= 2 && self.state.page.checked_add(1) == Some(page_number);
        let count = items.len();
        if appends {
            self.state.items.extend(items);
        } else {
            self.state.items = items;
        }

        self.state.page = page_number.max(1);
        self.state.limit = limit.max(1);
        self.state.total = total;
        debug!(
            "event=listing_merge module=listing status=ok mode={} page={} received={} items={} total={}",
            if appends { "append" } else { "replace" },
            self.state.page,
            count,
            self.state.items.len(),
            self.state.total
        );
    }

    /// Merges a page envelope returned by a listing source.
    pub fn merge_page(&mut self, page: ListingPage<T>) {
        self.merge(page.items, page.page, page.limit, page.total);
    }

    /// Drops every item and returns to the empty first-page state.
    pub fn reset(&mut self, limit: u32) {
        self.state = ListingState::empty(limit.max(1));
    }

    pub fn snapshot(&self) -> ListingState<T> {
        self.state.clone()
    }

    pub fn state(&self) -> &ListingState<T> {
        &self.state
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RecordStore;

    #[test]
    fn next_page_appends() {
        let mut store = RecordStore::new(2);
        store.merge(vec![1, 2], 1, 2, 5);
        store.merge(vec![3, 4], 2, 2, 5);
        let state = store.snapshot();
        assert_eq!(state.items, vec![1, 2, 3, 4]);
        assert_eq!(state.page, 2);
        assert_eq!(state.total, 5);
    }

    #[test]
    fn first_page_replaces_previous_query() {
        let mut store = RecordStore::new(2);
        store.merge(vec![1, 2], 1, 2, 5);
        store.merge(vec![3, 4], 2, 2, 5);
        store.merge(vec![9], 1, 2, 1);
        assert_eq!(store.snapshot().items, vec![9]);
        assert_eq!(store.snapshot().page, 1);
    }

    #[test]
    fn unexpected_page_numbers_reset_instead_of_appending() {
        let mut store = RecordStore::new(2);
        store.merge(vec![1, 2], 1, 2, 10);
        store.merge(vec![5, 6], 3, 2, 10);
        assert_eq!(store.snapshot().items, vec![5, 6]);

        store.merge(vec![5, 6], 3, 2, 10);
        assert_eq!(store.snapshot().items, vec![5, 6]);

        store.merge(vec![7], 0, 0, 10);
        let state = store.snapshot();
        assert_eq!(state.items, vec![7]);
        assert_eq!(state.page, 1);
        assert_eq!(state.limit, 1);
    }

    #[test]
    fn reset_empties_the_store() {
        let mut store = RecordStore::new(2);
        store.merge(vec![1, 2], 1, 2, 5);
        store.reset(4);
        assert!(store.is_empty());
        assert_eq!(store.snapshot().limit, 4);
        assert_eq!(store.snapshot().total, 0);
    }
}
