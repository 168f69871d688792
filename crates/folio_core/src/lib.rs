//! Screen-state core for the folio content manager.
//! Owns listing pagination and project form synchronization; network,
//! routing and rendering stay behind the collaborator ports.

pub mod backend;
pub mod config;
pub mod form;
pub mod listing;
pub mod logging;
pub mod model;
pub mod ports;
pub mod tags;

pub use backend::memory::MemoryBackend;
pub use config::{normalize_listing_limit, CoreConfig, ListingConfig, LoggingConfig};
pub use form::{
    FieldBinding, FieldChange, FieldControl, FormContext, FormError, FormMode, FormPhase,
    FormSynchronizer, SubmissionPayload, ValidationError,
};
pub use listing::{can_load_more, ListingContext, LoadOutcome, PaginationController, RecordStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::draft::{DraftField, DraftRecord, FieldValue, ImageAsset, RecordId};
pub use model::listing::{Generation, ListingPage, ListingState, PageRequest, SearchCriteria};
pub use model::post::{ItemId, PostSummary};
pub use model::tag::{SortRank, Tag};
pub use ports::{
    FetchError, ListingSource, PersistenceError, RecordGateway, RemoteTagError, TagGateway,
    TagScope,
};
pub use tags::{TagCollection, TagError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
