//! Project form: draft-to-field synchronization, validation and submission.
//!
//! # Responsibility
//! - Bind each draft field to an explicit `FieldBinding` for widgets.
//! - Validate per field on edit and per record on submit.
//! - Mirror tag edits remotely and hand the final payload to persistence.
//!
//! # Invariants
//! - A blank title never reaches the persistence collaborator.
//! - Failed operations leave the draft as it was and surface as form state.

mod binding;
pub mod payload;
mod synchronizer;
mod validation;

pub use binding::{FieldBinding, FieldChange, FieldControl};
pub use payload::{ProjectAttributes, SubmissionPayload};
pub use synchronizer::{FormContext, FormError, FormMode, FormPhase, FormSynchronizer};
pub use validation::{validate_field, validate_record, ValidationError, TITLE_REQUIRED_MESSAGE};
