use crate::model::draft::{DraftField, DraftRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Message attached to a blank title.
pub const TITLE_REQUIRED_MESSAGE: &str = "Enter a title";
const URL_FORMAT_MESSAGE: &str = "Enter a URL starting with http:// or https://";

static HTTP_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/?#]+[^\s]*$").expect("valid url regex"));

/// User-correctable field problem that blocks submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: DraftField,
    pub message: String,
}

impl ValidationError {
    fn new(field: DraftField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Error for ValidationError {}

/// Validates one field in isolation.
///
/// Rules:
/// - `title` must not be blank.
/// - `sourceUrl`/`sampleUrl` must be http(s) URLs when not blank.
pub fn validate_field(draft: &DraftRecord, field: DraftField) -> Option<ValidationError> {
    match field {
        DraftField::Title if draft.title.trim().is_empty() => {
            Some(ValidationError::new(field, TITLE_REQUIRED_MESSAGE))
        }
        DraftField::SourceUrl => validate_optional_url(field, &draft.source_url),
        DraftField::SampleUrl => validate_optional_url(field, &draft.sample_url),
        _ => None,
    }
}

/// Validates every editable field, in form order.
pub fn validate_record(draft: &DraftRecord) -> Vec<ValidationError> {
    DraftField::EDITABLE
        .iter()
        .filter_map(|field| validate_field(draft, *field))
        .collect()
}

fn validate_optional_url(field: DraftField, value: &str) -> Option<ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || HTTP_URL_RE.is_match(trimmed) {
        None
    } else {
        Some(ValidationError::new(field, URL_FORMAT_MESSAGE))
    }
}
