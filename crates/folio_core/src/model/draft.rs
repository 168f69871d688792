//! Draft project record edited by the project form.
//!
//! # Responsibility
//! - Hold the editable scalar fields and the owned tag collection.
//! - Map between `DraftField` keys and typed field values.
//!
//! # Invariants
//! - The tag collection is owned by exactly one draft; it is never shared.
//! - `id == None` means the draft has never been persisted.

use crate::tags::TagCollection;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a persisted project record.
pub type RecordId = Uuid;

/// Addressable part of a draft record.
///
/// `Tags` only scopes errors; it carries no scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Title,
    SourceUrl,
    SampleUrl,
    Image,
    Description,
    Tags,
}

impl DraftField {
    /// Scalar fields bound to editable controls, in form order.
    pub const EDITABLE: [DraftField; 5] = [
        DraftField::Title,
        DraftField::Description,
        DraftField::SourceUrl,
        DraftField::SampleUrl,
        DraftField::Image,
    ];

    /// Wire name used by submission payloads and error maps.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::SourceUrl => "sourceUrl",
            Self::SampleUrl => "sampleUrl",
            Self::Image => "image",
            Self::Description => "description",
            Self::Tags => "tags",
        }
    }
}

impl Display for DraftField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uploaded image reference. Opaque to the form; produced by an upload widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub file_name: String,
    /// URL or data URI understood by the persistence collaborator.
    pub source: String,
}

/// Typed value of one scalar field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Image(Option<ImageAsset>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            Self::Image(_) => None,
        }
    }

    /// Blank text or a missing image.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::Image(image) => image.is_none(),
        }
    }
}

/// Value did not match the kind of field it was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKindMismatch {
    pub field: DraftField,
}

impl Display for FieldKindMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "value kind does not match field `{}`", self.field)
    }
}

impl std::error::Error for FieldKindMismatch {}

/// In-progress edit of a new or persisted project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub sample_url: String,
    #[serde(default)]
    pub image: Option<ImageAsset>,
    /// Rich-text body, stored as the editor emits it.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: TagCollection,
}

impl DraftRecord {
    /// Blank draft for a record that does not exist yet.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Returns the current value of a scalar field, or `None` for `Tags`.
    pub fn field_value(&self, field: DraftField) -> Option<FieldValue> {
        let value = match field {
            DraftField::Title => FieldValue::Text(self.title.clone()),
            DraftField::SourceUrl => FieldValue::Text(self.source_url.clone()),
            DraftField::SampleUrl => FieldValue::Text(self.sample_url.clone()),
            DraftField::Description => FieldValue::Text(self.description.clone()),
            DraftField::Image => FieldValue::Image(self.image.clone()),
            DraftField::Tags => return None,
        };
        Some(value)
    }

    /// Replaces exactly one scalar field.
    pub fn set_field(
        &mut self,
        field: DraftField,
        value: FieldValue,
    ) -> Result<(), FieldKindMismatch> {
        match (field, value) {
            (DraftField::Title, FieldValue::Text(text)) => self.title = text,
            (DraftField::SourceUrl, FieldValue::Text(text)) => self.source_url = text,
            (DraftField::SampleUrl, FieldValue::Text(text)) => self.sample_url = text,
            (DraftField::Description, FieldValue::Text(text)) => self.description = text,
            (DraftField::Image, FieldValue::Image(image)) => self.image = image,
            (field, _) => return Err(FieldKindMismatch { field }),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DraftField, DraftRecord, FieldValue, ImageAsset};

    #[test]
    fn set_field_updates_only_target_field() {
        let mut draft = DraftRecord::blank();
        draft
            .set_field(DraftField::Title, FieldValue::Text("Portfolio".to_string()))
            .expect("title accepts text");
        assert_eq!(draft.title, "Portfolio");
        assert!(draft.source_url.is_empty());
        assert!(draft.description.is_empty());
    }

    #[test]
    fn set_field_rejects_mismatched_kinds() {
        let mut draft = DraftRecord::blank();
        let err = draft
            .set_field(DraftField::Image, FieldValue::Text("x".to_string()))
            .expect_err("image rejects text");
        assert_eq!(err.field, DraftField::Image);
        assert!(draft
            .set_field(DraftField::Tags, FieldValue::Text("x".to_string()))
            .is_err());
    }

    #[test]
    fn image_field_round_trips_through_field_value() {
        let mut draft = DraftRecord::blank();
        let image = ImageAsset {
            file_name: "cover.png".to_string(),
            source: "https://cdn.example.com/cover.png".to_string(),
        };
        draft
            .set_field(DraftField::Image, FieldValue::Image(Some(image.clone())))
            .expect("image accepts image");
        assert_eq!(
            draft.field_value(DraftField::Image),
            Some(FieldValue::Image(Some(image)))
        );
        assert_eq!(draft.field_value(DraftField::Tags), None);
    }

    #[test]
    fn wire_names_match_record_attributes() {
        assert_eq!(DraftField::SourceUrl.as_str(), "sourceUrl");
        assert_eq!(DraftField::SampleUrl.to_string(), "sampleUrl");
    }
}
