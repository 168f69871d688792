//! Submission payload assembled from a validated draft.

use crate::model::draft::{DraftRecord, ImageAsset, RecordId};
use crate::model::tag::Tag;
use crate::tags::TagCollection;
use serde::{Deserialize, Serialize};

/// Request body handed to the persistence collaborator.
///
/// Serialized as `{"project": {...}}` with the tag collection under
/// `taggingsAttributes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub project: ProjectAttributes,
}

/// Scalar fields of the draft plus its tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    pub source_url: String,
    pub sample_url: String,
    pub image: Option<ImageAsset>,
    pub description: String,
    pub taggings_attributes: Vec<Tag>,
}

impl SubmissionPayload {
    pub fn from_draft(draft: &DraftRecord) -> Self {
        Self {
            project: ProjectAttributes {
                id: draft.id,
                title: draft.title.clone(),
                source_url: draft.source_url.clone(),
                sample_url: draft.sample_url.clone(),
                image: draft.image.clone(),
                description: draft.description.clone(),
                taggings_attributes: draft.tags.as_slice().to_vec(),
            },
        }
    }

    /// Rebuilds the persisted record shape under `id`.
    pub fn into_record(self, id: RecordId) -> DraftRecord {
        let project = self.project;
        DraftRecord {
            id: Some(id),
            title: project.title,
            source_url: project.source_url,
            sample_url: project.sample_url,
            image: project.image,
            description: project.description,
            tags: TagCollection::from(project.taggings_attributes),
        }
    }
}
