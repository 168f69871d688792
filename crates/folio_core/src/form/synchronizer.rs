use crate::form::binding::{FieldBinding, FieldChange, FieldControl};
use crate::form::payload::SubmissionPayload;
use crate::form::validation::{validate_field, validate_record, ValidationError};
use crate::model::draft::{DraftField, DraftRecord, FieldKindMismatch, RecordId};
use crate::model::tag::{SortRank, Tag};
use crate::ports::{
    FetchError, PersistenceError, RecordGateway, RemoteTagError, TagGateway, TagScope,
};
use crate::tags::{TagCollection, TagError};
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Lifecycle of one form screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Constructed, not activated yet.
    Empty,
    /// Waiting for an existing record (or showing its load error).
    Loading,
    /// Fields bound and editable.
    Ready,
    /// Validated payload handed to persistence.
    Submitting,
    /// Saved or navigated away; the draft is gone.
    Closed,
}

impl FormPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Submitting => "submitting",
            Self::Closed => "closed",
        }
    }
}

/// Whether the form creates a record or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

impl FormMode {
    pub fn heading(self) -> &'static str {
        match self {
            Self::Create => "Create New Project",
            Self::Update => "Update Project",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
        }
    }
}

/// Form-boundary failure. Every variant is also reflected in the
/// synchronizer's visible state, so callers may ignore the return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Operation is not accepted in the current phase.
    NotEditable(FormPhase),
    ValueMismatch(FieldKindMismatch),
    Tag(TagError),
    Invalid(Vec<ValidationError>),
    Persistence(PersistenceError),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEditable(phase) => {
                write!(f, "form does not accept changes while {}", phase.as_str())
            }
            Self::ValueMismatch(err) => write!(f, "{err}"),
            Self::Tag(err) => write!(f, "{err}"),
            Self::Invalid(errors) => write!(f, "{} field(s) need attention", errors.len()),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ValueMismatch(err) => Some(err),
            Self::Tag(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::NotEditable(_) | Self::Invalid(_) => None,
        }
    }
}

impl From<FieldKindMismatch> for FormError {
    fn from(value: FieldKindMismatch) -> Self {
        Self::ValueMismatch(value)
    }
}

impl From<TagError> for FormError {
    fn from(value: TagError) -> Self {
        Self::Tag(value)
    }
}

/// Collaborators handed to a form screen at construction.
#[derive(Clone)]
pub struct FormContext {
    pub records: Arc<dyn RecordGateway>,
    pub tags: Arc<dyn TagGateway>,
}

impl FormContext {
    pub fn new(records: Arc<dyn RecordGateway>, tags: Arc<dyn TagGateway>) -> Self {
        Self { records, tags }
    }
}

/// Binds one draft record to editable fields and carries it to persistence.
pub struct FormSynchronizer {
    context: FormContext,
    phase: FormPhase,
    mode: FormMode,
    target: Option<RecordId>,
    tag_scope: TagScope,
    draft: DraftRecord,
    errors: BTreeMap<DraftField, String>,
    touched: BTreeSet<DraftField>,
    form_error: Option<String>,
    load_error: Option<FetchError>,
    suggestions: Vec<String>,
    saved_id: Option<RecordId>,
}

impl FormSynchronizer {
    pub fn new(context: FormContext) -> Self {
        Self {
            context,
            phase: FormPhase::Empty,
            mode: FormMode::Create,
            target: None,
            tag_scope: TagScope::new_draft(),
            draft: DraftRecord::blank(),
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
            form_error: None,
            load_error: None,
            suggestions: Vec::new(),
            saved_id: None,
        }
    }

    /// Activates the screen for record `id`, or for a new record.
    ///
    /// With an id the form passes through `Loading` and reaches `Ready` once
    /// hydration succeeds; on failure it stays in `Loading` with
    /// `load_error()` set. Without an id it goes straight to `Ready`.
    pub async fn activate(&mut self, id: Option<RecordId>) -> Result<(), FormError> {
        if self.phase == FormPhase::Submitting {
            return Err(FormError::NotEditable(self.phase));
        }

        self.reset_draft();
        self.saved_id = None;
        self.target = id;
        self.tag_scope = match id {
            Some(record_id) => TagScope::Record(record_id),
            None => TagScope::new_draft(),
        };
        match id {
            Some(record_id) => {
                self.mode = FormMode::Update;
                self.phase = FormPhase::Loading;
                info!(
                    "event=form_activate module=form status=ok mode=update record_id={}",
                    record_id
                );
                self.hydrate(record_id).await;
            }
            None => {
                self.mode = FormMode::Create;
                let records = Arc::clone(&self.context.records);
                self.draft = match records.fetch_blank_record().await {
                    Ok(mut draft) => {
                        draft.id = None;
                        draft
                    }
                    Err(err) => {
                        warn!(
                            "event=form_activate module=form status=error mode=create fallback=local_blank error={}",
                            err
                        );
                        DraftRecord::blank()
                    }
                };
                self.phase = FormPhase::Ready;
                info!("event=form_activate module=form status=ok mode=create");
            }
        }

        self.refresh_suggestions().await;
        Ok(())
    }

    /// Re-issues a failed hydration.
    pub async fn retry_hydration(&mut self) -> Result<(), FormError> {
        match (self.phase, self.target) {
            (FormPhase::Loading, Some(record_id)) => {
                self.hydrate(record_id).await;
                if self.phase == FormPhase::Ready {
                    self.refresh_suggestions().await;
                }
                Ok(())
            }
            (phase, _) => Err(FormError::NotEditable(phase)),
        }
    }

    /// Discards the draft when the screen is left.
    pub fn deactivate(&mut self) {
        self.reset_draft();
        self.target = None;
        self.phase = FormPhase::Closed;
        debug!("event=form_deactivate module=form status=ok");
    }

    async fn hydrate(&mut self, record_id: RecordId) {
        let records = Arc::clone(&self.context.records);
        match records.fetch_record_by_id(record_id).await {
            Ok(mut record) => {
                record.id = Some(record_id);
                self.draft = record;
                self.load_error = None;
                self.phase = FormPhase::Ready;
                info!(
                    "event=form_hydrate module=form status=ok record_id={} tags={}",
                    record_id,
                    self.draft.tags.len()
                );
            }
            Err(err) => {
                warn!(
                    "event=form_hydrate module=form status=error record_id={} error={}",
                    record_id, err
                );
                self.load_error = Some(err);
            }
        }
    }

    async fn refresh_suggestions(&mut self) {
        let tags = Arc::clone(&self.context.tags);
        match tags.list_tag_suggestions().await {
            Ok(suggestions) => self.suggestions = suggestions,
            Err(err) => {
                warn!(
                    "event=tag_suggestions module=form status=error error={}",
                    err
                );
                self.suggestions.clear();
            }
        }
    }

    /// Applies one widget change and re-validates that field only.
    pub fn edit(&mut self, change: FieldChange) -> Result<(), FormError> {
        self.ensure_ready()?;
        let FieldChange { field, value } = change;
        self.draft.set_field(field, value)?;
        self.touched.insert(field);
        match validate_field(&self.draft, field) {
            Some(err) => {
                self.errors.insert(field, err.message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
        Ok(())
    }

    /// Renders `field` into `control` and applies the change it reports.
    ///
    /// Returns whether a change was applied.
    pub fn drive(
        &mut self,
        control: &mut dyn FieldControl,
        field: DraftField,
    ) -> Result<bool, FormError> {
        let Some(binding) = self.binding(field) else {
            return Ok(false);
        };
        control.render(&binding);
        let Some(value) = control.take_change() else {
            return Ok(false);
        };

        self.edit(binding.change(value))?;
        if let Some(updated) = self.binding(field) {
            control.render(&updated);
        }
        Ok(true)
    }

    /// Binding for a scalar field; `None` for `DraftField::Tags`.
    pub fn binding(&self, field: DraftField) -> Option<FieldBinding> {
        let value = self.draft.field_value(field)?;
        Some(FieldBinding {
            field,
            value,
            error: self.errors.get(&field).cloned(),
            touched: self.touched.contains(&field),
        })
    }

    /// Bindings of every editable field, in form order.
    pub fn bindings(&self) -> Vec<FieldBinding> {
        DraftField::EDITABLE
            .iter()
            .filter_map(|field| self.binding(*field))
            .collect()
    }

    /// Adds a tag locally, then mirrors it remotely.
    ///
    /// Duplicate or blank labels leave the draft unchanged. A remote failure
    /// rolls the local add back, as does a remote tag whose label or rank
    /// differs from the local one; that remote copy is deleted again. All of
    /// these surface as the `tags` field error.
    pub async fn add_tag(&mut self, label: &str) -> Result<Tag, FormError> {
        self.ensure_ready()?;
        let previous = self.draft.tags.clone();
        let next = match previous.add_tag(label) {
            Ok(next) => next,
            Err(err) => return Err(self.tag_failure(err)),
        };
        let Some(added) = next.last().cloned() else {
            return Err(self.tag_failure(TagError::InvalidLabel(label.to_string())));
        };

        self.draft.tags = next;
        self.errors.remove(&DraftField::Tags);
        let tags = Arc::clone(&self.context.tags);
        match tags.create_tag_remote(self.tag_scope, &added.label).await {
            Ok(stored) if stored == added => {
                debug!(
                    "event=tag_add module=form status=ok sort_rank={} tags={}",
                    added.sort_rank,
                    self.draft.tags.len()
                );
                Ok(added)
            }
            Ok(stored) => {
                self.draft.tags = previous;
                self.discard_remote_tag(&stored).await;
                let err = RemoteTagError::Mismatch {
                    expected: added,
                    actual: stored,
                };
                Err(self.tag_failure(TagError::Remote(err.to_string())))
            }
            Err(err) => {
                self.draft.tags = previous;
                Err(self.tag_failure(TagError::Remote(err.to_string())))
            }
        }
    }

    async fn discard_remote_tag(&self, stored: &Tag) {
        let tags = Arc::clone(&self.context.tags);
        if let Err(err) = tags.delete_tag_remote(self.tag_scope, stored.sort_rank).await {
            warn!(
                "event=tag_add module=form status=error action=discard_remote scope={} sort_rank={} error={}",
                self.tag_scope, stored.sort_rank, err
            );
        }
    }

    /// Deletes the tag at `sort_rank` locally, then mirrors it remotely.
    ///
    /// A remote `NotFound` confirms the deletion; any other remote failure
    /// restores the tag.
    pub async fn delete_tag(&mut self, sort_rank: SortRank) -> Result<(), FormError> {
        self.ensure_ready()?;
        let previous = self.draft.tags.clone();
        let next = match previous.delete_tag(sort_rank) {
            Ok(next) => next,
            Err(err) => return Err(self.tag_failure(err)),
        };

        self.draft.tags = next;
        self.errors.remove(&DraftField::Tags);
        let tags = Arc::clone(&self.context.tags);
        match tags.delete_tag_remote(self.tag_scope, sort_rank).await {
            Ok(()) | Err(RemoteTagError::NotFound(_)) => {
                debug!(
                    "event=tag_delete module=form status=ok sort_rank={} tags={}",
                    sort_rank,
                    self.draft.tags.len()
                );
                Ok(())
            }
            Err(err) => {
                self.draft.tags = previous;
                Err(self.tag_failure(TagError::Remote(err.to_string())))
            }
        }
    }

    fn tag_failure(&mut self, err: TagError) -> FormError {
        debug!("event=tag_change module=form status=error error_kind={}", tag_error_kind(&err));
        self.errors.insert(DraftField::Tags, err.to_string());
        FormError::Tag(err)
    }

    /// Validates the whole record and moves to `Submitting`.
    ///
    /// On validation failure the form stays `Ready` with every error attached
    /// and all fields marked touched.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, FormError> {
        self.ensure_ready()?;
        self.touched.extend(DraftField::EDITABLE);
        self.form_error = None;

        let failures = validate_record(&self.draft);
        self.errors.retain(|field, _| *field == DraftField::Tags);
        for failure in &failures {
            self.errors.insert(failure.field, failure.message.clone());
        }
        if !failures.is_empty() {
            info!(
                "event=form_submit module=form status=skipped reason=invalid fields={}",
                failures.len()
            );
            return Err(FormError::Invalid(failures));
        }

        self.phase = FormPhase::Submitting;
        info!(
            "event=form_submit module=form status=ok mode={:?} tags={}",
            self.mode,
            self.draft.tags.len()
        );
        Ok(SubmissionPayload::from_draft(&self.draft))
    }

    /// Applies the persistence result of a submission started by `begin_submit`.
    pub fn complete_submit(
        &mut self,
        result: Result<RecordId, PersistenceError>,
    ) -> Result<RecordId, FormError> {
        if self.phase != FormPhase::Submitting {
            return Err(FormError::NotEditable(self.phase));
        }

        match result {
            Ok(record_id) => {
                self.reset_draft();
                self.saved_id = Some(record_id);
                self.phase = FormPhase::Closed;
                info!(
                    "event=form_saved module=form status=ok record_id={}",
                    record_id
                );
                Ok(record_id)
            }
            Err(err) => {
                warn!("event=form_saved module=form status=error error={}", err);
                self.form_error = Some(err.to_string());
                self.phase = FormPhase::Ready;
                Err(FormError::Persistence(err))
            }
        }
    }

    /// Validates, persists and closes the form on success.
    pub async fn submit(&mut self) -> Result<RecordId, FormError> {
        let payload = self.begin_submit()?;
        let records = Arc::clone(&self.context.records);
        let result = records.persist_record(&payload).await;
        self.complete_submit(result)
    }

    fn ensure_ready(&self) -> Result<(), FormError> {
        if self.phase == FormPhase::Ready {
            Ok(())
        } else {
            Err(FormError::NotEditable(self.phase))
        }
    }

    fn reset_draft(&mut self) {
        self.draft = DraftRecord::blank();
        self.errors.clear();
        self.touched.clear();
        self.form_error = None;
        self.load_error = None;
    }

    /// Suggestions starting with `prefix` (ASCII case-insensitive) that are
    /// not attached yet.
    pub fn tag_suggestions(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.trim().to_ascii_lowercase();
        self.suggestions
            .iter()
            .filter(|value| value.to_ascii_lowercase().starts_with(prefix.as_str()))
            .filter(|value| !self.draft.tags.contains_label(value))
            .map(String::as_str)
            .collect()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn heading(&self) -> &'static str {
        self.mode.heading()
    }

    pub fn submit_label(&self) -> &'static str {
        self.mode.submit_label()
    }

    pub fn draft(&self) -> &DraftRecord {
        &self.draft
    }

    pub fn tags(&self) -> &TagCollection {
        &self.draft.tags
    }

    pub fn field_error(&self, field: DraftField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Non-field error from the last failed submission.
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    /// Blocking hydration error shown while `Loading`.
    pub fn load_error(&self) -> Option<&FetchError> {
        self.load_error.as_ref()
    }

    /// Id returned by the last successful submission.
    pub fn saved_id(&self) -> Option<RecordId> {
        self.saved_id
    }

    /// Remote tag collection this form's tag changes are mirrored to.
    pub fn tag_scope(&self) -> TagScope {
        self.tag_scope
    }
}

fn tag_error_kind(err: &TagError) -> &'static str {
    match err {
        TagError::InvalidLabel(_) => "invalid_label",
        TagError::Duplicate(_) => "duplicate",
        TagError::NotFound(_) => "not_found",
        TagError::RankOverflow => "rank_overflow",
        TagError::Remote(_) => "remote",
    }
}
