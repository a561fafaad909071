//! One editing session over a single draft.
//!
//! ```text
//! Empty ──edit──▶ Editing ──revalidate──▶ Valid | Invalid ──submit──▶ Submitted
//!   └──────────────── cancel (from any state) ─────────────────────▶ Cancelled
//! ```
//!
//! `submit` revalidates first and only succeeds from `Valid`. Cancelling
//! drops the draft (releasing local attachment handles); attachment batches
//! still converting when the session is cancelled or dropped are discarded
//! on completion instead of being applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::attachment::constraints::{AttachmentChecker, Rejection};
use crate::attachment::convert::convert_batch;
use crate::attachment::handle::LocalResourceRegistry;
use crate::error::{OutreachError, Result};
use crate::model::attachment::AttachmentCandidate;
use crate::model::draft::{SavedTemplate, TemplateDraft};
use crate::model::file::RawFile;
use crate::model::kind::TemplateKind;

use super::payload::{SubmissionPayload, SubmitError};
use super::premium::{fetch_premium_status, PremiumStatus, PremiumStatusProvider};
use super::rules::{first_missing_field, ValidationResult};
use super::Composer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing entered yet.
    Empty,
    /// Changed since the last validation pass.
    Editing,
    Invalid,
    Valid,
    Submitted,
    Cancelled,
}

impl SessionState {
    pub fn is_closed(self) -> bool {
        matches!(self, SessionState::Submitted | SessionState::Cancelled)
    }
}

pub struct EditorSession {
    id: Uuid,
    kind: TemplateKind,
    draft: TemplateDraft,
    state: SessionState,
    premium: PremiumStatus,
    composer: Arc<Composer>,
    checker: Arc<AttachmentChecker>,
    registry: LocalResourceRegistry,
    alive: Arc<AtomicBool>,
}

impl EditorSession {
    /// Start from an empty draft.
    pub fn new(
        kind: TemplateKind,
        composer: Arc<Composer>,
        checker: Arc<AttachmentChecker>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            draft: TemplateDraft::new(),
            state: SessionState::Empty,
            premium: PremiumStatus::Pending,
            composer,
            checker,
            registry: LocalResourceRegistry::new(),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Start from a saved template.
    pub fn resume(
        kind: TemplateKind,
        saved: SavedTemplate,
        composer: Arc<Composer>,
        checker: Arc<AttachmentChecker>,
    ) -> Self {
        let mut session = Self::new(kind, composer, checker);
        session.draft = TemplateDraft::from_saved(saved);
        if !session.draft.is_empty() {
            session.state = SessionState::Editing;
        }
        session
    }

    /// Use a shared registry for local attachment handles.
    pub fn with_registry(mut self, registry: LocalResourceRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn draft(&self) -> &TemplateDraft {
        &self.draft
    }

    pub fn registry(&self) -> &LocalResourceRegistry {
        &self.registry
    }

    // ── Editing ─────────────────────────────────────────────────

    fn edit(&mut self, apply: impl FnOnce(&mut TemplateDraft)) -> Result<()> {
        if self.state.is_closed() {
            return Err(OutreachError::SessionClosed);
        }
        apply(&mut self.draft);
        self.state = SessionState::Editing;
        Ok(())
    }

    pub fn set_subject(&mut self, value: impl Into<String>) -> Result<()> {
        self.edit(|d| d.set_subject(value))
    }

    pub fn set_fallback_subject(&mut self, value: impl Into<String>) -> Result<()> {
        self.edit(|d| d.set_fallback_subject(value))
    }

    pub fn set_body(&mut self, value: impl Into<String>) -> Result<()> {
        self.edit(|d| d.set_body(value))
    }

    pub fn set_fallback_body(&mut self, value: impl Into<String>) -> Result<()> {
        self.edit(|d| d.set_fallback_body(value))
    }

    /// Remove an attachment, releasing its local handle if it has one.
    pub fn remove_attachment(&mut self, index: usize) -> Result<bool> {
        let mut removed = false;
        self.edit(|d| removed = d.remove_attachment(index))?;
        Ok(removed)
    }

    // ── Premium status ──────────────────────────────────────────

    pub fn premium_status(&self) -> PremiumStatus {
        self.premium
    }

    pub fn set_premium_status(&mut self, status: PremiumStatus) {
        if status != self.premium {
            tracing::debug!(session = %self.id, ?status, "Premium status updated");
            self.premium = status;
            if matches!(self.state, SessionState::Valid | SessionState::Invalid) {
                self.state = SessionState::Editing;
            }
        }
    }

    /// Ask `provider` for the premium status. Until this completes the
    /// standard limit applies; failures keep it.
    pub async fn refresh_premium(
        &mut self,
        provider: &dyn PremiumStatusProvider,
        timeout: Duration,
    ) -> PremiumStatus {
        let status = fetch_premium_status(provider, timeout).await;
        self.set_premium_status(status);
        status
    }

    /// Current body limit for this session's kind.
    pub fn character_limit(&self) -> usize {
        self.composer
            .character_limit(self.kind, self.premium.is_premium())
    }

    // ── Validation & submit ─────────────────────────────────────

    /// Run a validation pass and move to `Valid` or `Invalid`.
    pub fn revalidate(&mut self) -> Result<ValidationResult> {
        if self.state.is_closed() {
            return Err(OutreachError::SessionClosed);
        }
        let result = self
            .composer
            .validate(&self.draft, self.kind, self.premium.is_premium());
        self.state = if result.is_valid {
            SessionState::Valid
        } else {
            SessionState::Invalid
        };
        Ok(result)
    }

    pub fn is_submittable(&self) -> bool {
        !self.state.is_closed()
            && self
                .composer
                .is_submittable(&self.draft, self.kind, self.premium.is_premium())
    }

    /// Validate and build the payload. Missing required fields are reported
    /// first, one at a time, in priority order.
    pub fn submit(&mut self) -> std::result::Result<SubmissionPayload, SubmitError> {
        if self.state.is_closed() {
            return Err(SubmitError::Closed);
        }

        if let Some(field) = first_missing_field(&self.draft, self.kind) {
            self.state = SessionState::Invalid;
            return Err(SubmitError::MissingField(field));
        }

        let result = self.revalidate().map_err(|_| SubmitError::Closed)?;
        if !result.is_valid {
            return Err(SubmitError::Invalid(result));
        }

        let payload = self.composer.submit(&self.draft, self.kind)?;
        self.state = SessionState::Submitted;
        tracing::info!(
            session = %self.id,
            kind = %self.kind,
            attachments = payload.attachments.len(),
            "Template submitted"
        );
        Ok(payload)
    }

    /// Discard the draft. Local attachment handles are released now;
    /// in-flight attachment batches are dropped when they complete.
    pub fn cancel(&mut self) {
        if self.state == SessionState::Cancelled {
            return;
        }
        self.alive.store(false, Ordering::SeqCst);
        self.draft = TemplateDraft::new();
        self.state = SessionState::Cancelled;
        tracing::debug!(session = %self.id, "Editing session cancelled");
    }

    // ── Attachments ─────────────────────────────────────────────

    /// Run the constraint checker against the current draft. The accepted
    /// files still need converting before they can be applied.
    pub fn stage_files(&self, incoming: Vec<RawFile>) -> Result<StagedBatch> {
        if self.state.is_closed() {
            return Err(OutreachError::SessionClosed);
        }
        let outcome = self.checker.check_batch(self.draft.attachments(), incoming);
        Ok(StagedBatch {
            session: self.id,
            accepted: outcome.accepted,
            rejections: outcome.rejections,
            alive: Arc::clone(&self.alive),
            registry: self.registry.clone(),
        })
    }

    /// Insert a converted batch into the draft. All or nothing.
    ///
    /// The count and aggregate caps are checked again against the current
    /// draft, since other batches may have been applied after this one was
    /// staged. A refused batch is dropped, releasing its handles.
    pub fn apply_batch(&mut self, batch: ConvertedBatch) -> Result<AppliedBatch> {
        if batch.session != self.id {
            return Err(OutreachError::ForeignBatch);
        }
        if self.state.is_closed() {
            return Err(OutreachError::SessionClosed);
        }

        if let Some(rejection) = self
            .checker
            .recheck_converted(self.draft.attachments(), &batch.attachments)
        {
            tracing::debug!(
                session = %self.id,
                count = batch.attachments.len(),
                reason = %rejection.reason,
                "Converted batch no longer fits the draft"
            );
            return Ok(AppliedBatch::Refused(rejection));
        }

        let count = batch.attachments.len();
        self.edit(|d| d.extend_attachments(batch.attachments))?;
        tracing::debug!(session = %self.id, count, "Applied attachment batch");
        Ok(AppliedBatch::Added(count))
    }

    /// Stage, convert and apply in one go. Returns the number of files
    /// added and the rejections.
    pub async fn attach_files(
        &mut self,
        incoming: Vec<RawFile>,
    ) -> Result<(usize, Vec<Rejection>)> {
        let mut staged = self.stage_files(incoming)?;
        let mut rejections = std::mem::take(&mut staged.rejections);
        match staged.convert().await? {
            BatchConversion::Ready(batch) => match self.apply_batch(batch)? {
                AppliedBatch::Added(count) => Ok((count, rejections)),
                AppliedBatch::Refused(rejection) => {
                    rejections.push(rejection);
                    Ok((0, rejections))
                }
            },
            BatchConversion::Discarded => Err(OutreachError::SessionClosed),
        }
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// Files that passed the constraint checker, waiting for conversion.
#[derive(Debug)]
pub struct StagedBatch {
    session: Uuid,
    accepted: Vec<RawFile>,
    /// Files that must not be added, to be shown to the user.
    pub rejections: Vec<Rejection>,
    alive: Arc<AtomicBool>,
    registry: LocalResourceRegistry,
}

/// Result of converting a staged batch.
#[derive(Debug)]
pub enum BatchConversion {
    Ready(ConvertedBatch),
    /// The session ended while converting; the attachments were released.
    Discarded,
}

/// Outcome of [`EditorSession::apply_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedBatch {
    /// Number of attachments added to the draft.
    Added(usize),
    /// The batch no longer fits the draft and was dropped as a whole.
    Refused(Rejection),
}

/// Converted attachments ready for [`EditorSession::apply_batch`].
#[derive(Debug)]
pub struct ConvertedBatch {
    session: Uuid,
    attachments: Vec<AttachmentCandidate>,
}

impl ConvertedBatch {
    pub fn attachments(&self) -> &[AttachmentCandidate] {
        &self.attachments
    }
}

impl StagedBatch {
    pub fn accepted(&self) -> &[RawFile] {
        &self.accepted
    }

    /// Read and register every accepted file. Does not borrow the session,
    /// so the session may be cancelled meanwhile.
    pub async fn convert(self) -> Result<BatchConversion> {
        let attachments = convert_batch(self.accepted, &self.registry).await?;

        if !self.alive.load(Ordering::SeqCst) {
            tracing::debug!(
                session = %self.session,
                count = attachments.len(),
                "Session ended during conversion, discarding batch"
            );
            drop(attachments);
            return Ok(BatchConversion::Discarded);
        }

        Ok(BatchConversion::Ready(ConvertedBatch {
            session: self.session,
            attachments,
        }))
    }
}
