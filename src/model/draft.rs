//! The editable state of one template.

use serde::{Deserialize, Serialize};

use super::attachment::{AttachmentCandidate, SavedAttachment};
use super::kind::TemplateKind;

/// A template as stored by an earlier save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedTemplate {
    pub subject: String,
    pub fallback_subject: String,
    pub body: String,
    pub fallback_body: String,
    pub attachments: Vec<SavedAttachment>,
}

/// All fields of a template being edited.
///
/// Subjects only matter for kinds where
/// [`TemplateKind::requires_subject`] holds. Attachments keep insertion order.
#[derive(Debug, Default)]
pub struct TemplateDraft {
    subject: String,
    fallback_subject: String,
    body: String,
    fallback_body: String,
    attachments: Vec<AttachmentCandidate>,
}

impl TemplateDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a saved template. Its attachments are marked persisted.
    pub fn from_saved(saved: SavedTemplate) -> Self {
        Self {
            subject: saved.subject,
            fallback_subject: saved.fallback_subject,
            body: saved.body,
            fallback_body: saved.fallback_body,
            attachments: saved
                .attachments
                .into_iter()
                .map(AttachmentCandidate::persisted)
                .collect(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn fallback_subject(&self) -> &str {
        &self.fallback_subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn fallback_body(&self) -> &str {
        &self.fallback_body
    }

    pub fn attachments(&self) -> &[AttachmentCandidate] {
        &self.attachments
    }

    pub fn set_subject(&mut self, value: impl Into<String>) {
        self.subject = value.into();
    }

    pub fn set_fallback_subject(&mut self, value: impl Into<String>) {
        self.fallback_subject = value.into();
    }

    pub fn set_body(&mut self, value: impl Into<String>) {
        self.body = value.into();
    }

    pub fn set_fallback_body(&mut self, value: impl Into<String>) {
        self.fallback_body = value.into();
    }

    /// Append attachments that already passed the constraint checker.
    pub fn extend_attachments(
        &mut self,
        attachments: impl IntoIterator<Item = AttachmentCandidate>,
    ) {
        self.attachments.extend(attachments);
    }

    /// Remove the attachment at `index`. A local attachment's handle is
    /// released before this returns. Returns `false` if out of range.
    pub fn remove_attachment(&mut self, index: usize) -> bool {
        if index >= self.attachments.len() {
            return false;
        }
        let removed = self.attachments.remove(index);
        tracing::debug!(
            file = %removed.file_name,
            persisted = removed.is_persisted(),
            "Removed attachment"
        );
        drop(removed);
        true
    }

    /// Drop every attachment, releasing local handles.
    pub fn clear_attachments(&mut self) {
        self.attachments.clear();
    }

    /// Combined size of all attachments.
    pub fn attachment_bytes(&self) -> u64 {
        self.attachments.iter().map(|a| a.size_bytes).sum()
    }

    /// `true` when every text field is empty and there are no attachments.
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty()
            && self.fallback_subject.is_empty()
            && self.body.is_empty()
            && self.fallback_body.is_empty()
            && self.attachments.is_empty()
    }

    /// Subject pair for kinds that carry one.
    pub fn subjects_for(&self, kind: TemplateKind) -> Option<(&str, &str)> {
        kind.requires_subject()
            .then_some((self.subject.as_str(), self.fallback_subject.as_str()))
    }
}
