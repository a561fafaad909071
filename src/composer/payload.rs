//! The submission payload and submit-time errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::i18n;
use crate::model::attachment::{AttachmentCandidate, AttachmentSource};
use crate::model::kind::TemplateKind;

use super::rules::{Field, ValidationResult};

/// Why a submit was refused. The draft is left untouched in every case.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The first empty required field, in priority order.
    #[error("{0} {required}", required = i18n::err_is_required())]
    MissingField(Field),

    /// Fields are present but fail validation.
    #[error("{title}: {0}", title = i18n::cli_template_invalid())]
    Invalid(ValidationResult),

    /// The session was already submitted or cancelled.
    #[error("Editing session is closed")]
    Closed,
}

/// What gets handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub kind: TemplateKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_subject: Option<String>,
    pub fallback_body: String,
    pub attachments: Vec<PayloadAttachment>,
    pub prepared_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    #[serde(flatten)]
    pub content: PayloadContent,
}

/// Inline content for new attachments, a reference for stored ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PayloadContent {
    Inline { sha256: String, data_uri: String },
    Stored { url: String },
}

impl From<&AttachmentCandidate> for PayloadAttachment {
    fn from(att: &AttachmentCandidate) -> Self {
        let content = match &att.source {
            AttachmentSource::Local { sha256, .. } => PayloadContent::Inline {
                sha256: sha256.clone(),
                data_uri: att.data_uri().unwrap_or_default(),
            },
            AttachmentSource::Persisted { url } => PayloadContent::Stored { url: url.clone() },
        };
        Self {
            file_name: att.file_name.clone(),
            mime_type: att.mime_type.clone(),
            size_bytes: att.size_bytes,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attachment::SavedAttachment;

    #[test]
    fn test_stored_attachment_json_shape() {
        let att = AttachmentCandidate::persisted(SavedAttachment {
            file_name: "deck.pdf".into(),
            mime_type: "application/pdf".into(),
            size_bytes: 42,
            url: "https://cdn.example.com/deck.pdf".into(),
        });
        let json = serde_json::to_value(PayloadAttachment::from(&att)).unwrap();
        assert_eq!(json["source"], "stored");
        assert_eq!(json["url"], "https://cdn.example.com/deck.pdf");
        assert_eq!(json["size_bytes"], 42);
    }

    #[test]
    fn test_missing_field_message_names_the_field() {
        let err = SubmitError::MissingField(Field::FallbackBody);
        assert!(err.to_string().starts_with(Field::FallbackBody.label()));
    }
}
