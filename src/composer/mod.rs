//! Template composer: per-kind limits, the submittability verdict, payload
//! assembly, and the editing session that ties them together.

pub mod limits;
pub mod payload;
pub mod premium;
pub mod rules;
pub mod session;

use chrono::Utc;

use crate::model::draft::TemplateDraft;
use crate::model::kind::TemplateKind;
use crate::snippet::SnippetValidator;

use self::limits::CharacterLimits;
use self::payload::{PayloadAttachment, SubmissionPayload, SubmitError};
use self::rules::{first_missing_field, validate_draft, ValidationResult};

pub use self::rules::{Field, Violation, ViolationReason};
pub use self::session::{AppliedBatch, EditorSession, SessionState};

/// Decides whether a draft can be submitted and builds the payload.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    validator: SnippetValidator,
    limits: CharacterLimits,
}

impl Composer {
    pub fn new(validator: SnippetValidator, limits: CharacterLimits) -> Self {
        Self { validator, limits }
    }

    pub fn validator(&self) -> &SnippetValidator {
        &self.validator
    }

    pub fn limits(&self) -> &CharacterLimits {
        &self.limits
    }

    /// Body limit for `kind`; `is_premium` only matters for connection invites.
    pub fn character_limit(&self, kind: TemplateKind, is_premium: bool) -> usize {
        self.limits.limit_for(kind, is_premium)
    }

    /// Full validation pass over every field `kind` uses.
    pub fn validate(
        &self,
        draft: &TemplateDraft,
        kind: TemplateKind,
        is_premium: bool,
    ) -> ValidationResult {
        let max_length = self.character_limit(kind, is_premium);
        validate_draft(&self.validator, draft, kind, max_length)
    }

    /// `true` only if every required field is filled, both snippet checks
    /// pass, and the bodies fit the limit.
    pub fn is_submittable(
        &self,
        draft: &TemplateDraft,
        kind: TemplateKind,
        is_premium: bool,
    ) -> bool {
        self.validate(draft, kind, is_premium).is_valid
    }

    /// Check required fields in priority order and assemble the payload.
    ///
    /// Only presence is checked here; callers that need the full verdict go
    /// through [`EditorSession::submit`].
    pub fn submit(
        &self,
        draft: &TemplateDraft,
        kind: TemplateKind,
    ) -> Result<SubmissionPayload, SubmitError> {
        if let Some(field) = first_missing_field(draft, kind) {
            tracing::debug!(%kind, ?field, "Submit refused, required field empty");
            return Err(SubmitError::MissingField(field));
        }

        let (subject, fallback_subject) = match draft.subjects_for(kind) {
            Some((s, fs)) => (Some(s.to_string()), Some(fs.to_string())),
            None => (None, None),
        };

        Ok(SubmissionPayload {
            kind,
            subject,
            body: draft.body().to_string(),
            fallback_subject,
            fallback_body: draft.fallback_body().to_string(),
            attachments: draft.attachments().iter().map(PayloadAttachment::from).collect(),
            prepared_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attachment::SavedAttachment;
    use crate::model::draft::SavedTemplate;
    use crate::snippet::SnippetIssue;

    fn inmail_draft() -> TemplateDraft {
        TemplateDraft::from_saved(SavedTemplate {
            subject: "Intro for {{first_name}}".into(),
            fallback_subject: "Quick intro".into(),
            body: "Hi {{first_name}}, I saw your work at {{company_name}}.".into(),
            fallback_body: "Hi, I saw your work and wanted to reach out.".into(),
            attachments: vec![SavedAttachment {
                file_name: "deck.pdf".into(),
                mime_type: "application/pdf".into(),
                size_bytes: 1000,
                url: "https://cdn.example.com/deck.pdf".into(),
            }],
        })
    }

    #[test]
    fn test_inmail_with_all_fields_is_submittable() {
        let composer = Composer::default();
        assert!(composer.is_submittable(&inmail_draft(), TemplateKind::InMailMessage, false));
    }

    #[test]
    fn test_connection_invite_premium_tier() {
        let composer = Composer::default();
        let mut draft = TemplateDraft::new();
        draft.set_body("a".repeat(230));
        draft.set_fallback_body("b");

        assert!(!composer.is_submittable(&draft, TemplateKind::ConnectionInvite, false));
        assert!(composer.is_submittable(&draft, TemplateKind::ConnectionInvite, true));
    }

    #[test]
    fn test_invalid_fallback_blocks() {
        let composer = Composer::default();
        let mut draft = inmail_draft();
        draft.set_fallback_body("Hi {{first_name}}");
        let result = composer.validate(&draft, TemplateKind::InMailMessage, false);
        assert!(!result.is_valid);
        assert_eq!(
            result.violations[0].reason,
            ViolationReason::Snippet {
                issue: SnippetIssue::PlaceholderInFallback
            }
        );
    }

    #[test]
    fn test_submit_reports_first_missing_field() {
        let composer = Composer::default();
        let mut draft = inmail_draft();
        draft.set_subject("  ");
        draft.set_fallback_body("");

        let err = composer.submit(&draft, TemplateKind::InMailMessage).unwrap_err();
        assert!(matches!(err, SubmitError::MissingField(Field::Subject)));
        // Draft unchanged.
        assert_eq!(draft.subject(), "  ");
    }

    #[test]
    fn test_submit_payload_for_kind_without_subject() {
        let composer = Composer::default();
        let payload = composer
            .submit(&inmail_draft(), TemplateKind::DirectMessage)
            .unwrap();
        assert_eq!(payload.kind, TemplateKind::DirectMessage);
        assert!(payload.subject.is_none());
        assert!(payload.fallback_subject.is_none());
        assert_eq!(payload.attachments.len(), 1);

        let payload = composer
            .submit(&inmail_draft(), TemplateKind::InMailMessage)
            .unwrap();
        assert_eq!(payload.subject.as_deref(), Some("Intro for {{first_name}}"));
        assert_eq!(payload.fallback_subject.as_deref(), Some("Quick intro"));
    }
}
