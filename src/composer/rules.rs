//! Field-level validation of a draft.

use std::fmt;

use serde::Serialize;

use crate::i18n;
use crate::model::draft::TemplateDraft;
use crate::model::kind::TemplateKind;
use crate::snippet::{SnippetIssue, SnippetValidator};

use super::limits::text_length;

/// Text fields of a draft, in the order missing fields are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Subject,
    Body,
    FallbackSubject,
    FallbackBody,
}

impl Field {
    /// Priority order.
    pub const ALL: [Field; 4] = [
        Field::Subject,
        Field::Body,
        Field::FallbackSubject,
        Field::FallbackBody,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Subject => i18n::field_subject(),
            Field::Body => i18n::field_body(),
            Field::FallbackSubject => i18n::field_fallback_subject(),
            Field::FallbackBody => i18n::field_fallback_body(),
        }
    }

    /// Whether drafts of `kind` must fill this field.
    pub fn required_for(self, kind: TemplateKind) -> bool {
        match self {
            Field::Subject | Field::FallbackSubject => kind.requires_subject(),
            Field::Body | Field::FallbackBody => true,
        }
    }

    fn is_fallback(self) -> bool {
        matches!(self, Field::FallbackSubject | Field::FallbackBody)
    }

    fn is_body(self) -> bool {
        matches!(self, Field::Body | Field::FallbackBody)
    }

    pub fn value(self, draft: &TemplateDraft) -> &str {
        match self {
            Field::Subject => draft.subject(),
            Field::Body => draft.body(),
            Field::FallbackSubject => draft.fallback_subject(),
            Field::FallbackBody => draft.fallback_body(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What is wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ViolationReason {
    /// Empty after trimming.
    Required,
    /// Placeholder syntax problem.
    Snippet { issue: SnippetIssue },
    /// Longer than the kind's character limit.
    TooLong { length: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: Field,
    pub reason: ViolationReason,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ViolationReason::Required => write!(f, "{} {}", self.field, i18n::err_is_required()),
            ViolationReason::Snippet { issue } => write!(f, "{}: {issue}", self.field),
            ViolationReason::TooLong { length, max } => {
                f.write_str(&i18n::err_length(self.field.label(), *length, *max))
            }
        }
    }
}

/// Outcome of one validation pass. Built fresh each time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            is_valid: violations.is_empty(),
            violations,
        }
    }

    /// Violations reported for one field.
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.field == field)
    }

    pub fn has_issue(&self, field: Field) -> bool {
        self.for_field(field).next().is_some()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// First required field that is empty, in priority order.
pub fn first_missing_field(draft: &TemplateDraft, kind: TemplateKind) -> Option<Field> {
    Field::ALL
        .into_iter()
        .filter(|f| f.required_for(kind))
        .find(|f| f.value(draft).trim().is_empty())
}

/// Check every applicable field of `draft` against `kind`.
///
/// Subjects are checked only for kinds that require one. Both body fields
/// are held to `max_length`.
pub fn validate_draft(
    validator: &SnippetValidator,
    draft: &TemplateDraft,
    kind: TemplateKind,
    max_length: usize,
) -> ValidationResult {
    let mut violations = Vec::new();

    for field in Field::ALL.into_iter().filter(|f| f.required_for(kind)) {
        let text = field.value(draft);

        if text.trim().is_empty() {
            violations.push(Violation {
                field,
                reason: ViolationReason::Required,
            });
            continue;
        }

        let issue = if field.is_fallback() {
            validator.check_fallback(text)
        } else {
            validator.check_primary(text)
        };
        if let Some(issue) = issue {
            violations.push(Violation {
                field,
                reason: ViolationReason::Snippet { issue },
            });
        }

        if field.is_body() {
            let length = text_length(text);
            if length > max_length {
                violations.push(Violation {
                    field,
                    reason: ViolationReason::TooLong {
                        length,
                        max: max_length,
                    },
                });
            }
        }
    }

    ValidationResult::from_violations(violations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(subject: &str, body: &str, fb_subject: &str, fb_body: &str) -> TemplateDraft {
        let mut d = TemplateDraft::new();
        d.set_subject(subject);
        d.set_body(body);
        d.set_fallback_subject(fb_subject);
        d.set_fallback_body(fb_body);
        d
    }

    #[test]
    fn test_missing_field_priority() {
        let d = draft("", "", "", "");
        assert_eq!(
            first_missing_field(&d, TemplateKind::InMailMessage),
            Some(Field::Subject)
        );
        assert_eq!(
            first_missing_field(&d, TemplateKind::DirectMessage),
            Some(Field::Body)
        );

        let d = draft("S", "B", "  ", "");
        assert_eq!(
            first_missing_field(&d, TemplateKind::InMailMessage),
            Some(Field::FallbackSubject)
        );
        assert_eq!(
            first_missing_field(&d, TemplateKind::ConnectionInvite),
            Some(Field::FallbackBody)
        );
    }

    #[test]
    fn test_subjects_ignored_for_direct_message() {
        let d = draft("", "Hi {{first_name}}", "{{oops", "Hi there");
        let result = validate_draft(
            &SnippetValidator::default(),
            &d,
            TemplateKind::DirectMessage,
            5000,
        );
        assert!(result.is_valid, "{result}");
    }

    #[test]
    fn test_collects_snippet_and_length_violations() {
        let body = format!("Hi {{{{nickname}}}} {}", "x".repeat(300));
        let d = draft("", &body, "", "Hi {there}");
        let result = validate_draft(
            &SnippetValidator::default(),
            &d,
            TemplateKind::ConnectionInvite,
            200,
        );
        assert!(!result.is_valid);
        assert_eq!(result.violations.len(), 3);
        assert!(result.has_issue(Field::Body));
        assert!(result.has_issue(Field::FallbackBody));
        assert!(result
            .for_field(Field::Body)
            .any(|v| matches!(v.reason, ViolationReason::TooLong { max: 200, .. })));
    }

    #[test]
    fn test_fallback_subject_uses_fallback_rules() {
        let d = draft("Hi {{first_name}}", "Body", "Hi {{first_name}}", "Body");
        let result = validate_draft(
            &SnippetValidator::default(),
            &d,
            TemplateKind::InMailMessage,
            1800,
        );
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].field, Field::FallbackSubject);
        assert_eq!(
            result.violations[0].reason,
            ViolationReason::Snippet {
                issue: SnippetIssue::PlaceholderInFallback
            }
        );
    }
}
