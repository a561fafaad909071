//! Integration tests for snippet validation, attachment batches, and
//! editing sessions.

use std::path::Path;
use std::sync::Arc;

use assert_fs::prelude::*;
use predicates::prelude::*;

use outreachkit::attachment::constraints::{
    AttachmentChecker, AttachmentLimits, RejectionReason, MAX_FILE_COUNT, MAX_TOTAL_BYTES,
};
use outreachkit::attachment::LocalResourceRegistry;
use outreachkit::composer::payload::{PayloadContent, SubmitError};
use outreachkit::composer::{Composer, EditorSession, Field, SessionState, ViolationReason};
use outreachkit::error::OutreachError;
use outreachkit::loader::load_template_file;
use outreachkit::model::draft::TemplateDraft;
use outreachkit::model::file::{MemorySource, RawFile};
use outreachkit::model::kind::TemplateKind;
use outreachkit::snippet::{SnippetIssue, SnippetValidator, VariableCatalog};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn session(kind: TemplateKind) -> EditorSession {
    EditorSession::new(
        kind,
        Arc::new(Composer::default()),
        Arc::new(AttachmentChecker::default()),
    )
}

/// A file whose declared size is not backed by real bytes. Only usable
/// where the content is never read.
fn sized_file(name: &str, size_bytes: u64) -> RawFile {
    RawFile::new(
        name,
        "application/pdf",
        size_bytes,
        Arc::new(MemorySource::new(Vec::new())),
    )
}

// ─── Test 1: Every catalog token is a valid primary snippet ─────────

#[test]
fn test_every_catalog_token_is_valid() {
    let validator = SnippetValidator::default();
    for var in VariableCatalog::builtin().descriptors() {
        let text = format!("Hello {}", var.token);
        assert!(
            !validator.primary_is_invalid(&text),
            "'{text}' should be valid"
        );
    }
}

// ─── Test 2: Unmatched opening markers are invalid ──────────────────

#[test]
fn test_unmatched_open_marker_is_invalid() {
    let validator = SnippetValidator::default();
    for text in [
        "Hi {{first_name",
        "{{",
        "Hi {{first_name}} and {{company_name",
        "{{first_name}} {{",
    ] {
        assert!(validator.primary_is_invalid(text), "'{text}' should be invalid");
    }
    assert_eq!(
        validator.check_primary("Hi {{first_name"),
        Some(SnippetIssue::UnmatchedMarkers)
    );
}

// ─── Test 3/4: Fallback text must be free of braces ─────────────────

#[test]
fn test_fallback_rejects_any_brace() {
    let validator = SnippetValidator::default();
    assert!(validator.fallback_is_invalid("Hi {there"));
    assert!(validator.fallback_is_invalid("Hi there}"));
    assert!(validator.fallback_is_invalid("Hi {{first_name}}"));
    assert!(!validator.fallback_is_invalid("Hi there"));
    assert!(!validator.fallback_is_invalid(""));
}

// ─── Test 5: Too many files refuses the whole batch ─────────────────

#[test]
fn test_six_files_rejected_as_batch() {
    let checker = AttachmentChecker::default();
    let incoming: Vec<RawFile> = (0..6)
        .map(|i| RawFile::from_bytes(format!("f{i}.txt"), "text/plain", vec![b'x'; 10]))
        .collect();

    let outcome = checker.check_batch(&[], incoming);
    assert!(outcome.accepted.is_empty());
    assert_eq!(outcome.rejections.len(), 1);
    assert_eq!(outcome.rejections[0].file_name, None);
    assert_eq!(
        outcome.rejections[0].reason,
        RejectionReason::TooManyFiles {
            max: MAX_FILE_COUNT
        }
    );
}

// ─── Test 6: Aggregate cap stops the batch ──────────────────────────

#[test]
fn test_total_cap_stops_evaluation() {
    let checker = AttachmentChecker::new(AttachmentLimits {
        max_single_file_bytes: 64 * 1024 * 1024,
        ..AttachmentLimits::default()
    });
    let incoming = vec![
        sized_file("big.pdf", 40_000_000),
        sized_file("medium.pdf", 15_000_000),
        sized_file("tiny.pdf", 1_000),
    ];

    let outcome = checker.check_batch(&[], incoming);
    let accepted: Vec<&str> = outcome.accepted.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(accepted, vec!["big.pdf"]);
    assert_eq!(outcome.rejections.len(), 1);
    assert_eq!(outcome.rejections[0].file_name.as_deref(), Some("medium.pdf"));
    assert_eq!(
        outcome.rejections[0].reason,
        RejectionReason::ExceedsTotalSize {
            limit: MAX_TOTAL_BYTES
        }
    );
}

// ─── Test 7: Connection invite over the standard limit ──────────────

#[test]
fn test_invite_over_limit_not_submittable() {
    let composer = Composer::default();
    let mut draft = TemplateDraft::new();
    draft.set_body("a".repeat(201));
    draft.set_fallback_body("Hello");

    let result = composer.validate(&draft, TemplateKind::ConnectionInvite, false);
    assert!(!result.is_valid);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].field, Field::Body);
    assert_eq!(
        result.violations[0].reason,
        ViolationReason::TooLong {
            length: 201,
            max: 200
        }
    );
}

// ─── Test 8: Complete InMail is submittable ─────────────────────────

#[test]
fn test_complete_inmail_is_submittable() {
    let composer = Composer::default();
    let mut draft = TemplateDraft::new();
    draft.set_subject("Hello {{first_name}}");
    draft.set_fallback_subject("Hello");
    draft.set_body("Hi {{first_name}}, how is {{company_name}}?");
    draft.set_fallback_body("Hi, how are things?");

    assert!(composer.is_submittable(&draft, TemplateKind::InMailMessage, false));
}

// ─── Test 9: Validation is repeatable ───────────────────────────────

#[test]
fn test_validation_is_idempotent() {
    let validator = SnippetValidator::default();
    for text in ["", "Hi {{first_name}}", "Hi {{nope}}", "{x}", "}{", "Hi {{"] {
        assert_eq!(validator.check_primary(text), validator.check_primary(text));
        assert_eq!(validator.check_fallback(text), validator.check_fallback(text));
    }
}

// ─── Sessions ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_session_edit_validate_submit() {
    let mut s = session(TemplateKind::DirectMessage);
    assert_eq!(s.state(), SessionState::Empty);

    s.set_body("Hi {{first_name}}").unwrap();
    assert_eq!(s.state(), SessionState::Editing);

    let err = s.submit().unwrap_err();
    assert!(matches!(err, SubmitError::MissingField(Field::FallbackBody)));
    assert_eq!(s.state(), SessionState::Invalid);

    s.set_fallback_body("Hi there").unwrap();
    let (added, rejections) = s
        .attach_files(vec![RawFile::from_bytes(
            "notes.txt",
            "text/plain",
            b"hello".to_vec(),
        )])
        .await
        .unwrap();
    assert_eq!(added, 1);
    assert!(rejections.is_empty());

    let payload = s.submit().unwrap();
    assert_eq!(s.state(), SessionState::Submitted);
    assert_eq!(payload.attachments.len(), 1);
    match &payload.attachments[0].content {
        PayloadContent::Inline { data_uri, .. } => {
            assert_eq!(data_uri, "data:text/plain;base64,aGVsbG8=");
        }
        other => panic!("expected inline content, got {other:?}"),
    }

    assert!(s.set_body("late edit").is_err());
}

#[tokio::test]
async fn test_cancel_releases_local_attachments() {
    let registry = LocalResourceRegistry::new();
    let mut s = session(TemplateKind::DirectMessage).with_registry(registry.clone());

    s.attach_files(vec![
        RawFile::from_bytes("a.png", "image/png", vec![1u8; 16]),
        RawFile::from_bytes("b.png", "image/png", vec![2u8; 16]),
    ])
    .await
    .unwrap();
    assert_eq!(registry.live_handles(), 2);

    assert!(s.remove_attachment(0).unwrap());
    assert_eq!(registry.live_handles(), 1);

    s.cancel();
    assert_eq!(s.state(), SessionState::Cancelled);
    assert_eq!(registry.live_handles(), 0);
}

#[tokio::test]
async fn test_file_larger_than_declared_is_not_attached() {
    let registry = LocalResourceRegistry::new();
    let mut s = session(TemplateKind::DirectMessage).with_registry(registry.clone());
    let grown = RawFile::new(
        "big.png",
        "image/png",
        10,
        Arc::new(MemorySource::new(vec![0u8; 2 * 1024 * 1024])),
    );

    let err = s.attach_files(vec![grown]).await.unwrap_err();
    assert!(matches!(err, OutreachError::BatchConversion { .. }));
    assert!(s.draft().attachments().is_empty());
    assert_eq!(registry.live_handles(), 0);
}

// ─── Template files ─────────────────────────────────────────────────

#[tokio::test]
async fn test_inmail_fixture_round_trip() {
    let template = load_template_file(fixture("inmail.toml")).unwrap();
    assert_eq!(template.kind, Some(TemplateKind::InMailMessage));

    let mut s = EditorSession::resume(
        TemplateKind::InMailMessage,
        template.to_saved_template(),
        Arc::new(Composer::default()),
        Arc::new(AttachmentChecker::default()),
    );
    assert_eq!(s.state(), SessionState::Editing);

    let (added, rejections) = s.attach_files(template.raw_files().unwrap()).await.unwrap();
    assert_eq!(added, 1);
    assert!(rejections.is_empty());
    assert_eq!(s.draft().attachments()[0].mime_type, "text/plain");

    let payload = s.submit().unwrap();
    assert_eq!(
        payload.subject.as_deref(),
        Some("Quick question about {{company_name}}")
    );
}

#[test]
fn test_broken_invite_fixture_reports_every_issue() {
    let template = load_template_file(fixture("invite_broken.json")).unwrap();
    let kind = template.kind.unwrap();
    let draft = TemplateDraft::from_saved(template.to_saved_template());

    let result = Composer::default().validate(&draft, kind, false);
    assert!(!result.is_valid);
    assert!(result.violations.iter().any(|v| v.reason
        == ViolationReason::Snippet {
            issue: SnippetIssue::UnknownVariable("{{event_name}}".into())
        }));
    assert!(result.has_issue(Field::FallbackBody));
    assert!(!result.has_issue(Field::Subject));
}

#[tokio::test]
async fn test_template_with_disk_attachments() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("deck.pdf").write_binary(&[0x25, 0x50, 0x44, 0x46]).unwrap();
    temp.child("script.exe").write_binary(&[0x4d, 0x5a]).unwrap();
    temp.child("invite.toml")
        .write_str(
            r#"
kind = "direct-message"
body = "Hi {{first_name}}"
fallback_body = "Hi"
attachments = ["deck.pdf", "script.exe"]
"#,
        )
        .unwrap();
    temp.child("deck.pdf").assert(predicate::path::is_file());

    let template = load_template_file(temp.child("invite.toml").path()).unwrap();
    let mut s = EditorSession::resume(
        TemplateKind::DirectMessage,
        template.to_saved_template(),
        Arc::new(Composer::default()),
        Arc::new(AttachmentChecker::default()),
    );

    let (added, rejections) = s.attach_files(template.raw_files().unwrap()).await.unwrap();
    assert_eq!(added, 1);
    assert_eq!(rejections.len(), 1);
    assert_eq!(rejections[0].file_name.as_deref(), Some("script.exe"));
    assert_eq!(rejections[0].reason, RejectionReason::UnsupportedType);

    let candidate = &s.draft().attachments()[0];
    assert!(!candidate.is_persisted());
    assert_eq!(
        s.registry().resolve(candidate.preview_uri()).as_deref(),
        Some(&[0x25u8, 0x50, 0x44, 0x46][..])
    );
}

#[test]
fn test_missing_attachment_on_disk() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("t.toml")
        .write_str("body = \"Hi\"\nfallback_body = \"Hi\"\nattachments = [\"gone.pdf\"]\n")
        .unwrap();
    temp.child("gone.pdf").assert(predicate::path::missing());

    let template = load_template_file(temp.child("t.toml").path()).unwrap();
    assert!(template.raw_files().is_err());
}
