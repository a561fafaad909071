//! Placeholder syntax checks for message text.
//!
//! Primary text may contain `{{variable}}` placeholders drawn from the
//! catalog. Fallback text is sent verbatim when personalization data is
//! missing, so it may not contain any brace at all.

use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::i18n;

use super::catalog::VariableCatalog;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// `{{`, anything without a brace, `}}`.
static WELL_FORMED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]*\}\}").expect("valid placeholder regex"));

/// `{{`, whitespace and word characters with at least one word character, `}}`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*[0-9A-Za-z_][\s0-9A-Za-z_]*\}\}").expect("valid placeholder regex")
});

/// The first rule a piece of text breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "detail", rename_all = "snake_case")]
pub enum SnippetIssue {
    /// The number of `{{` and `}}` markers differs.
    UnmatchedMarkers,
    /// A brace sits outside any well-formed placeholder.
    StrayBrace,
    /// A placeholder names a variable the catalog does not know.
    UnknownVariable(String),
    /// Fallback text contains a placeholder marker or brace.
    PlaceholderInFallback,
}

impl fmt::Display for SnippetIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnippetIssue::UnmatchedMarkers => f.write_str(i18n::err_unmatched_markers()),
            SnippetIssue::StrayBrace => f.write_str(i18n::err_stray_brace()),
            SnippetIssue::UnknownVariable(token) => {
                write!(f, "{}: {token}", i18n::err_unknown_variable())
            }
            SnippetIssue::PlaceholderInFallback => {
                f.write_str(i18n::err_placeholder_in_fallback())
            }
        }
    }
}

/// Validates primary and fallback text against a variable catalog.
///
/// Stateless apart from the shared catalog; every check is a pure function
/// of its input.
#[derive(Debug, Clone)]
pub struct SnippetValidator {
    catalog: Arc<VariableCatalog>,
}

impl Default for SnippetValidator {
    fn default() -> Self {
        Self::new(Arc::new(VariableCatalog::builtin()))
    }
}

impl SnippetValidator {
    pub fn new(catalog: Arc<VariableCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    /// First issue in primary text, or `None` if the text is acceptable.
    pub fn check_primary(&self, text: &str) -> Option<SnippetIssue> {
        if text.is_empty() {
            return None;
        }

        if text.matches(OPEN).count() != text.matches(CLOSE).count() {
            return Some(SnippetIssue::UnmatchedMarkers);
        }

        if text.contains(['{', '}']) {
            let residual = WELL_FORMED.replace_all(text, "");
            if residual.contains(['{', '}']) {
                return Some(SnippetIssue::StrayBrace);
            }
        }

        // Text such as "{{}}" or "{{   }}" has markers but nothing
        // PLACEHOLDER can extract; it passes here.
        if text.contains(OPEN) || text.contains(CLOSE) {
            for found in PLACEHOLDER.find_iter(text) {
                let token = found.as_str().trim();
                if !self.catalog.is_known_token(token) {
                    return Some(SnippetIssue::UnknownVariable(token.to_string()));
                }
            }
        }

        None
    }

    /// First issue in fallback text, or `None` if the text is acceptable.
    pub fn check_fallback(&self, text: &str) -> Option<SnippetIssue> {
        if text.is_empty() {
            return None;
        }
        if text.contains(OPEN) || text.contains(['{', '}']) {
            return Some(SnippetIssue::PlaceholderInFallback);
        }
        None
    }

    /// `true` when primary text is INVALID.
    pub fn primary_is_invalid(&self, text: &str) -> bool {
        self.check_primary(text).is_some()
    }

    /// `true` when fallback text is INVALID.
    pub fn fallback_is_invalid(&self, text: &str) -> bool {
        self.check_fallback(text).is_some()
    }
}
