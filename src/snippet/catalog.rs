//! The closed set of placeholder variables a template may use.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{OutreachError, Result};
use crate::model::variable::VariableDescriptor;

/// Builtin prospect fields, as `(label, token)`.
const BUILTIN_VARIABLES: &[(&str, &str)] = &[
    ("First Name", "{{first_name}}"),
    ("Last Name", "{{last_name}}"),
    ("Full Name", "{{full_name}}"),
    ("Company Name", "{{company_name}}"),
    ("Job Title", "{{job_title}}"),
    ("Headline", "{{headline}}"),
    ("Location", "{{location}}"),
    ("Industry", "{{industry}}"),
];

static TOKEN_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\{[0-9A-Za-z_]+\}\}$").expect("valid token regex"));

/// Registry of allowed variables with constant-time token lookup.
#[derive(Debug, Clone)]
pub struct VariableCatalog {
    descriptors: Vec<VariableDescriptor>,
    tokens: HashSet<String>,
}

impl VariableCatalog {
    /// The builtin catalog.
    pub fn builtin() -> Self {
        let descriptors: Vec<VariableDescriptor> = BUILTIN_VARIABLES
            .iter()
            .map(|(label, token)| VariableDescriptor::new(*label, *token))
            .collect();
        let tokens = descriptors.iter().map(|d| d.token.clone()).collect();
        Self {
            descriptors,
            tokens,
        }
    }

    /// The builtin catalog followed by `extra` entries.
    pub fn builtin_with(extra: impl IntoIterator<Item = VariableDescriptor>) -> Result<Self> {
        let mut descriptors = Self::builtin().descriptors;
        descriptors.extend(extra);
        Self::new(descriptors)
    }

    /// Build a catalog from explicit descriptors.
    ///
    /// Every token must look like `{{word}}` and appear only once.
    pub fn new(descriptors: Vec<VariableDescriptor>) -> Result<Self> {
        let mut tokens = HashSet::with_capacity(descriptors.len());
        for d in &descriptors {
            if !TOKEN_SHAPE.is_match(&d.token) {
                return Err(OutreachError::InvalidCatalog(format!(
                    "token '{}' for '{}' is not of the form {{{{name}}}}",
                    d.token, d.label
                )));
            }
            if !tokens.insert(d.token.clone()) {
                return Err(OutreachError::InvalidCatalog(format!(
                    "duplicate token '{}'",
                    d.token
                )));
            }
        }
        Ok(Self {
            descriptors,
            tokens,
        })
    }

    /// `true` iff `token`, trimmed, exactly matches a catalog token.
    /// Matching is case-sensitive.
    pub fn is_known_token(&self, token: &str) -> bool {
        self.tokens.contains(token.trim())
    }

    pub fn lookup(&self, token: &str) -> Option<&VariableDescriptor> {
        let token = token.trim();
        self.descriptors.iter().find(|d| d.token == token)
    }

    pub fn descriptors(&self) -> &[VariableDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for VariableCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
