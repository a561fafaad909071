//! Placeholder variable descriptors.

use serde::{Deserialize, Serialize};

/// One entry in the variable catalog.
///
/// `token` is the exact text matched inside a message body, including its
/// markers (e.g. `"{{first_name}}"`). `label` is what a picker shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    /// Human-readable name (e.g. `"First Name"`).
    pub label: String,

    /// Placeholder text, markers included.
    pub token: String,
}

impl VariableDescriptor {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }

    /// The variable name without its `{{ }}` markers.
    pub fn name(&self) -> &str {
        self.token
            .strip_prefix("{{")
            .and_then(|t| t.strip_suffix("}}"))
            .unwrap_or(&self.token)
    }
}
