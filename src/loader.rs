//! Loader for template files on disk (TOML or JSON).
//!
//! ```toml
//! kind = "inmail"
//! subject = "Quick question, {{first_name}}"
//! fallback_subject = "Quick question"
//! body = "Hi {{first_name}}, ..."
//! fallback_body = "Hi, ..."
//! attachments = ["deck.pdf", "logo.png"]
//! ```
//!
//! Relative attachment paths are resolved against the template's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OutreachError, Result};
use crate::model::draft::SavedTemplate;
use crate::model::file::RawFile;
use crate::model::kind::TemplateKind;

/// Contents of a template file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateFile {
    /// Kind declared in the file; the command line may override it.
    pub kind: Option<TemplateKind>,
    pub subject: String,
    pub fallback_subject: String,
    pub body: String,
    pub fallback_body: String,
    /// Files to attach, already resolved to usable paths after loading.
    pub attachments: Vec<PathBuf>,
}

impl TemplateFile {
    /// The text fields as a draft starting point (without attachments,
    /// which go through the constraint checker instead).
    pub fn to_saved_template(&self) -> SavedTemplate {
        SavedTemplate {
            subject: self.subject.clone(),
            fallback_subject: self.fallback_subject.clone(),
            body: self.body.clone(),
            fallback_body: self.fallback_body.clone(),
            attachments: Vec::new(),
        }
    }

    /// Describe every listed attachment as an incoming file.
    pub fn raw_files(&self) -> Result<Vec<RawFile>> {
        self.attachments
            .iter()
            .map(|p| RawFile::from_path(p))
            .collect()
    }
}

/// Read and decode a template file. `.json` files are parsed as JSON,
/// anything else as TOML.
pub fn load_template_file(path: impl AsRef<Path>) -> Result<TemplateFile> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            OutreachError::FileNotFound(path.to_path_buf())
        } else {
            OutreachError::io(path, e)
        }
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let mut template: TemplateFile = if is_json {
        serde_json::from_str(&contents).map_err(|e| OutreachError::TemplateParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
    } else {
        toml::from_str(&contents).map_err(|e| OutreachError::TemplateParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
    };

    let base = path.parent().unwrap_or(Path::new("."));
    for attachment in &mut template.attachments {
        if attachment.is_relative() {
            *attachment = base.join(&*attachment);
        }
    }

    tracing::debug!(
        path = %path.display(),
        kind = ?template.kind,
        attachments = template.attachments.len(),
        "Loaded template file"
    );
    Ok(template)
}
