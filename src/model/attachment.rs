//! Attachments held by a template draft.
//!
//! An attachment is either local (converted during this editing session and
//! backed by a [`LocalHandle`]) or persisted (accepted by an earlier save and
//! referenced by URL). Only local attachments own a resource; dropping one
//! releases its handle.

use std::sync::Arc;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::attachment::handle::LocalHandle;

/// An attachment on a draft.
#[derive(Debug)]
pub struct AttachmentCandidate {
    /// File name shown to the user and sent with the payload.
    pub file_name: String,

    /// MIME content type (e.g. `"image/jpeg"`, `"application/pdf"`).
    pub mime_type: String,

    /// Size in bytes.
    pub size_bytes: u64,

    /// Where the content lives.
    pub source: AttachmentSource,
}

/// Backing storage of an attachment.
#[derive(Debug)]
pub enum AttachmentSource {
    /// Converted in this session.
    Local {
        handle: LocalHandle,
        content: Arc<[u8]>,
        /// Lowercase hex SHA-256 of `content`.
        sha256: String,
    },
    /// Stored by a previous save.
    Persisted { url: String },
}

impl AttachmentCandidate {
    /// An attachment that was already stored by an earlier save.
    pub fn persisted(saved: SavedAttachment) -> Self {
        Self {
            file_name: saved.file_name,
            mime_type: saved.mime_type,
            size_bytes: saved.size_bytes,
            source: AttachmentSource::Persisted { url: saved.url },
        }
    }

    /// `true` if the attachment came from an earlier save.
    pub fn is_persisted(&self) -> bool {
        matches!(self.source, AttachmentSource::Persisted { .. })
    }

    /// URI usable for previews: the local handle URI or the stored URL.
    pub fn preview_uri(&self) -> &str {
        match &self.source {
            AttachmentSource::Local { handle, .. } => handle.uri(),
            AttachmentSource::Persisted { url } => url,
        }
    }

    /// Base64 `data:` URI of the content, for local attachments only.
    pub fn data_uri(&self) -> Option<String> {
        match &self.source {
            AttachmentSource::Local { content, .. } => Some(format!(
                "data:{};base64,{}",
                self.mime_type,
                base64::engine::general_purpose::STANDARD.encode(content)
            )),
            AttachmentSource::Persisted { .. } => None,
        }
    }
}

/// Attachment metadata as returned by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub url: String,
}
