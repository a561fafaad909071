//! Incoming files, as handed over by a file picker.
//!
//! Metadata (name, type, size) is available up front so constraint checks
//! can run synchronously. Content is only read when an accepted file is
//! converted into an attachment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::attachment::mime::guess_mime_type;
use crate::error::{OutreachError, Result};

/// Asynchronous accessor for the raw bytes of a file.
#[async_trait]
pub trait ByteSource: Send + Sync + fmt::Debug {
    async fn read_all(&self) -> std::io::Result<Vec<u8>>;
}

/// Bytes already held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource(Arc<[u8]>);

impl MemorySource {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.0.to_vec())
    }
}

/// A file on the local filesystem, read on demand.
#[derive(Debug, Clone)]
pub struct PathSource(PathBuf);

impl PathSource {
    pub fn new(path: &Path) -> Self {
        Self(path.to_path_buf())
    }
}

#[async_trait]
impl ByteSource for PathSource {
    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.0).await
    }
}

/// A file selected by the user, not yet checked or converted.
#[derive(Debug, Clone)]
pub struct RawFile {
    /// File name as reported by the picker (no directory part).
    pub name: String,

    /// Declared MIME type. May be empty when the platform does not know it.
    pub mime_type: String,

    /// Length in bytes.
    pub size_bytes: u64,

    source: Arc<dyn ByteSource>,
}

impl RawFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        source: Arc<dyn ByteSource>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            source,
        }
    }

    /// Wrap an in-memory buffer. The size is taken from the buffer.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        let size = bytes.len() as u64;
        Self::new(name, mime_type, size, Arc::new(MemorySource::new(bytes)))
    }

    /// Describe a file on disk. The MIME type is guessed from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(OutreachError::FileNotFound(path.to_path_buf()));
        }
        let meta = std::fs::metadata(path).map_err(|e| OutreachError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = guess_mime_type(&name).to_string();

        Ok(Self::new(
            name,
            mime_type,
            meta.len(),
            Arc::new(PathSource::new(path)),
        ))
    }

    /// Read the full content.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        self.source.read_all().await
    }
}
