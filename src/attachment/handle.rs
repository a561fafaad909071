//! Local resource handles for attachments converted in this session.
//!
//! A handle pins the converted bytes under a `blob:` URI so previews can
//! refer to them. Dropping the handle releases the entry, which makes
//! "remove from draft" and "discard draft" release resources synchronously.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

const URI_PREFIX: &str = "blob:outreachkit/";

/// Registry of live local resources.
///
/// Cheap to clone; clones share the same entries.
#[derive(Clone, Default)]
pub struct LocalResourceRegistry {
    entries: Arc<DashMap<Uuid, Arc<[u8]>>>,
}

impl LocalResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `content` and return the handle that owns it.
    pub fn register(&self, content: Arc<[u8]>) -> LocalHandle {
        let id = Uuid::new_v4();
        self.entries.insert(id, content);
        tracing::trace!(%id, "Registered local resource");
        LocalHandle {
            id,
            uri: format!("{URI_PREFIX}{id}"),
            entries: Arc::clone(&self.entries),
        }
    }

    /// Look up the bytes behind a `blob:` URI, if still live.
    pub fn resolve(&self, uri: &str) -> Option<Arc<[u8]>> {
        let id = uri.strip_prefix(URI_PREFIX)?.parse::<Uuid>().ok()?;
        self.entries.get(&id).map(|e| Arc::clone(e.value()))
    }

    /// Number of handles not yet released.
    pub fn live_handles(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for LocalResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalResourceRegistry")
            .field("live_handles", &self.entries.len())
            .finish()
    }
}

/// Owner of one registry entry. Not `Clone`: exactly one owner releases it.
pub struct LocalHandle {
    id: Uuid,
    uri: String,
    entries: Arc<DashMap<Uuid, Arc<[u8]>>>,
}

impl LocalHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Drop for LocalHandle {
    fn drop(&mut self) {
        if self.entries.remove(&self.id).is_some() {
            tracing::trace!(id = %self.id, "Released local resource");
        }
    }
}

impl fmt::Debug for LocalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalHandle").field("uri", &self.uri).finish()
    }
}
