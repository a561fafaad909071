//! MIME allow-list and extension-based type guessing.

use std::collections::HashSet;

/// Types accepted by default: images, documents, spreadsheets,
/// presentations, video, audio, and archives.
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    // Images
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    // Documents
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "application/rtf",
    // Spreadsheets
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/csv",
    // Presentations
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    // Video
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "video/webm",
    // Audio
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/ogg",
    // Archives
    "application/zip",
    "application/x-zip-compressed",
    "application/x-rar-compressed",
    "application/x-7z-compressed",
];

/// Extension → MIME table used when a file comes from disk.
const EXTENSION_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
    ("rtf", "application/rtf"),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("csv", "text/csv"),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("mp4", "video/mp4"),
    ("mpeg", "video/mpeg"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("zip", "application/zip"),
    ("rar", "application/x-rar-compressed"),
    ("7z", "application/x-7z-compressed"),
];

/// Set of accepted MIME types.
///
/// A file is permitted when its MIME type is listed (case-insensitive) or
/// when its file extension equals the subtype of a listed type
/// (`application/pdf` admits `*.pdf`, `video/mp4` admits `*.mp4`).
#[derive(Debug, Clone)]
pub struct MimeAllowList {
    types: HashSet<String>,
    extensions: HashSet<String>,
}

impl MimeAllowList {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types: HashSet<String> = types
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        let extensions = types
            .iter()
            .filter_map(|t| t.split_once('/').map(|(_, sub)| sub.to_string()))
            .collect();
        Self { types, extensions }
    }

    /// Whether a file with this declared type and name may be attached.
    pub fn permits(&self, mime_type: &str, file_name: &str) -> bool {
        if self.types.contains(&mime_type.trim().to_lowercase()) {
            return true;
        }
        extension_of(file_name).is_some_and(|ext| self.extensions.contains(&ext))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for MimeAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_MIME_TYPES)
    }
}

/// Lowercased extension after the last dot, if any.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Best-effort MIME type for a file name.
pub fn guess_mime_type(file_name: &str) -> &'static str {
    extension_of(file_name)
        .and_then(|ext| {
            EXTENSION_TYPES
                .iter()
                .find(|(e, _)| *e == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or("application/octet-stream")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_match_is_case_insensitive() {
        let list = MimeAllowList::default();
        assert!(list.permits("IMAGE/PNG", "whatever"));
        assert!(list.permits("application/pdf", "x"));
        assert!(!list.permits("application/x-msdownload", "setup.exe"));
    }

    #[test]
    fn test_extension_fallback_uses_subtypes() {
        let list = MimeAllowList::default();
        // Unknown declared type, but ".pdf" matches the subtype of application/pdf.
        assert!(list.permits("", "report.PDF"));
        assert!(list.permits("application/octet-stream", "clip.mp4"));
        // "docx" is not a subtype of any listed type.
        assert!(!list.permits("application/octet-stream", "letter.docx"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.tar.GZ").as_deref(), Some("gz"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".bashrc"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("photo.JPG"), "image/jpeg");
        assert_eq!(
            guess_mime_type("deck.pptx"),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
        assert_eq!(guess_mime_type("binary.bin"), "application/octet-stream");
    }

    #[test]
    fn test_custom_list() {
        let list = MimeAllowList::new(["image/png"]);
        assert_eq!(list.len(), 1);
        assert!(list.permits("image/png", "a.png"));
        assert!(!list.permits("image/jpeg", "a.jpg"));
        assert!(list.permits("", "b.png"));
    }
}
