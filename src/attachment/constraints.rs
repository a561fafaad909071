//! Attachment batch constraints: count, per-file size, aggregate size, type.
//!
//! Rejections are data. A batch is processed strictly in order because each
//! decision depends on the running byte total left by the files before it.

use std::fmt;

use humansize::{format_size, BINARY};
use serde::Serialize;

use crate::i18n;
use crate::model::attachment::AttachmentCandidate;
use crate::model::file::RawFile;

use super::mime::MimeAllowList;

/// Maximum number of attachments on one template.
pub const MAX_FILE_COUNT: usize = 5;

/// Maximum size of a single attachment (1 MiB).
pub const MAX_SINGLE_FILE_BYTES: u64 = 1_048_576;

/// Maximum combined size of all attachments (50 MiB).
pub const MAX_TOTAL_BYTES: u64 = 52_428_800;

/// The constraint set applied to attachment batches.
#[derive(Debug, Clone)]
pub struct AttachmentLimits {
    pub max_file_count: usize,
    pub max_single_file_bytes: u64,
    pub max_total_bytes: u64,
    pub allow_list: MimeAllowList,
}

impl Default for AttachmentLimits {
    fn default() -> Self {
        Self {
            max_file_count: MAX_FILE_COUNT,
            max_single_file_bytes: MAX_SINGLE_FILE_BYTES,
            max_total_bytes: MAX_TOTAL_BYTES,
            allow_list: MimeAllowList::default(),
        }
    }
}

/// Why a file (or a whole batch) was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RejectionReason {
    /// The batch would push the draft over the file-count cap.
    TooManyFiles { max: usize },
    /// Neither the MIME type nor the extension is allowed.
    UnsupportedType,
    /// The file alone is larger than the per-file cap.
    ExceedsFileSize { limit: u64 },
    /// The file would push the draft over the aggregate cap.
    ExceedsTotalSize { limit: u64 },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::TooManyFiles { max } => f.write_str(&i18n::err_max_files(*max)),
            RejectionReason::UnsupportedType => f.write_str(i18n::err_unsupported_type()),
            RejectionReason::ExceedsFileSize { limit } => write!(
                f,
                "{} ({})",
                i18n::err_exceeds_size(),
                format_size(*limit, BINARY)
            ),
            RejectionReason::ExceedsTotalSize { limit } => write!(
                f,
                "{} ({})",
                i18n::err_total_exceeds(),
                format_size(*limit, BINARY)
            ),
        }
    }
}

/// One rejection. `file_name` is `None` when the whole batch was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub file_name: Option<String>,
    pub reason: RejectionReason,
}

impl Rejection {
    fn file(name: &str, reason: RejectionReason) -> Self {
        Self {
            file_name: Some(name.to_string()),
            reason,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file_name {
            Some(name) => write!(f, "{name}: {}", self.reason),
            None => write!(f, "{}", self.reason),
        }
    }
}

/// Result of checking one batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Files that may be converted and added, in input order.
    pub accepted: Vec<RawFile>,
    /// Files that must not be added, in the order they were rejected.
    pub rejections: Vec<Rejection>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty()
    }
}

/// Applies [`AttachmentLimits`] to incoming batches.
#[derive(Debug, Clone, Default)]
pub struct AttachmentChecker {
    limits: AttachmentLimits,
}

impl AttachmentChecker {
    pub fn new(limits: AttachmentLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &AttachmentLimits {
        &self.limits
    }

    /// Partition `incoming` into accepted files and rejections, given the
    /// attachments already on the draft.
    ///
    /// A batch that would exceed the file-count cap is refused as a whole.
    /// Otherwise files are taken in order; the first file that would break
    /// the aggregate cap ends the batch and later files are not evaluated.
    pub fn check_batch(
        &self,
        existing: &[AttachmentCandidate],
        incoming: Vec<RawFile>,
    ) -> BatchOutcome {
        let limits = &self.limits;
        let current_total: u64 = existing.iter().map(|a| a.size_bytes).sum();

        if incoming.len() + existing.len() > limits.max_file_count {
            tracing::debug!(
                existing = existing.len(),
                incoming = incoming.len(),
                max = limits.max_file_count,
                "Attachment batch exceeds file count"
            );
            return BatchOutcome {
                accepted: Vec::new(),
                rejections: vec![Rejection {
                    file_name: None,
                    reason: RejectionReason::TooManyFiles {
                        max: limits.max_file_count,
                    },
                }],
            };
        }

        let mut outcome = BatchOutcome::default();
        let mut running_total = current_total;

        for file in incoming {
            if !limits.allow_list.permits(&file.mime_type, &file.name) {
                outcome
                    .rejections
                    .push(Rejection::file(&file.name, RejectionReason::UnsupportedType));
                continue;
            }

            if file.size_bytes > limits.max_single_file_bytes {
                outcome.rejections.push(Rejection::file(
                    &file.name,
                    RejectionReason::ExceedsFileSize {
                        limit: limits.max_single_file_bytes,
                    },
                ));
                continue;
            }

            if running_total + file.size_bytes > limits.max_total_bytes {
                outcome.rejections.push(Rejection::file(
                    &file.name,
                    RejectionReason::ExceedsTotalSize {
                        limit: limits.max_total_bytes,
                    },
                ));
                break;
            }

            running_total += file.size_bytes;
            outcome.accepted.push(file);
        }

        tracing::debug!(
            accepted = outcome.accepted.len(),
            rejected = outcome.rejections.len(),
            total_bytes = running_total,
            "Checked attachment batch"
        );
        outcome
    }

    /// Check a converted batch against the draft it is about to join.
    ///
    /// Another batch may have been applied since this one was checked, so
    /// the count and aggregate caps are applied again to the draft as it is
    /// now. The batch is refused as a whole; `None` means it fits.
    pub fn recheck_converted(
        &self,
        existing: &[AttachmentCandidate],
        converted: &[AttachmentCandidate],
    ) -> Option<Rejection> {
        let limits = &self.limits;

        if existing.len() + converted.len() > limits.max_file_count {
            return Some(Rejection {
                file_name: None,
                reason: RejectionReason::TooManyFiles {
                    max: limits.max_file_count,
                },
            });
        }

        let total: u64 = existing
            .iter()
            .chain(converted)
            .map(|a| a.size_bytes)
            .sum();
        if total > limits.max_total_bytes {
            return Some(Rejection {
                file_name: None,
                reason: RejectionReason::ExceedsTotalSize {
                    limit: limits.max_total_bytes,
                },
            });
        }

        None
    }
}
