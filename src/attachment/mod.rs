//! Attachment handling: constraint checks, type allow-list, conversion,
//! and local resource handles.

pub mod constraints;
pub mod convert;
pub mod handle;
pub mod mime;

pub use constraints::{
    AttachmentChecker, AttachmentLimits, BatchOutcome, Rejection, RejectionReason,
};
pub use handle::{LocalHandle, LocalResourceRegistry};
