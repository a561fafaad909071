//! `outreachkit`: validation core for outreach message templates.
//!
//! This crate checks `{{placeholder}}` snippets against a closed variable
//! catalog, keeps fallback text free of placeholders, applies per-channel
//! length limits, and enforces attachment count, size and type constraints
//! before a template is handed to persistence.

pub mod attachment;
pub mod composer;
pub mod config;
pub mod error;
pub mod i18n;
pub mod loader;
pub mod model;
pub mod snippet;
