//! Core data model types: variables, template kinds, drafts, and attachments.

pub mod attachment;
pub mod draft;
pub mod file;
pub mod kind;
pub mod variable;
