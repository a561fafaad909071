//! Placeholder snippets: the variable catalog and the text validator.

pub mod catalog;
pub mod validate;

pub use catalog::VariableCatalog;
pub use validate::{SnippetIssue, SnippetValidator};
