#![deny(clippy::all)]

/**
 * i18n Catalog - message catalog merging and plural-aware templates
 *
 * Reconciles translated catalogs against a source catalog and renders
 * locale-specific text from per-plural-category templates.
 */

// Core modules
pub mod config;
pub mod digest;
pub mod error;
pub mod language;

// Catalog modules
pub mod catalog;
pub mod merge;
pub mod message;
pub mod plural;
pub mod template;

// Re-exports
pub use catalog::{parse_path, Catalog, RawCatalog};
pub use config::MergeOptions;
pub use digest::fingerprint;
pub use error::{LanguageTagError, MergeError, ParseError, TemplateError};
pub use language::LanguageTag;
pub use merge::{ChangeSet, FileWrite, LocaleCatalogs, MergeEngine, MergeResult};
pub use message::{parse_messages, Message, MessageTemplate};
pub use plural::{CategorySet, CldrPluralRules, PluralCategory, PluralRuleProvider};
pub use template::{Delimiters, FunctionTable, Template};
