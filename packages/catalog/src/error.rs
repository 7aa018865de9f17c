//! Error Module
//!
//! Error types for merging, parsing and template rendering.

use crate::plural::PluralCategory;
use thiserror::Error;

/// Fatal merge conditions. Anything else is absorbed into the
/// active/translate split.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("multiple source translations for id {id:?} in locale {tag}")]
    DuplicateSourceMessage { id: String, tag: String },

    #[error("no messages found for source locale {tag}")]
    EmptySourceCatalog { tag: String },
}

/// Errors while turning a decoded document into messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid translation file, expected key-values, got a single value")]
    InvalidFile,

    #[error("unsupported value {0}")]
    UnsupportedValue(String),

    #[error("expected value for key {key:?} be a string but got {value}")]
    ExpectedString { key: String, value: String },

    #[error(transparent)]
    Language(#[from] LanguageTagError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid language tag {tag:?}")]
pub struct LanguageTagError {
    pub tag: String,
}

/// Template compilation and execution errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("template: {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("template: {0}")]
    Exec(String),

    #[error("template: function {0:?} not defined")]
    UnknownFunction(String),

    #[error("template: unusable delimiters [{left:?}, {right:?}]")]
    InvalidDelimiters { left: String, right: String },

    #[error("message {message_id:?} has no plural form \"{category}\"")]
    PluralFormNotFound {
        message_id: String,
        category: PluralCategory,
    },
}

impl TemplateError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        TemplateError::Parse {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn exec(message: impl Into<String>) -> Self {
        TemplateError::Exec(message.into())
    }
}
