//! Default Configuration
//!
//! Action delimiters for message templates.

use crate::error::TemplateError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static UNUSABLE_DELIMITER_REGEXPS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\s*$").unwrap(), // empty
        Regex::new(r"\s").unwrap(),    // whitespace breaks trim markers
    ]
});

/// Action delimiters, `{{` and `}}` unless a message overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delimiters {
    pub left: String,
    pub right: String,
}

impl Delimiters {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Delimiters {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Delimiters as stored on a message, where an empty string means
    /// "use the default" for that side.
    pub fn from_message(left: &str, right: &str) -> Self {
        let default = default_delimiters();
        Delimiters {
            left: if left.is_empty() { default.left } else { left.to_string() },
            right: if right.is_empty() { default.right } else { right.to_string() },
        }
    }

    pub fn validate(&self) -> Result<(), TemplateError> {
        for regexp in UNUSABLE_DELIMITER_REGEXPS.iter() {
            if regexp.is_match(&self.left) || regexp.is_match(&self.right) {
                return Err(TemplateError::InvalidDelimiters {
                    left: self.left.clone(),
                    right: self.right.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        default_delimiters()
    }
}

/// Default delimiters {{ }}
pub fn default_delimiters() -> Delimiters {
    Delimiters::new("{{", "}}")
}
