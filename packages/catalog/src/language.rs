//! Language Tags
//!
//! Normalized language identifiers. Equality follows the canonical form,
//! so `"EN_us"` and `"en-US"` are the same tag.

use crate::error::LanguageTagError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// A normalized language tag such as `en`, `en-US` or `zh-Hant`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LanguageTag(LanguageIdentifier);

impl LanguageTag {
    /// Parse and canonicalize a tag. An empty string is the root tag.
    pub fn parse(tag: &str) -> Result<Self, LanguageTagError> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        trimmed
            .parse::<LanguageIdentifier>()
            .map(LanguageTag)
            .map_err(|_| LanguageTagError {
                tag: tag.to_string(),
            })
    }

    /// The undetermined (`und`) tag.
    pub fn root() -> Self {
        LanguageTag(LanguageIdentifier::default())
    }

    pub fn english() -> Self {
        Self::parse("en").unwrap_or_default()
    }

    pub fn is_root(&self) -> bool {
        self.0 == LanguageIdentifier::default()
    }

    /// Replace the root tag with `default`, keep any other tag as is.
    pub fn or_default(self, default: &LanguageTag) -> Self {
        if self.is_root() {
            default.clone()
        } else {
            self
        }
    }

    /// The primary language subtag, lowercase (`zh` for `zh-Hant-TW`).
    pub fn primary_language(&self) -> String {
        let canonical = self.0.to_string();
        canonical
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    pub fn as_langid(&self) -> &LanguageIdentifier {
        &self.0
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LanguageTag {
    type Err = LanguageTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageTag::parse(s)
    }
}

impl From<LanguageIdentifier> for LanguageTag {
    fn from(id: LanguageIdentifier) -> Self {
        LanguageTag(id)
    }
}

impl Serialize for LanguageTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LanguageTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        LanguageTag::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_normalized() {
        let a = LanguageTag::parse("EN-us").unwrap();
        let b = LanguageTag::parse("en_US").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "en-US");
    }

    #[test]
    fn test_script_casing() {
        let tag = LanguageTag::parse("zh-hant").unwrap();
        assert_eq!(tag.to_string(), "zh-Hant");
        assert_eq!(tag.primary_language(), "zh");
    }

    #[test]
    fn test_root_falls_back_to_default() {
        let root = LanguageTag::parse("").unwrap();
        assert!(root.is_root());
        assert_eq!(root.or_default(&LanguageTag::english()).to_string(), "en");

        let fr = LanguageTag::parse("fr").unwrap();
        assert_eq!(fr.or_default(&LanguageTag::english()).to_string(), "fr");
    }

    #[test]
    fn test_invalid_tag() {
        assert!(LanguageTag::parse("not a tag!").is_err());
    }
}
