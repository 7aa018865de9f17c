//! Config Module
//!
//! Merge options, loadable from a JSON document.

use crate::language::LanguageTag;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Options controlling a merge run and where its output goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeOptions {
    /// Language the messages are authored in
    pub source_language: LanguageTag,
    /// Language assumed for input files whose name carries none
    pub default_language: LanguageTag,
    /// Directory the translate/active files are written to
    pub out_dir: PathBuf,
    /// Output format extension, e.g. `toml` or `json`
    pub format: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            source_language: LanguageTag::english(),
            default_language: LanguageTag::english(),
            out_dir: PathBuf::from("."),
            format: "toml".to_string(),
        }
    }
}

impl MergeOptions {
    pub fn new(source_language: LanguageTag) -> Self {
        MergeOptions {
            source_language,
            ..Default::default()
        }
    }

    /// Parse options from JSON. Missing fields take their defaults and an
    /// empty source language falls back to the default language.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: MergeOptions =
            serde_json::from_str(json).context("failed to parse merge options")?;
        Ok(options.normalized())
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub(crate) fn normalized(mut self) -> Self {
        if self.default_language.is_root() {
            self.default_language = LanguageTag::english();
        }
        self.source_language = self.source_language.or_default(&self.default_language);
        self
    }
}
