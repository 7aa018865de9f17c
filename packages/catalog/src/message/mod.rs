//! Message Module
//!
//! Translatable messages and their compiled per-category templates.

pub mod parse;
pub mod template;

pub use parse::parse_messages;
pub use template::MessageTemplate;

use crate::plural::PluralCategory;
use crate::template::Delimiters;
use serde::{Deserialize, Serialize};

/// A translatable message as read from a catalog.
///
/// Each plural category holds raw template source. `None` means the
/// category is absent. `Some("")` is kept as read, but
/// [`MessageTemplate::new`] treats it as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    /// Unique within its catalog
    pub id: String,
    /// Fingerprint of the source content this translation was made from
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hash: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub left_delim: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub right_delim: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub few: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub many: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

impl Message {
    pub fn new(id: impl Into<String>) -> Self {
        Message {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with(mut self, category: PluralCategory, src: impl Into<String>) -> Self {
        self.set_form(category, Some(src.into()));
        self
    }

    pub fn with_other(self, src: impl Into<String>) -> Self {
        self.with(PluralCategory::Other, src)
    }

    pub fn with_one(self, src: impl Into<String>) -> Self {
        self.with(PluralCategory::One, src)
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_delimiters(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_delim = left.into();
        self.right_delim = right.into();
        self
    }

    pub fn form(&self, category: PluralCategory) -> Option<&str> {
        self.slot(category).as_deref()
    }

    pub fn set_form(&mut self, category: PluralCategory, src: Option<String>) {
        *self.slot_mut(category) = src;
    }

    /// Present categories in canonical order.
    pub fn forms(&self) -> impl Iterator<Item = (PluralCategory, &str)> + '_ {
        PluralCategory::ALL
            .into_iter()
            .filter_map(move |c| self.form(c).map(|src| (c, src)))
    }

    pub fn delimiters(&self) -> Delimiters {
        Delimiters::from_message(&self.left_delim, &self.right_delim)
    }

    fn slot(&self, category: PluralCategory) -> &Option<String> {
        match category {
            PluralCategory::Zero => &self.zero,
            PluralCategory::One => &self.one,
            PluralCategory::Two => &self.two,
            PluralCategory::Few => &self.few,
            PluralCategory::Many => &self.many,
            PluralCategory::Other => &self.other,
        }
    }

    fn slot_mut(&mut self, category: PluralCategory) -> &mut Option<String> {
        match category {
            PluralCategory::Zero => &mut self.zero,
            PluralCategory::One => &mut self.one,
            PluralCategory::Two => &mut self.two,
            PluralCategory::Few => &mut self.few,
            PluralCategory::Many => &mut self.many,
            PluralCategory::Other => &mut self.other,
        }
    }
}
