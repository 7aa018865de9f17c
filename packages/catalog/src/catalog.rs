//! Catalog Module
//!
//! Raw input catalogs as read from disk and compiled per-locale catalogs.

use crate::error::ParseError;
use crate::language::LanguageTag;
use crate::message::{parse_messages, Message, MessageTemplate};
use crate::plural::{CategorySet, PluralCategory};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

// `<anything>.<tag>.<format>` on the file name, the prefix being optional.
static FILE_NAME_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:.*\.)?([^.]*)\.([^.]*)$").expect("file name pattern is valid")
});

/// Split a catalog file path into its language tag and format parts.
///
/// `active.en-US.toml` gives `("en-US", "toml")`, `fr.json` gives
/// `("fr", "json")`. A file name without a dot yields empty strings.
pub fn parse_path(path: &str) -> (&str, &str) {
    let file_name = path.rsplit(&['/', '\\'][..]).next().unwrap_or(path);
    match FILE_NAME_REGEXP.captures(file_name) {
        Some(caps) => {
            let tag = caps.get(1).map_or("", |m| m.as_str());
            let format = caps.get(2).map_or("", |m| m.as_str());
            (tag, format)
        }
        None => ("", ""),
    }
}

/// Messages from one input file, before any compilation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawCatalog {
    /// Where the messages came from, for diagnostics only
    pub path: String,
    pub tag: LanguageTag,
    pub messages: Vec<Message>,
}

impl RawCatalog {
    pub fn new(tag: LanguageTag, messages: Vec<Message>) -> Self {
        RawCatalog {
            path: String::new(),
            tag,
            messages,
        }
    }

    /// Build a raw catalog from a decoded document, taking the language
    /// from the file name. Files without one are attributed to
    /// `default_tag`.
    pub fn from_value(
        path: &str,
        document: &Value,
        default_tag: &LanguageTag,
    ) -> Result<Self, ParseError> {
        let (tag, _format) = parse_path(path);
        let tag = LanguageTag::parse(tag)?.or_default(default_tag);
        let messages = parse_messages(document)?;
        tracing::trace!(path, %tag, count = messages.len(), "parsed catalog file");
        Ok(RawCatalog {
            path: path.to_string(),
            tag,
            messages,
        })
    }
}

/// Compiled message templates for one language, keyed by message id.
/// Iteration follows insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    tag: LanguageTag,
    messages: IndexMap<String, MessageTemplate>,
}

impl Catalog {
    pub fn new(tag: LanguageTag) -> Self {
        Catalog {
            tag,
            messages: IndexMap::new(),
        }
    }

    /// Compile messages into a catalog. Messages without any form are
    /// dropped; a repeated id replaces the earlier message.
    pub fn from_messages(tag: LanguageTag, messages: impl IntoIterator<Item = Message>) -> Self {
        let mut catalog = Catalog::new(tag);
        for template in messages.into_iter().filter_map(MessageTemplate::new) {
            catalog.insert(template);
        }
        catalog
    }

    pub fn tag(&self) -> &LanguageTag {
        &self.tag
    }

    pub fn get(&self, id: &str) -> Option<&MessageTemplate> {
        self.messages.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.messages.contains_key(id)
    }

    /// Insert a template, returning the one it replaced.
    pub fn insert(&mut self, template: MessageTemplate) -> Option<MessageTemplate> {
        self.messages.insert(template.id.clone(), template)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.messages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageTemplate> + '_ {
        self.messages.values()
    }

    /// Encoder-ready document tree.
    ///
    /// Source catalogs carry no hash, and a source message that only has an
    /// "other" form and no metadata collapses to its bare text.
    pub fn to_value(&self, is_source: bool) -> Value {
        let mut document = Map::with_capacity(self.messages.len());
        for (id, template) in &self.messages {
            document.insert(id.clone(), message_value(template, is_source));
        }
        Value::Object(document)
    }
}

fn message_value(template: &MessageTemplate, is_source: bool) -> Value {
    let other_only = template.categories() == CategorySet::OTHER;
    if is_source
        && other_only
        && template.description.is_empty()
        && template.left_delim.is_empty()
        && template.right_delim.is_empty()
    {
        let src = template.src(PluralCategory::Other).unwrap_or_default();
        return Value::String(src.to_string());
    }

    let mut fields = Map::new();
    if !template.description.is_empty() {
        fields.insert("description".into(), template.description.clone().into());
    }
    if !is_source {
        fields.insert("hash".into(), template.hash.clone().into());
    }
    if !template.left_delim.is_empty() {
        fields.insert("leftDelim".into(), template.left_delim.clone().into());
    }
    if !template.right_delim.is_empty() {
        fields.insert("rightDelim".into(), template.right_delim.clone().into());
    }
    for (category, compiled) in template.templates() {
        fields.insert(category.to_string(), compiled.src().into());
    }
    Value::Object(fields)
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a MessageTemplate;
    type IntoIter = indexmap::map::Values<'a, String, MessageTemplate>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.values()
    }
}
