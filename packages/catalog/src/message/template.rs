//! Message Templates
//!
//! A message with one compiled template per present plural category.

use super::Message;
use crate::error::TemplateError;
use crate::plural::{CategorySet, PluralCategory};
use crate::template::{FunctionTable, Template};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Executable form of a [`Message`].
///
/// Templates are shared through `Arc`, so merged catalogs can adopt a
/// translation without recompiling it.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageTemplate {
    pub id: String,
    pub hash: String,
    pub description: String,
    pub left_delim: String,
    pub right_delim: String,
    templates: BTreeMap<PluralCategory, Arc<Template>>,
}

impl MessageTemplate {
    /// Build the templates for a message. Empty sources count as absent.
    /// Returns `None` when no category is left.
    pub fn new(message: Message) -> Option<Self> {
        let delims = message.delimiters();
        let templates: BTreeMap<_, _> = message
            .forms()
            .filter(|(_, src)| !src.is_empty())
            .map(|(category, src)| (category, Arc::new(Template::new(src, delims.clone()))))
            .collect();
        if templates.is_empty() {
            return None;
        }
        Some(MessageTemplate {
            id: message.id,
            hash: message.hash,
            description: message.description,
            left_delim: message.left_delim,
            right_delim: message.right_delim,
            templates,
        })
    }

    /// Same id, hash, description and delimiters, no templates yet.
    pub(crate) fn header(&self) -> Self {
        MessageTemplate {
            id: self.id.clone(),
            hash: self.hash.clone(),
            description: self.description.clone(),
            left_delim: self.left_delim.clone(),
            right_delim: self.right_delim.clone(),
            templates: BTreeMap::new(),
        }
    }

    pub(crate) fn set_template(&mut self, category: PluralCategory, template: Arc<Template>) {
        self.templates.insert(category, template);
    }

    pub(crate) fn shared_template(&self, category: PluralCategory) -> Option<&Arc<Template>> {
        self.templates.get(&category)
    }

    pub(crate) fn templates_shared(&self) -> impl Iterator<Item = &Arc<Template>> + '_ {
        self.templates.values()
    }

    pub fn template(&self, category: PluralCategory) -> Option<&Template> {
        self.templates.get(&category).map(Arc::as_ref)
    }

    /// Present categories and their templates, in canonical order.
    pub fn templates(&self) -> impl Iterator<Item = (PluralCategory, &Template)> + '_ {
        self.templates.iter().map(|(c, t)| (*c, t.as_ref()))
    }

    pub fn categories(&self) -> CategorySet {
        self.templates.keys().copied().collect()
    }

    pub fn src(&self, category: PluralCategory) -> Option<&str> {
        self.template(category).map(Template::src)
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render one plural category.
    ///
    /// Asking for a category the message does not define is an error:
    /// callers are expected to pick from the categories the catalog has.
    pub fn execute<T>(
        &self,
        category: PluralCategory,
        data: &T,
        funcs: &FunctionTable,
    ) -> Result<String, TemplateError>
    where
        T: Serialize + ?Sized,
    {
        let template = self
            .template(category)
            .ok_or_else(|| TemplateError::PluralFormNotFound {
                message_id: self.id.clone(),
                category,
            })?;
        template.execute(data, funcs)
    }

    /// Back to a plain message, e.g. for handing to an encoder.
    pub fn to_message(&self) -> Message {
        let mut message = Message {
            id: self.id.clone(),
            hash: self.hash.clone(),
            description: self.description.clone(),
            left_delim: self.left_delim.clone(),
            right_delim: self.right_delim.clone(),
            ..Default::default()
        };
        for (category, template) in self.templates() {
            message.set_form(category, Some(template.src().to_string()));
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_without_forms_is_not_a_template() {
        assert!(MessageTemplate::new(Message::new("Empty")).is_none());
    }

    #[test]
    fn test_only_present_categories_are_compiled() {
        let template =
            MessageTemplate::new(Message::new("Cats").with_one("a cat").with_other("cats"))
                .unwrap();
        assert_eq!(
            template.categories(),
            CategorySet::ONE | CategorySet::OTHER
        );
        assert!(template.template(PluralCategory::Few).is_none());
    }

    #[test]
    fn test_execute_missing_category() {
        let template = MessageTemplate::new(Message::new("Cats").with_other("cats")).unwrap();
        let err = template
            .execute(PluralCategory::One, &json!({}), &FunctionTable::new())
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::PluralFormNotFound {
                message_id: "Cats".into(),
                category: PluralCategory::One,
            }
        );
        assert_eq!(err.to_string(), r#"message "Cats" has no plural form "one""#);
    }

    #[test]
    fn test_message_delimiters_reach_templates() {
        let template = MessageTemplate::new(
            Message::new("Legacy")
                .with_other("{{kept}} [[.Name]]")
                .with_delimiters("[[", "]]"),
        )
        .unwrap();
        let out = template
            .execute(PluralCategory::Other, &json!({"Name": "Ana"}), &FunctionTable::new())
            .unwrap();
        assert_eq!(out, "{{kept}} Ana");
    }

    #[test]
    fn test_round_trip_to_message() {
        let message = Message::new("Cats")
            .with_description("cat count")
            .with_one("a cat")
            .with_other("cats");
        let template = MessageTemplate::new(message.clone()).unwrap();
        assert_eq!(template.to_message(), message);
    }
}
