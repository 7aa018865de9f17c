//! Splits a merged message into its complete and missing parts.

use crate::message::MessageTemplate;
use crate::plural::{CategorySet, PluralCategory};

pub(crate) struct Split {
    pub active: Option<MessageTemplate>,
    pub translate: Option<MessageTemplate>,
}

/// Categories a target language must translate for a source message.
///
/// A source message with a single form has no grammatical number
/// variation, so "other" alone is enough in every language.
pub fn required_categories(source: &MessageTemplate, rule: CategorySet) -> CategorySet {
    if source.categories().len() == 1 {
        CategorySet::OTHER
    } else {
        rule
    }
}

/// Every required category ends up in exactly one side: in `active` when
/// the merged translation has it, otherwise in `translate` seeded with the
/// source text.
pub(crate) fn split(source: &MessageTemplate, merged: &MessageTemplate, rule: CategorySet) -> Split {
    let draft = source
        .shared_template(PluralCategory::Other)
        .or_else(|| source.templates_shared().next());

    let mut active: Option<MessageTemplate> = None;
    let mut translate: Option<MessageTemplate> = None;

    for category in required_categories(source, rule).categories() {
        match merged.shared_template(category) {
            Some(template) => active
                .get_or_insert_with(|| merged.header())
                .set_template(category, template.clone()),
            None => {
                if let Some(draft) = draft {
                    translate
                        .get_or_insert_with(|| merged.header())
                        .set_template(category, draft.clone());
                }
            }
        }
    }

    Split { active, translate }
}
