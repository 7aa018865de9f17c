//! Merge Module
//!
//! Reconciles translated catalogs against the source catalog and splits
//! every target language into what is done (active) and what still needs
//! a translator (translate).

pub mod change_set;
mod partition;

pub use change_set::{ChangeSet, FileWrite};
pub use partition::required_categories;

use crate::catalog::{Catalog, RawCatalog};
use crate::config::MergeOptions;
use crate::digest::fingerprint;
use crate::error::MergeError;
use crate::language::LanguageTag;
use crate::message::MessageTemplate;
use crate::plural::{CategorySet, CldrPluralRules, PluralCategory, PluralRuleProvider};
use indexmap::IndexMap;
use tracing::{debug, info_span};

/// Active and translate catalogs for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleCatalogs {
    /// Messages whose required categories are all translated
    pub active: Catalog,
    /// Missing categories, pre-filled with the source text as a draft
    pub translate: Catalog,
    /// Nothing is complete for this language, so its active file goes away
    pub delete_active: bool,
}

/// Outcome of a merge run, one entry per language in first-seen order.
/// The source language always comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    source_tag: LanguageTag,
    locales: IndexMap<LanguageTag, LocaleCatalogs>,
}

impl MergeResult {
    pub fn source_tag(&self) -> &LanguageTag {
        &self.source_tag
    }

    pub fn get(&self, tag: &LanguageTag) -> Option<&LocaleCatalogs> {
        self.locales.get(tag)
    }

    pub fn active(&self, tag: &LanguageTag) -> Option<&Catalog> {
        self.get(tag).map(|l| &l.active)
    }

    pub fn translate(&self, tag: &LanguageTag) -> Option<&Catalog> {
        self.get(tag).map(|l| &l.translate)
    }

    pub fn tags(&self) -> impl Iterator<Item = &LanguageTag> + '_ {
        self.locales.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LanguageTag, &LocaleCatalogs)> + '_ {
        self.locales.iter()
    }

    /// Languages whose active file should be removed.
    pub fn deleted_tags(&self) -> impl Iterator<Item = &LanguageTag> + '_ {
        self.locales
            .iter()
            .filter(|(_, l)| l.delete_active)
            .map(|(tag, _)| tag)
    }
}

/// Runs merges for one source language with one set of plural rules.
#[derive(Debug, Clone)]
pub struct MergeEngine<R = CldrPluralRules> {
    options: MergeOptions,
    rules: R,
}

impl MergeEngine<CldrPluralRules> {
    pub fn with_default_rules(options: MergeOptions) -> Self {
        MergeEngine::new(options, CldrPluralRules::new())
    }
}

impl<R: PluralRuleProvider> MergeEngine<R> {
    pub fn new(options: MergeOptions, rules: R) -> Self {
        MergeEngine {
            options: options.normalized(),
            rules,
        }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    pub fn source_tag(&self) -> &LanguageTag {
        &self.options.source_language
    }

    /// Merge all input catalogs.
    ///
    /// Only a duplicated source id or an empty source catalog fail the run.
    /// Unsupported languages, stale translations and missing categories
    /// are sorted into the result instead.
    pub fn merge(&self, inputs: Vec<RawCatalog>) -> Result<MergeResult, MergeError> {
        let span = info_span!("merge", source = %self.source_tag(), inputs = inputs.len());
        let _enter = span.enter();

        let Ingested { source, unmerged } = self.ingest(inputs)?;
        let reconciled = self.reconcile(&source, &unmerged);
        Ok(self.partition(source, reconciled))
    }

    // Compile every input and collect the source catalog.
    fn ingest(&self, inputs: Vec<RawCatalog>) -> Result<Ingested, MergeError> {
        let source_tag = self.source_tag().clone();
        let mut source = Catalog::new(source_tag.clone());
        let mut unmerged: IndexMap<LanguageTag, Vec<Catalog>> = IndexMap::new();

        for raw in inputs {
            let tag = raw.tag.or_default(&self.options.default_language);
            let is_source = tag == source_tag;
            let mut catalog = Catalog::new(tag.clone());

            for message in raw.messages {
                if message.id.is_empty() {
                    debug!(path = %raw.path, %tag, "dropping message without id");
                    continue;
                }
                let Some(template) = MessageTemplate::new(message) else {
                    continue;
                };
                if is_source {
                    if source.contains(&template.id) {
                        return Err(MergeError::DuplicateSourceMessage {
                            id: template.id,
                            tag: tag.to_string(),
                        });
                    }
                    let mut sourced = template.clone();
                    sourced.hash = source_fingerprint(&sourced);
                    source.insert(sourced);
                }
                catalog.insert(template);
            }
            unmerged.entry(tag).or_default().push(catalog);
        }

        if source.is_empty() {
            return Err(MergeError::EmptySourceCatalog {
                tag: source_tag.to_string(),
            });
        }
        debug!(messages = source.len(), locales = unmerged.len(), "ingested catalogs");
        Ok(Ingested { source, unmerged })
    }

    // Fold every target language's files into one merged catalog per
    // language, keyed by source id.
    fn reconcile(
        &self,
        source: &Catalog,
        unmerged: &IndexMap<LanguageTag, Vec<Catalog>>,
    ) -> IndexMap<LanguageTag, (CategorySet, Catalog)> {
        let mut reconciled = IndexMap::new();

        for (tag, catalogs) in unmerged {
            if tag == source.tag() {
                continue;
            }
            let Some(rule) = self.rules.rule(tag) else {
                debug!(%tag, "no plural rule for language, skipping");
                continue;
            };

            let mut merged = Catalog::new(tag.clone());
            for src in source {
                let mut target = src.header();
                for candidate in catalogs.iter().filter_map(|c| c.get(&src.id)) {
                    if !candidate.hash.is_empty() && candidate.hash != src.hash {
                        debug!(%tag, id = %src.id, "translation is stale");
                        continue;
                    }
                    for category in rule.categories() {
                        if let Some(template) = candidate.shared_template(category) {
                            target.set_template(category, template.clone());
                        }
                    }
                }
                merged.insert(target);
            }
            reconciled.insert(tag.clone(), (rule, merged));
        }
        reconciled
    }

    fn partition(
        &self,
        source: Catalog,
        reconciled: IndexMap<LanguageTag, (CategorySet, Catalog)>,
    ) -> MergeResult {
        let source_tag = source.tag().clone();
        let mut locales = IndexMap::with_capacity(reconciled.len() + 1);
        locales.insert(
            source_tag.clone(),
            LocaleCatalogs {
                translate: Catalog::new(source_tag.clone()),
                active: source.clone(),
                delete_active: false,
            },
        );

        for (tag, (rule, merged)) in reconciled {
            let mut active = Catalog::new(tag.clone());
            let mut translate = Catalog::new(tag.clone());
            for src in &source {
                let Some(target) = merged.get(&src.id) else {
                    continue;
                };
                let split = partition::split(src, target, rule);
                if let Some(missing) = &split.translate {
                    debug!(%tag, id = %src.id, missing = missing.categories().len(), "needs translation");
                }
                if let Some(done) = split.active {
                    active.insert(done);
                }
                if let Some(missing) = split.translate {
                    translate.insert(missing);
                }
            }
            let delete_active = active.is_empty();
            locales.insert(
                tag,
                LocaleCatalogs {
                    active,
                    translate,
                    delete_active,
                },
            );
        }

        MergeResult {
            source_tag,
            locales,
        }
    }
}

struct Ingested {
    source: Catalog,
    unmerged: IndexMap<LanguageTag, Vec<Catalog>>,
}

fn source_fingerprint(template: &MessageTemplate) -> String {
    let other = template.src(PluralCategory::Other).unwrap_or_default();
    fingerprint(&template.description, other)
}
