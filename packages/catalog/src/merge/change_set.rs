//! Change Set
//!
//! The files a merge result turns into. Nothing here touches the file
//! system; callers encode each document and apply writes and deletes
//! themselves, in order.

use super::{MergeEngine, MergeResult};
use crate::language::LanguageTag;
use crate::plural::PluralRuleProvider;
use serde_json::Value;
use std::path::{Path, PathBuf};

const TRANSLATE_PREFIX: &str = "translate";
const ACTIVE_PREFIX: &str = "active";

/// One output file: its path and the document tree to encode into it.
#[derive(Debug, Clone, PartialEq)]
pub struct FileWrite {
    pub path: PathBuf,
    pub tag: LanguageTag,
    pub content: Value,
}

/// Writes and deletes produced by one merge. Not atomic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub writes: Vec<FileWrite>,
    pub deletes: Vec<PathBuf>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.deletes.is_empty()
    }

    pub fn write_for(&self, path: impl AsRef<Path>) -> Option<&FileWrite> {
        let path = path.as_ref();
        self.writes.iter().find(|w| w.path == path)
    }
}

fn file_path(out_dir: &Path, prefix: &str, tag: &LanguageTag, format: &str) -> PathBuf {
    out_dir.join(format!("{}.{}.{}", prefix, tag, format))
}

impl MergeResult {
    /// Lay the result out as `translate.<tag>.<format>` and
    /// `active.<tag>.<format>` files under `out_dir`.
    pub fn change_set(&self, out_dir: impl AsRef<Path>, format: &str) -> ChangeSet {
        let out_dir = out_dir.as_ref();
        let mut change_set = ChangeSet::default();

        for (tag, locale) in self.iter() {
            let is_source = tag == self.source_tag();
            if !locale.translate.is_empty() {
                change_set.writes.push(FileWrite {
                    path: file_path(out_dir, TRANSLATE_PREFIX, tag, format),
                    tag: tag.clone(),
                    content: locale.translate.to_value(is_source),
                });
            }

            let active_path = file_path(out_dir, ACTIVE_PREFIX, tag, format);
            if locale.delete_active {
                change_set.deletes.push(active_path);
            } else if !locale.active.is_empty() {
                change_set.writes.push(FileWrite {
                    path: active_path,
                    tag: tag.clone(),
                    content: locale.active.to_value(is_source),
                });
            }
        }

        tracing::debug!(
            writes = change_set.writes.len(),
            deletes = change_set.deletes.len(),
            "planned catalog files"
        );
        change_set
    }
}

impl<R: PluralRuleProvider> MergeEngine<R> {
    /// Change set for `result` using the configured output directory and
    /// format.
    pub fn change_set(&self, result: &MergeResult) -> ChangeSet {
        let options = self.options();
        result.change_set(&options.out_dir, &options.format)
    }
}
