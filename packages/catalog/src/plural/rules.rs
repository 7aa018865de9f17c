//! Plural Rule Providers
//!
//! Maps a language tag to the plural categories the language
//! distinguishes. Category sets follow the CLDR cardinal rules.

use super::category::PluralCategory::{Few, Many, One, Other, Two, Zero};
use super::category::{CategorySet, PluralCategory};
use crate::language::LanguageTag;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Resolves the plural categories a language needs.
///
/// `None` means the language is unknown. The merge cannot judge whether a
/// translation is complete for such a language, so the tag is left out.
pub trait PluralRuleProvider {
    fn rule(&self, tag: &LanguageTag) -> Option<CategorySet>;
}

impl<F> PluralRuleProvider for F
where
    F: Fn(&LanguageTag) -> Option<CategorySet>,
{
    fn rule(&self, tag: &LanguageTag) -> Option<CategorySet> {
        self(tag)
    }
}

static CLDR_CARDINALS: Lazy<HashMap<&'static str, CategorySet>> = Lazy::new(|| {
    let groups: &[(&[PluralCategory], &[&str])] = &[
        (
            &[Other],
            &[
                "bm", "bo", "dz", "id", "ig", "ii", "in", "ja", "jbo", "jv", "jw", "kde", "kea",
                "km", "ko", "lkt", "lo", "ms", "my", "nqo", "root", "sah", "ses", "sg", "th",
                "to", "vi", "wo", "yo", "yue", "zh",
            ],
        ),
        (
            &[One, Other],
            &[
                "af", "ak", "am", "an", "as", "asa", "ast", "az", "bem", "bez", "bg", "bh", "bn",
                "brx", "ca", "ce", "cgg", "chr", "ckb", "da", "de", "dv", "ee", "el", "en", "eo",
                "es", "et", "eu", "fa", "ff", "fi", "fil", "fo", "fr", "fur", "fy", "gl", "gsw",
                "gu", "guw", "ha", "haw", "hi", "hu", "hy", "ia", "io", "is", "it", "jgo", "ji",
                "jmc", "ka", "kab", "kaj", "kcg", "kk", "kkj", "kl", "ks", "ksb", "ku", "ky",
                "lb", "lg", "ln", "mas", "mg", "mgo", "mk", "ml", "mn", "mr", "nah", "nb", "nd",
                "ne", "nl", "nn", "nnh", "no", "nr", "nso", "ny", "nyn", "om", "or", "os", "pa",
                "pap", "ps", "pt", "rm", "rof", "rwk", "saq", "sc", "scn", "sd", "sdh", "seh",
                "si", "sn", "so", "sq", "ss", "ssy", "st", "sv", "sw", "syr", "ta", "te", "teo",
                "ti", "tig", "tk", "tl", "tn", "tr", "ts", "tzm", "ug", "ur", "uz", "ve", "vo",
                "vun", "wa", "wae", "xh", "xog", "yi", "zu",
            ],
        ),
        (&[Zero, One, Other], &["ksh", "lag", "lv", "prg"]),
        (
            &[One, Two, Other],
            &["iu", "kw", "naq", "se", "sma", "smi", "smj", "smn", "sms"],
        ),
        (&[One, Few, Other], &["bs", "hr", "mo", "ro", "sh", "shi", "sr"]),
        (&[One, Two, Few, Other], &["dsb", "gd", "hsb", "sl"]),
        (&[One, Two, Many, Other], &["he", "iw"]),
        (
            &[One, Few, Many, Other],
            &["be", "cs", "lt", "mt", "pl", "ru", "sk", "uk"],
        ),
        (&[One, Two, Few, Many, Other], &["br", "ga", "gv"]),
        (&[Zero, One, Two, Few, Many, Other], &["ar", "ars", "cy"]),
    ];

    let mut table = HashMap::new();
    for (categories, languages) in groups {
        let set = CategorySet::of(categories);
        for language in *languages {
            table.insert(*language, set);
        }
    }
    table
});

/// Table-driven provider over the CLDR cardinal category sets.
///
/// Lookup tries the full canonical tag first (so overrides such as
/// `pt-PT` can be registered), then the primary language subtag.
#[derive(Debug, Clone, Default)]
pub struct CldrPluralRules {
    overrides: HashMap<LanguageTag, CategorySet>,
}

impl CldrPluralRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the category set for one tag.
    pub fn with_rule(mut self, tag: LanguageTag, categories: CategorySet) -> Self {
        self.overrides.insert(tag, categories);
        self
    }
}

impl PluralRuleProvider for CldrPluralRules {
    fn rule(&self, tag: &LanguageTag) -> Option<CategorySet> {
        if let Some(set) = self.overrides.get(tag) {
            return Some(*set);
        }
        CLDR_CARDINALS.get(tag.primary_language().as_str()).copied()
    }
}
