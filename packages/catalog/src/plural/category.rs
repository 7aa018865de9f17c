//! Plural Categories
//!
//! CLDR plural categories and sets of them.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CLDR plural categories, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }

    fn flag(self) -> CategorySet {
        match self {
            PluralCategory::Zero => CategorySet::ZERO,
            PluralCategory::One => CategorySet::ONE,
            PluralCategory::Two => CategorySet::TWO,
            PluralCategory::Few => CategorySet::FEW,
            PluralCategory::Many => CategorySet::MANY,
            PluralCategory::Other => CategorySet::OTHER,
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" => Ok(PluralCategory::Zero),
            "one" => Ok(PluralCategory::One),
            "two" => Ok(PluralCategory::Two),
            "few" => Ok(PluralCategory::Few),
            "many" => Ok(PluralCategory::Many),
            "other" => Ok(PluralCategory::Other),
            _ => Err(format!("unknown plural category {:?}", s)),
        }
    }
}

bitflags! {
    /// The set of plural categories a language distinguishes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CategorySet: u8 {
        const ZERO = 1 << 0;
        const ONE = 1 << 1;
        const TWO = 1 << 2;
        const FEW = 1 << 3;
        const MANY = 1 << 4;
        const OTHER = 1 << 5;
    }
}

impl CategorySet {
    pub fn of(categories: &[PluralCategory]) -> Self {
        categories
            .iter()
            .fold(CategorySet::empty(), |set, c| set | c.flag())
    }

    pub fn has(&self, category: PluralCategory) -> bool {
        self.contains(category.flag())
    }

    pub fn insert_category(&mut self, category: PluralCategory) {
        self.insert(category.flag());
    }

    /// Categories in canonical order (zero, one, two, few, many, other).
    pub fn categories(&self) -> impl Iterator<Item = PluralCategory> + '_ {
        PluralCategory::ALL.into_iter().filter(move |c| self.has(*c))
    }

    pub fn len(&self) -> usize {
        self.bits().count_ones() as usize
    }
}

impl FromIterator<PluralCategory> for CategorySet {
    fn from_iter<I: IntoIterator<Item = PluralCategory>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CategorySet::empty(), |set, c| set | c.flag())
    }
}
