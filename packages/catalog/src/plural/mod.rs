//! Plural Module
//!
//! CLDR plural categories and the providers that say which categories a
//! language needs.

pub mod category;
pub mod rules;

pub use category::{CategorySet, PluralCategory};
pub use rules::{CldrPluralRules, PluralRuleProvider};
