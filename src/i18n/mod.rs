// src/i18n/mod.rs
//! Translation tables, the key resolver and the language catalogue

pub mod languages;
pub mod resolver;
pub mod table;
pub mod tree;

pub use languages::{
    language_name, language_native_name, normalize_language_code, Language, SUPPORTED_LANGUAGES,
};
pub use resolver::{interpolate, lookup, Lookup, Params, Translator};
pub use table::{LocaleTable, DEFAULT_LOCALE};
pub use tree::TranslationNode;
