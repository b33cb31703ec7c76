// src/i18n/resolver.rs
//! Key-path resolution with default-locale fallback and `{name}` substitution.
//!
//! Resolution never fails: an unresolvable key, or one that stops on an
//! internal node, comes back as the key path itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};

use super::table::LocaleTable;
use super::tree::TranslationNode;

/// Placeholder name -> substituted value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Params::insert`]
    pub fn with(mut self, name: &str, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Display) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

/// Outcome of walking a tree along a key path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a TranslationNode),
    NotFound,
}

/// Walk `root` one segment at a time. A missing root counts as an empty tree.
pub fn lookup<'a>(root: Option<&'a TranslationNode>, segments: &[&str]) -> Lookup<'a> {
    let Some(mut node) = root else {
        return Lookup::NotFound;
    };

    for segment in segments {
        match node.child(segment) {
            Some(child) => node = child,
            None => return Lookup::NotFound,
        }
    }

    Lookup::Found(node)
}

/// Replace every `{name}` with its value, one parameter at a time.
/// Unknown placeholders stay as written; unused parameters are ignored.
pub fn interpolate(template: &str, params: &Params) -> String {
    let mut result = template.to_string();
    for (name, value) in params.iter() {
        let placeholder = format!("{{{}}}", name);
        if result.contains(&placeholder) {
            result = result.replace(&placeholder, value);
        }
    }
    result
}

/// Read-only view over a [`LocaleTable`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Translator {
    table: Arc<LocaleTable>,
}

impl Translator {
    pub fn new(table: Arc<LocaleTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &LocaleTable {
        &self.table
    }

    /// Resolve `key_path` for `active_locale`, falling back to the default locale
    pub fn resolve(&self, key_path: &str, params: &Params, active_locale: &str) -> String {
        let segments: Vec<&str> = key_path.split('.').collect();

        let found = match lookup(self.table.root(active_locale), &segments) {
            Lookup::Found(node) => Lookup::Found(node),
            Lookup::NotFound => {
                debug!(
                    "Key '{}' not in locale '{}', trying '{}'",
                    key_path,
                    active_locale,
                    self.table.default_locale()
                );
                lookup(self.table.default_root(), &segments)
            }
        };

        match found {
            Lookup::Found(TranslationNode::Text(template)) => interpolate(template, params),
            Lookup::Found(TranslationNode::Branch(_)) => {
                warn!(
                    "Translation key '{}' names a group, not a string (locale '{}')",
                    key_path, active_locale
                );
                key_path.to_string()
            }
            Lookup::NotFound => {
                warn!(
                    "Translation key '{}' not found for language '{}'",
                    key_path, active_locale
                );
                key_path.to_string()
            }
        }
    }

    /// Whether `locale` itself has a string at `key_path`. No fallback.
    pub fn exists(&self, key_path: &str, locale: &str) -> bool {
        let segments: Vec<&str> = key_path.split('.').collect();
        matches!(
            lookup(self.table.root(locale), &segments),
            Lookup::Found(TranslationNode::Text(_))
        )
    }
}
