// src/i18n/table.rs
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use super::tree::TranslationNode;
use crate::core::FsOps;

pub const DEFAULT_LOCALE: &str = "en";

const EMBEDDED_LOCALES: [(&str, &str); 6] = [
    ("en", include_str!("../../locales/en.json")),
    ("hi", include_str!("../../locales/hi.json")),
    ("ta", include_str!("../../locales/ta.json")),
    ("te", include_str!("../../locales/te.json")),
    ("bn", include_str!("../../locales/bn.json")),
    ("mr", include_str!("../../locales/mr.json")),
];

/// Locale code -> translation tree. Built once at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub struct LocaleTable {
    locales: BTreeMap<String, TranslationNode>,
    default_locale: String,
}

impl LocaleTable {
    /// Empty table with the given default locale
    pub fn new(default_locale: &str) -> Self {
        Self {
            locales: BTreeMap::new(),
            default_locale: default_locale.to_string(),
        }
    }

    /// Table built from the JSON files compiled into the binary
    pub fn embedded() -> Result<Self> {
        let mut table = Self::new(DEFAULT_LOCALE);
        for (code, json) in EMBEDDED_LOCALES {
            table
                .insert_json(code, json)
                .with_context(|| format!("Embedded locale '{}' is malformed", code))?;
        }
        Ok(table)
    }

    /// Embedded table with `<code>.json` files from `dir` replacing or adding locales
    pub async fn with_overrides(dir: &Path) -> Result<Self> {
        let mut table = Self::embedded()?;

        for path in FsOps::list_json_files(dir).await? {
            let Some(code) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = FsOps::read_file_safe(&path).await?;
            table
                .insert_json(code, &content)
                .with_context(|| format!("Failed to parse locale file: {}", path.display()))?;
            info!("Loaded locale override '{}' from {}", code, path.display());
        }

        Ok(table)
    }

    /// Parse `json` and register it under `code`, replacing any previous tree
    pub fn insert_json(&mut self, code: &str, json: &str) -> Result<()> {
        let root: TranslationNode =
            serde_json::from_str(json).context("Invalid translation JSON")?;
        self.insert(code, root);
        Ok(())
    }

    pub fn insert(&mut self, code: &str, root: TranslationNode) {
        self.locales.insert(code.to_string(), root);
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn contains(&self, code: &str) -> bool {
        self.locales.contains_key(code)
    }

    pub fn root(&self, code: &str) -> Option<&TranslationNode> {
        self.locales.get(code)
    }

    /// Root of the default locale; empty when the default was never loaded
    pub fn default_root(&self) -> Option<&TranslationNode> {
        self.locales.get(&self.default_locale)
    }

    /// Loaded locale codes, sorted
    pub fn locales(&self) -> Vec<&str> {
        self.locales.keys().map(String::as_str).collect()
    }

    /// String-leaf paths the default locale has and `code` lacks
    pub fn missing_keys(&self, code: &str) -> Vec<String> {
        let Some(default_root) = self.default_root() else {
            return Vec::new();
        };
        let target = self.root(code);

        default_root
            .leaf_paths()
            .into_iter()
            .filter(|path| {
                let found = target.and_then(|root| {
                    path.split('.')
                        .try_fold(root, |node, segment| node.child(segment))
                });
                !matches!(found, Some(TranslationNode::Text(_)))
            })
            .collect()
    }
}
