// src/context.rs
//! The active-locale cell.
//!
//! `LocaleContext` owns the one writable piece of i18n state. Readers get a
//! snapshot of the current code on every call; only [`LocaleContext::set_language`]
//! writes it, and it mirrors the new value into the [`LocalStore`].

use std::sync::{Arc, RwLock};
use tracing::{error, info, warn};

use crate::i18n::{Params, Translator};
use crate::storage::{keys, LocalStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleChange {
    Changed,
    Unchanged,
    Unsupported,
}

pub struct LocaleContext {
    translator: Translator,
    store: Arc<LocalStore>,
    active: RwLock<String>,
    multi_language: bool,
}

impl LocaleContext {
    /// Pick the initial locale from the store, falling back to the default
    pub async fn initialize(
        translator: Translator,
        store: Arc<LocalStore>,
        multi_language: bool,
    ) -> Self {
        let default_locale = translator.table().default_locale().to_string();

        let initial = match store.get(keys::LANGUAGE).await {
            Some(stored) if multi_language && translator.table().contains(&stored) => stored,
            Some(stored) if stored == default_locale => stored,
            Some(stored) => {
                warn!(
                    "Stored language '{}' is not available, using '{}'",
                    stored, default_locale
                );
                default_locale
            }
            None => default_locale,
        };

        info!("Active language: {}", initial);

        Self {
            translator,
            store,
            active: RwLock::new(initial),
            multi_language,
        }
    }

    pub fn language(&self) -> String {
        self.active
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    /// Resolve `key_path` against the active locale
    pub fn t(&self, key_path: &str, params: &Params) -> String {
        self.translator
            .resolve(key_path, params, &self.language())
    }

    /// Whether the active locale itself has a string at `key_path`
    pub fn exists(&self, key_path: &str) -> bool {
        self.translator.exists(key_path, &self.language())
    }

    pub fn is_supported(&self, code: &str) -> bool {
        if !self.multi_language {
            return code == self.translator.table().default_locale();
        }
        self.translator.table().contains(code)
    }

    /// Switch the active locale and persist it. Persistence failures are logged only.
    pub async fn set_language(&self, code: &str) -> LocaleChange {
        if !self.is_supported(code) {
            warn!("Language \"{}\" is not supported", code);
            return LocaleChange::Unsupported;
        }

        {
            let mut active = self
                .active
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if *active == code {
                return LocaleChange::Unchanged;
            }
            *active = code.to_string();
        }

        if let Err(e) = self.store.set(keys::LANGUAGE, code).await {
            error!("Error saving language to local storage: {:#}", e);
        }

        info!("Language changed to {}", code);
        LocaleChange::Changed
    }
}
