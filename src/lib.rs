// src/lib.rs
//! Language layer of the Green Matchers client: translation lookup with
//! default-locale fallback, the active-locale cell, its persistence, and
//! syncing the preference with the user's profile.

use anyhow::Result;
use std::sync::Arc;

pub mod context;
pub mod core;
pub mod i18n;
pub mod preferences;
pub mod session;
pub mod storage;
pub mod types;
pub mod web;

pub use context::{LocaleChange, LocaleContext};
pub use i18n::{LocaleTable, Params, Translator};
pub use preferences::{LanguageChange, LanguagePreferences, SyncOutcome};
pub use session::Session;
pub use storage::LocalStore;

use crate::core::{AppConfig, ProfileClient};

/// Wire tables, store, session and profile client together from `config`
pub async fn build_preferences(config: &AppConfig) -> Result<LanguagePreferences> {
    let table = match &config.locales_dir {
        Some(dir) => LocaleTable::with_overrides(dir).await?,
        None => LocaleTable::embedded()?,
    };
    let translator = Translator::new(Arc::new(table));

    let store = Arc::new(LocalStore::open(&config.storage_path).await?);
    let context =
        LocaleContext::initialize(translator, store.clone(), config.enable_multi_language).await;
    let client = ProfileClient::new(&config.api_url, config.api_timeout_ms)?;

    Ok(LanguagePreferences::new(
        context,
        Session::new(store),
        client,
    ))
}
