// src/i18n/languages.rs
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
}

pub const SUPPORTED_LANGUAGES: [Language; 6] = [
    Language {
        code: "en",
        name: "English",
        native_name: "English",
    },
    Language {
        code: "hi",
        name: "Hindi",
        native_name: "हिंदी",
    },
    Language {
        code: "ta",
        name: "Tamil",
        native_name: "தமிழ்",
    },
    Language {
        code: "te",
        name: "Telugu",
        native_name: "తెలుగు",
    },
    Language {
        code: "bn",
        name: "Bengali",
        native_name: "বাংলা",
    },
    Language {
        code: "mr",
        name: "Marathi",
        native_name: "मराठी",
    },
];

pub fn find_language(code: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES.iter().find(|lang| lang.code == code)
}

/// English name for `code`, or the code itself when unknown
pub fn language_name(code: &str) -> &str {
    find_language(code).map(|lang| lang.name).unwrap_or(code)
}

/// Native name for `code`, or the code itself when unknown
pub fn language_native_name(code: &str) -> &str {
    find_language(code)
        .map(|lang| lang.native_name)
        .unwrap_or(code)
}

/// Normalize user input like "hi-IN", "HI_in" or "Hindi" to a bare code
pub fn normalize_language_code(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_lowercase().replace('_', "-");
    if normalized.is_empty() {
        return None;
    }

    let primary = normalized.split('-').next().unwrap_or(&normalized);

    let by_name = SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| lang.name.to_lowercase() == primary || lang.native_name == raw.trim());

    match by_name {
        Some(lang) => Some(lang.code.to_string()),
        None => Some(primary.to_string()),
    }
}
