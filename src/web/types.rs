// src/web/types.rs
use rocket::serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::i18n::Params;
use crate::preferences::SyncOutcome;

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct TranslateRequest {
    pub key: String,
    pub locale: Option<String>,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

impl TranslateRequest {
    /// JSON strings are used verbatim, any other value by its JSON text
    pub fn params(&self) -> Params {
        self.params
            .iter()
            .map(|(name, value)| match value {
                Value::String(text) => (name.clone(), text.clone()),
                other => (name.clone(), other.to_string()),
            })
            .collect()
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TranslationData {
    pub key: String,
    pub locale: String,
    pub text: String,
    pub exists: bool,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ExistsData {
    pub key: String,
    pub locale: String,
    pub exists: bool,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SetLanguageRequest {
    pub language: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub active: bool,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActiveLanguageData {
    pub language: LanguageInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncOutcome>,
}
