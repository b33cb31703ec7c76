// src/web/handlers/translation_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use crate::i18n::TranslationNode;
use crate::preferences::LanguagePreferences;
use crate::web::types::*;

pub async fn translate_handler(
    request: Json<TranslateRequest>,
    prefs: &State<LanguagePreferences>,
) -> Json<DataResponse<TranslationData>> {
    let context = prefs.context();
    let locale = request
        .locale
        .clone()
        .unwrap_or_else(|| context.language());

    let translator = context.translator();
    let text = translator.resolve(&request.key, &request.params(), &locale);
    let exists = translator.exists(&request.key, &locale);

    Json(DataResponse::success(
        "Translation resolved".to_string(),
        TranslationData {
            key: request.key.clone(),
            locale,
            text,
            exists,
        },
    ))
}

pub async fn exists_handler(
    key: String,
    locale: Option<String>,
    prefs: &State<LanguagePreferences>,
) -> Json<DataResponse<ExistsData>> {
    let context = prefs.context();
    let locale = locale.unwrap_or_else(|| context.language());
    let exists = context.translator().exists(&key, &locale);

    Json(DataResponse::success(
        if exists {
            "Translation present".to_string()
        } else {
            "Translation missing".to_string()
        },
        ExistsData {
            key,
            locale,
            exists,
        },
    ))
}

pub async fn locale_tree_handler(
    locale: &str,
    prefs: &State<LanguagePreferences>,
) -> Result<Json<DataResponse<TranslationNode>>, (Status, Json<StandardErrorResponse>)> {
    match prefs.context().translator().table().root(locale) {
        Some(root) => Ok(Json(DataResponse::success(
            format!("Translations for {}", locale),
            root.clone(),
        ))),
        None => Err((
            Status::NotFound,
            Json(StandardErrorResponse::new(
                format!("Locale \"{}\" is not loaded", locale),
                "LOCALE_NOT_FOUND".to_string(),
                vec!["Use GET /api/languages to list available languages".to_string()],
            )),
        )),
    }
}
