// src/web/handlers/language_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::context::LocaleChange;
use crate::i18n::{language_name, language_native_name, normalize_language_code};
use crate::preferences::LanguagePreferences;
use crate::web::types::*;

pub fn language_info(code: &str, active: &str) -> LanguageInfo {
    LanguageInfo {
        code: code.to_string(),
        name: language_name(code).to_string(),
        native_name: language_native_name(code).to_string(),
        active: code == active,
    }
}

pub async fn list_languages_handler(
    prefs: &State<LanguagePreferences>,
) -> Json<DataResponse<Vec<LanguageInfo>>> {
    let context = prefs.context();
    let active = context.language();

    let languages: Vec<LanguageInfo> = context
        .translator()
        .table()
        .locales()
        .into_iter()
        .filter(|code| context.is_supported(code))
        .map(|code| language_info(code, &active))
        .collect();

    Json(DataResponse::success(
        format!("{} languages available", languages.len()),
        languages,
    ))
}

pub async fn get_language_handler(
    prefs: &State<LanguagePreferences>,
) -> Json<DataResponse<ActiveLanguageData>> {
    let active = prefs.context().language();
    Json(DataResponse::success(
        format!("Active language: {}", active),
        ActiveLanguageData {
            language: language_info(&active, &active),
            sync: None,
        },
    ))
}

pub async fn set_language_handler(
    request: Json<SetLanguageRequest>,
    prefs: &State<LanguagePreferences>,
) -> Result<Json<DataResponse<ActiveLanguageData>>, (Status, Json<StandardErrorResponse>)> {
    let Some(code) = normalize_language_code(&request.language) else {
        return Err(unsupported_language(&request.language));
    };

    let result = prefs.change_language(&code).await;
    if result.change == LocaleChange::Unsupported {
        return Err(unsupported_language(&request.language));
    }

    let active = prefs.context().language();
    info!("Language set to {} via API ({:?})", active, result.sync);

    let message = match result.change {
        LocaleChange::Unchanged => format!("Language already set to {}", active),
        _ => format!("Language changed to {}", active),
    };

    Ok(Json(DataResponse::success(
        message,
        ActiveLanguageData {
            language: language_info(&active, &active),
            sync: Some(result.sync),
        },
    )))
}

fn unsupported_language(raw: &str) -> (Status, Json<StandardErrorResponse>) {
    (
        Status::BadRequest,
        Json(StandardErrorResponse::new(
            format!("Language \"{}\" is not supported", raw),
            "UNSUPPORTED_LANGUAGE".to_string(),
            vec!["Use GET /api/languages to list available languages".to_string()],
        )),
    )
}
