// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::preferences::LanguagePreferences;
use crate::web::types::*;

pub async fn health_handler(prefs: &State<LanguagePreferences>) -> Json<TextResponse> {
    let authenticated = prefs.session().is_authenticated().await;
    info!("Health check (authenticated session: {})", authenticated);
    Json(TextResponse::success(format!(
        "OK (language: {})",
        prefs.context().language()
    )))
}
