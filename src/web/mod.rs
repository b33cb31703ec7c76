// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, put, routes, Build, Request, Response, Rocket, State};
use tracing::info;

use crate::i18n::TranslationNode;
use crate::preferences::LanguagePreferences;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[get("/languages")]
pub async fn list_languages(
    prefs: &State<LanguagePreferences>,
) -> Json<DataResponse<Vec<LanguageInfo>>> {
    handlers::list_languages_handler(prefs).await
}

#[get("/language")]
pub async fn get_language(prefs: &State<LanguagePreferences>) -> Json<DataResponse<ActiveLanguageData>> {
    handlers::get_language_handler(prefs).await
}

#[put("/language", data = "<request>")]
pub async fn set_language(
    request: Json<SetLanguageRequest>,
    prefs: &State<LanguagePreferences>,
) -> Result<Json<DataResponse<ActiveLanguageData>>, (Status, Json<StandardErrorResponse>)> {
    handlers::set_language_handler(request, prefs).await
}

#[post("/translate", data = "<request>")]
pub async fn translate(
    request: Json<TranslateRequest>,
    prefs: &State<LanguagePreferences>,
) -> Json<DataResponse<TranslationData>> {
    handlers::translate_handler(request, prefs).await
}

#[get("/translations/exists?<key>&<locale>")]
pub async fn translation_exists(
    key: String,
    locale: Option<String>,
    prefs: &State<LanguagePreferences>,
) -> Json<DataResponse<ExistsData>> {
    handlers::exists_handler(key, locale, prefs).await
}

#[get("/translations/<locale>")]
pub async fn locale_tree(
    locale: &str,
    prefs: &State<LanguagePreferences>,
) -> Result<Json<DataResponse<TranslationNode>>, (Status, Json<StandardErrorResponse>)> {
    handlers::locale_tree_handler(locale, prefs).await
}

#[get("/health")]
pub async fn health(prefs: &State<LanguagePreferences>) -> Json<TextResponse> {
    handlers::health_handler(prefs).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

pub fn build_rocket(prefs: LanguagePreferences, port: u16) -> Rocket<Build> {
    let figment = rocket::Config::figment().merge(("port", port));

    rocket::custom(figment)
        .attach(Cors)
        .manage(prefs)
        .register("/api", catchers![bad_request, not_found, internal_error])
        .mount(
            "/api",
            routes![
                list_languages,
                get_language,
                set_language,
                translate,
                translation_exists,
                locale_tree,
                health,
                options,
            ],
        )
}

pub async fn start_web_server(prefs: LanguagePreferences, port: u16) -> Result<()> {
    info!("Starting Green Matchers language API on port {}", port);

    let _rocket = build_rocket(prefs, port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LocaleContext;
    use crate::core::ProfileClient;
    use crate::i18n::{LocaleTable, Translator};
    use crate::session::Session;
    use crate::storage::LocalStore;
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;
    use serde_json::Value;
    use std::sync::Arc;

    async fn client() -> Client {
        let store = Arc::new(LocalStore::in_memory());
        let translator = Translator::new(Arc::new(LocaleTable::embedded().unwrap()));
        let context = LocaleContext::initialize(translator, store.clone(), true).await;
        let profile = ProfileClient::new("http://127.0.0.1:9", 500).unwrap();
        let prefs = LanguagePreferences::new(context, Session::new(store), profile);
        Client::tracked(build_rocket(prefs, 0)).await.unwrap()
    }

    async fn json(response: rocket::local::asynchronous::LocalResponse<'_>) -> Value {
        let body = response.into_string().await.unwrap();
        serde_json::from_str(&body).unwrap()
    }

    #[tokio::test]
    async fn test_translate_with_fallback_and_params() {
        let client = client().await;
        let response = client
            .post("/api/translate")
            .header(ContentType::JSON)
            .body(r#"{"key": "jobs.showingResults", "locale": "te", "params": {"count": 4}}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body = json(response).await;
        assert_eq!(body["data"]["text"], "Showing 4 jobs");
        assert_eq!(body["data"]["exists"], false);
    }

    #[tokio::test]
    async fn test_translate_missing_key_echoes_key() {
        let client = client().await;
        let response = client
            .post("/api/translate")
            .header(ContentType::JSON)
            .body(r#"{"key": "jobs.nothing.here"}"#)
            .dispatch()
            .await;

        let body = json(response).await;
        assert_eq!(body["data"]["text"], "jobs.nothing.here");
        assert_eq!(body["data"]["locale"], "en");
    }

    #[tokio::test]
    async fn test_set_language_then_translate() {
        let client = client().await;
        let response = client
            .put("/api/language")
            .header(ContentType::JSON)
            .body(r#"{"language": "hi-IN"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body = json(response).await;
        assert_eq!(body["data"]["language"]["code"], "hi");
        assert_eq!(body["data"]["sync"]["status"], "skipped");

        let response = client
            .post("/api/translate")
            .header(ContentType::JSON)
            .body(r#"{"key": "nav.home"}"#)
            .dispatch()
            .await;
        assert_eq!(json(response).await["data"]["text"], "होम");
    }

    #[tokio::test]
    async fn test_set_unsupported_language() {
        let client = client().await;
        let response = client
            .put("/api/language")
            .header(ContentType::JSON)
            .body(r#"{"language": "fr"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        assert_eq!(json(response).await["error_code"], "UNSUPPORTED_LANGUAGE");
    }

    #[tokio::test]
    async fn test_exists_endpoint() {
        let client = client().await;
        let response = client
            .get("/api/translations/exists?key=careers.title&locale=hi")
            .dispatch()
            .await;
        assert_eq!(json(response).await["data"]["exists"], false);

        let response = client
            .get("/api/translations/exists?key=careers.title")
            .dispatch()
            .await;
        assert_eq!(json(response).await["data"]["exists"], true);
    }

    #[tokio::test]
    async fn test_locale_tree() {
        let client = client().await;
        let response = client.get("/api/translations/ta").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(json(response).await["data"]["nav"]["jobs"], "வேலைகள்");

        let response = client.get("/api/translations/xx").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[tokio::test]
    async fn test_languages_list() {
        let client = client().await;
        let response = client.get("/api/languages").dispatch().await;
        let body = json(response).await;
        let languages = body["data"].as_array().unwrap();
        assert_eq!(languages.len(), 6);
        assert!(languages
            .iter()
            .any(|lang| lang["code"] == "en" && lang["active"] == true));
    }
}
