// src/preferences.rs
//! Language preference flow: local switch first, then best-effort profile sync

use serde::Serialize;
use tracing::{error, info, warn};

use crate::context::{LocaleChange, LocaleContext};
use crate::core::service_client::{is_unauthorized, ProfileClient, RequestContext};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Nothing to send or fetch (anonymous session, or no local change)
    Skipped,
    Synced,
    /// The backend rejected the token; the session has been cleared
    LoggedOut,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChange {
    pub change: LocaleChange,
    pub sync: SyncOutcome,
}

pub struct LanguagePreferences {
    context: LocaleContext,
    session: Session,
    client: ProfileClient,
}

impl LanguagePreferences {
    pub fn new(context: LocaleContext, session: Session, client: ProfileClient) -> Self {
        Self {
            context,
            session,
            client,
        }
    }

    pub fn context(&self) -> &LocaleContext {
        &self.context
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Switch locale locally, then tell the backend if the user is signed in.
    /// A failed profile update never reverts the local switch.
    pub async fn change_language(&self, code: &str) -> LanguageChange {
        let change = self.context.set_language(code).await;
        if change != LocaleChange::Changed {
            return LanguageChange {
                change,
                sync: SyncOutcome::Skipped,
            };
        }

        let Some(token) = self.session.token().await else {
            return LanguageChange {
                change,
                sync: SyncOutcome::Skipped,
            };
        };

        let language = self.context.language();
        let ctx = RequestContext {
            token: Some(&token),
            language: &language,
        };

        let sync = match self.client.update_language(code, &ctx).await {
            Ok(user) => {
                if let Err(e) = self.session.store_user(&user).await {
                    error!("Failed to store updated profile: {:#}", e);
                }
                info!("Language preference '{}' saved to profile", code);
                SyncOutcome::Synced
            }
            Err(e) => self.handle_failure("update language preference", e).await,
        };

        LanguageChange { change, sync }
    }

    /// Refresh the stored profile and adopt its language, if signed in
    pub async fn sync_from_profile(&self) -> SyncOutcome {
        let Some(token) = self.session.token().await else {
            return SyncOutcome::Skipped;
        };

        let language = self.context.language();
        let ctx = RequestContext {
            token: Some(&token),
            language: &language,
        };

        match self.client.get_current_user(&ctx).await {
            Ok(user) => {
                if let Err(e) = self.session.store_user(&user).await {
                    error!("Failed to store refreshed profile: {:#}", e);
                }
                if let Some(profile_language) = user.language.as_deref() {
                    if self.context.set_language(profile_language).await
                        == LocaleChange::Unsupported
                    {
                        warn!(
                            "Profile language '{}' is not available locally",
                            profile_language
                        );
                    }
                }
                SyncOutcome::Synced
            }
            Err(e) => self.handle_failure("fetch current user", e).await,
        }
    }

    async fn handle_failure(&self, action: &str, err: anyhow::Error) -> SyncOutcome {
        if is_unauthorized(&err) {
            warn!("Token rejected while trying to {}, logging out", action);
            if let Err(e) = self.session.logout().await {
                error!("Failed to clear session: {:#}", e);
            }
            return SyncOutcome::LoggedOut;
        }

        error!("Failed to {}: {:#}", action, err);
        SyncOutcome::Failed(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{LocaleTable, Translator};
    use crate::storage::{keys, LocalStore};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn preferences(store: Arc<LocalStore>) -> LanguagePreferences {
        // nothing listens on the discard port, so every request fails fast
        preferences_with(store, "http://127.0.0.1:9").await
    }

    async fn preferences_with(store: Arc<LocalStore>, base_url: &str) -> LanguagePreferences {
        let translator = Translator::new(Arc::new(LocaleTable::embedded().unwrap()));
        let context = LocaleContext::initialize(translator, store.clone(), true).await;
        let client = ProfileClient::new(base_url, 2000).unwrap();
        LanguagePreferences::new(context, Session::new(store), client)
    }

    /// Serve a single canned HTTP response and return the request line seen
    async fn profile_backend(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            let header_end = loop {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before headers were complete");
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&request[..header_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while request.len() < header_end + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            head.lines().next().unwrap_or_default().to_string()
        });

        (base_url, handle)
    }

    #[tokio::test]
    async fn test_anonymous_change_skips_sync() {
        let prefs = preferences(Arc::new(LocalStore::in_memory())).await;
        let result = prefs.change_language("hi").await;

        assert_eq!(result.change, LocaleChange::Changed);
        assert_eq!(result.sync, SyncOutcome::Skipped);
        assert_eq!(prefs.context().language(), "hi");
    }

    #[tokio::test]
    async fn test_failed_sync_keeps_local_change() {
        let store = Arc::new(LocalStore::in_memory());
        store.set(keys::TOKEN, "token").await.unwrap();
        let prefs = preferences(store.clone()).await;

        let result = prefs.change_language("ta").await;
        assert_eq!(result.change, LocaleChange::Changed);
        assert!(matches!(result.sync, SyncOutcome::Failed(_)));
        assert_eq!(prefs.context().language(), "ta");
        assert_eq!(store.get(keys::LANGUAGE).await.as_deref(), Some("ta"));
        assert!(prefs.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_unsupported_change_does_not_sync() {
        let store = Arc::new(LocalStore::in_memory());
        store.set(keys::TOKEN, "token").await.unwrap();
        let prefs = preferences(store).await;

        let result = prefs.change_language("de").await;
        assert_eq!(result.change, LocaleChange::Unsupported);
        assert_eq!(result.sync, SyncOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_profile_sync_skipped_when_anonymous() {
        let prefs = preferences(Arc::new(LocalStore::in_memory())).await;
        assert_eq!(prefs.sync_from_profile().await, SyncOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_profile_sync_failure_keeps_session() {
        let store = Arc::new(LocalStore::in_memory());
        store.set(keys::TOKEN, "token").await.unwrap();
        store.set(keys::LANGUAGE, "bn").await.unwrap();
        let prefs = preferences(store).await;

        assert!(matches!(
            prefs.sync_from_profile().await,
            SyncOutcome::Failed(_)
        ));
        assert_eq!(prefs.context().language(), "bn");
        assert!(prefs.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_profile_sync_adopts_profile_language() {
        let (base_url, backend) =
            profile_backend("200 OK", r#"{"email": "meena@example.in", "language": "ta"}"#).await;
        let store = Arc::new(LocalStore::in_memory());
        store.set(keys::TOKEN, "token").await.unwrap();
        let prefs = preferences_with(store.clone(), &base_url).await;

        assert_eq!(prefs.sync_from_profile().await, SyncOutcome::Synced);
        assert_eq!(prefs.context().language(), "ta");
        assert_eq!(store.get(keys::LANGUAGE).await.as_deref(), Some("ta"));

        let user = prefs.session().stored_user().await.unwrap();
        assert_eq!(user.email, "meena@example.in");
        assert_eq!(user.language.as_deref(), Some("ta"));
        assert!(prefs.session().is_authenticated().await);

        let request_line = backend.await.unwrap();
        assert!(request_line.starts_with("GET /api/users/me?language=en "));
    }

    #[tokio::test]
    async fn test_profile_sync_unauthorized_logs_out() {
        let (base_url, backend) =
            profile_backend("401 Unauthorized", r#"{"detail": "Token expired"}"#).await;
        let store = Arc::new(LocalStore::in_memory());
        store.set(keys::TOKEN, "token").await.unwrap();
        store.set(keys::LANGUAGE, "bn").await.unwrap();
        let prefs = preferences_with(store, &base_url).await;

        assert_eq!(prefs.sync_from_profile().await, SyncOutcome::LoggedOut);
        assert_eq!(prefs.context().language(), "bn");
        assert!(prefs.session().stored_user().await.is_none());
        assert!(!prefs.session().is_authenticated().await);
        backend.await.unwrap();
    }

    #[tokio::test]
    async fn test_change_synced_to_profile() {
        let (base_url, backend) =
            profile_backend("200 OK", r#"{"email": "meena@example.in", "language": "hi"}"#).await;
        let store = Arc::new(LocalStore::in_memory());
        store.set(keys::TOKEN, "token").await.unwrap();
        let prefs = preferences_with(store, &base_url).await;

        let result = prefs.change_language("hi").await;
        assert_eq!(result.change, LocaleChange::Changed);
        assert_eq!(result.sync, SyncOutcome::Synced);
        assert_eq!(prefs.context().language(), "hi");

        let user = prefs.session().stored_user().await.unwrap();
        assert_eq!(user.language.as_deref(), Some("hi"));
        assert!(prefs.session().is_authenticated().await);

        let request_line = backend.await.unwrap();
        assert!(request_line.starts_with("PUT /api/users/me?language=hi "));
    }

    #[tokio::test]
    async fn test_change_unauthorized_logs_out_but_keeps_language() {
        let (base_url, backend) =
            profile_backend("401 Unauthorized", r#"{"detail": "Token expired"}"#).await;
        let store = Arc::new(LocalStore::in_memory());
        store.set(keys::TOKEN, "token").await.unwrap();
        store
            .set(keys::USER, r#"{"email": "meena@example.in", "language": "en"}"#)
            .await
            .unwrap();
        let prefs = preferences_with(store.clone(), &base_url).await;

        let result = prefs.change_language("mr").await;
        assert_eq!(result.change, LocaleChange::Changed);
        assert_eq!(result.sync, SyncOutcome::LoggedOut);
        assert_eq!(prefs.context().language(), "mr");
        assert_eq!(store.get(keys::LANGUAGE).await.as_deref(), Some("mr"));
        assert!(prefs.session().stored_user().await.is_none());
        assert!(!prefs.session().is_authenticated().await);
        backend.await.unwrap();
    }
}
