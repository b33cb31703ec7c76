// src/session.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::storage::{keys, LocalStore};
use crate::types::UserProfile;

/// Auth token and cached profile, both kept in the local store
pub struct Session {
    store: Arc<LocalStore>,
}

impl Session {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub async fn token(&self) -> Option<String> {
        self.store
            .get(keys::TOKEN)
            .await
            .filter(|token| !token.is_empty())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token().await.is_some()
    }

    pub async fn stored_user(&self) -> Option<UserProfile> {
        self.store.get_json(keys::USER).await
    }

    pub async fn store_user(&self, user: &UserProfile) -> Result<()> {
        self.store.set_json(keys::USER, user).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.store.remove(keys::TOKEN).await?;
        self.store.remove(keys::USER).await?;
        info!("Session cleared");
        Ok(())
    }

    pub async fn remembered_email(&self) -> Option<String> {
        self.store.get(keys::REMEMBERED_EMAIL).await
    }

    /// Remember `email` for the login form, or forget it with `None`
    pub async fn remember_email(&self, email: Option<&str>) -> Result<()> {
        match email {
            Some(email) => self.store.set(keys::REMEMBERED_EMAIL, email).await,
            None => self.store.remove(keys::REMEMBERED_EMAIL).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        serde_json::from_str(r#"{"email": "ravi@example.in", "role": "USER", "language": "hi"}"#)
            .unwrap()
    }

    #[tokio::test]
    async fn test_stored_session_and_logout() {
        let store = Arc::new(LocalStore::in_memory());
        let session = Session::new(store.clone());
        assert!(!session.is_authenticated().await);

        store.set(keys::TOKEN, "token-1").await.unwrap();
        session.store_user(&profile()).await.unwrap();
        assert!(session.is_authenticated().await);
        assert_eq!(session.stored_user().await, Some(profile()));

        session.logout().await.unwrap();
        assert!(!session.is_authenticated().await);
        assert!(session.stored_user().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_token_is_not_authenticated() {
        let store = Arc::new(LocalStore::in_memory());
        store.set(keys::TOKEN, "").await.unwrap();
        assert!(!Session::new(store).is_authenticated().await);
    }

    #[tokio::test]
    async fn test_remembered_email_survives_logout() {
        let session = Session::new(Arc::new(LocalStore::in_memory()));
        session.remember_email(Some("ravi@example.in")).await.unwrap();
        session.logout().await.unwrap();
        assert_eq!(
            session.remembered_email().await.as_deref(),
            Some("ravi@example.in")
        );

        session.remember_email(None).await.unwrap();
        assert!(session.remembered_email().await.is_none());
    }
}
