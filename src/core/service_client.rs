// src/core/service_client.rs
//! HTTP client for the profile endpoints of the backend

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, trace};

use crate::types::{LanguageUpdate, UserProfile};

const CURRENT_USER_ENDPOINT: &str = "/api/users/me";

/// Non-success status returned by the backend
#[derive(Debug)]
pub struct HttpStatusError {
    pub status: StatusCode,
    pub body: String,
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} error: {}", self.status, self.body)
    }
}

impl std::error::Error for HttpStatusError {}

/// True when `err` carries a 401 from the backend
pub fn is_unauthorized(err: &anyhow::Error) -> bool {
    err.downcast_ref::<HttpStatusError>()
        .map(|e| e.status == StatusCode::UNAUTHORIZED)
        .unwrap_or(false)
}

/// Per-request credentials and locale, mirroring what every UI request carries
#[derive(Debug, Clone, Default)]
pub struct RequestContext<'a> {
    pub token: Option<&'a str>,
    pub language: &'a str,
}

pub struct ProfileClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProfileClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// `GET /api/users/me`
    pub async fn get_current_user(&self, ctx: &RequestContext<'_>) -> Result<UserProfile> {
        self.get(CURRENT_USER_ENDPOINT, ctx).await
    }

    /// `PUT /api/users/me` with only the language field
    pub async fn update_language(
        &self,
        language: &str,
        ctx: &RequestContext<'_>,
    ) -> Result<UserProfile> {
        let payload = LanguageUpdate {
            language: language.to_string(),
        };
        self.put_json(CURRENT_USER_ENDPOINT, &payload, ctx).await
    }

    pub async fn get<R>(&self, endpoint: &str, ctx: &RequestContext<'_>) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = self.url(endpoint);
        trace!("GET {}", url);
        let request = self.decorate(self.client.get(&url), ctx);
        Self::send(request, &url).await
    }

    pub async fn put_json<T, R>(
        &self,
        endpoint: &str,
        payload: &T,
        ctx: &RequestContext<'_>,
    ) -> Result<R>
    where
        T: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let url = self.url(endpoint);
        trace!("PUT {}", url);
        let request = self.decorate(self.client.put(&url).json(payload), ctx);
        Self::send(request, &url).await
    }

    fn decorate(&self, request: RequestBuilder, ctx: &RequestContext<'_>) -> RequestBuilder {
        let request = request.query(&[("language", ctx.language)]);
        match ctx.token {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }

    async fn send<R>(request: RequestBuilder, url: &str) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        debug!("Response status from {}: {}", url, status);

        if status.is_success() {
            response
                .json::<R>()
                .await
                .context("Failed to parse JSON response")
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Profile service error response: {}", body);
            Err(HttpStatusError { status, body }.into())
        }
    }
}
