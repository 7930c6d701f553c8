//! HTTP client for the research backend.
//!
//! A thin typed wrapper over the REST surface: research submission, status
//! polling, result and history retrieval, PDF download, and the auth
//! endpoints. Authenticated calls attach the session's bearer token; error
//! responses are normalized through [`crate::error::backend_error`] so
//! callers see one coherent message regardless of the body shape.

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{self, ApiError};
use crate::export::PdfSource;
use crate::models::{
    HistoryEntry, HistoryResponse, Report, ResearchRequest, ResearchStatus, StatusResponse,
    SubmitResponse, Token, User,
};
use crate::poller::ResearchBackend;
use crate::session::Session;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client from configuration and (optionally) a session whose
    /// token is attached to every request.
    pub fn new(config: &Config, session: Option<&Session>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            token: session.map(|s| s.access_token.clone()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Turn an error-status response into an [`ApiError::Backend`].
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error::backend_error(status.as_u16(), &body))
    }

    /// Start a research job. The topic is trimmed and must be non-empty;
    /// an empty topic is rejected locally without any request.
    pub async fn create_research(
        &self,
        topic: &str,
        additional_context: Option<&str>,
    ) -> Result<SubmitResponse, ApiError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ApiError::Validation(
                "Please enter a research topic".to_string(),
            ));
        }

        let request = ResearchRequest {
            topic: topic.to_string(),
            additional_context: additional_context.map(|c| c.to_string()),
        };
        tracing::debug!(topic, "submitting research request");
        let response = self
            .authed(self.http.post(self.url("/research/")))
            .json(&request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn research_status(&self, id: &str) -> Result<ResearchStatus, ApiError> {
        let response = self
            .authed(
                self.http
                    .get(self.url(&format!("/research/{}/status", id))),
            )
            .send()
            .await?;
        let status: StatusResponse = Self::check(response).await?.json().await?;
        tracing::debug!(id, status = %status.status, "status check");
        Ok(status.status)
    }

    /// Fetch the full report. Only valid once a status read returned
    /// `completed` — the poller and `show` enforce that ordering.
    pub async fn research_result(&self, id: &str) -> Result<Report, ApiError> {
        let response = self
            .authed(self.http.get(self.url(&format!("/research/{}", id))))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn research_history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        let response = self
            .authed(self.http.get(self.url("/research/history")))
            .send()
            .await?;
        let history: HistoryResponse = Self::check(response).await?.json().await?;
        Ok(history.researches)
    }

    pub async fn download_pdf(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .authed(self.http.get(self.url(&format!("/research/{}/pdf", id))))
            .send()
            .await?;
        let bytes = Self::check(response).await?.bytes().await?;
        tracing::debug!(id, len = bytes.len(), "pdf downloaded");
        Ok(bytes.to_vec())
    }

    /// Exchange credentials for a token (OAuth2 password form, with the
    /// email sent as `username`).
    pub async fn login(&self, email: &str, password: &str) -> Result<Token, ApiError> {
        let response = self
            .http
            .post(self.url("/auth/token"))
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        let response = self.authed(self.http.get(self.url("/users/me"))).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

#[async_trait]
impl ResearchBackend for ApiClient {
    async fn fetch_status(&self, id: &str) -> Result<ResearchStatus, ApiError> {
        self.research_status(id).await
    }

    async fn fetch_report(&self, id: &str) -> Result<Report, ApiError> {
        self.research_result(id).await
    }
}

#[async_trait]
impl PdfSource for ApiClient {
    async fn fetch_pdf(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        self.download_pdf(id).await
    }
}

/// Client used before sign-in (login, register, OAuth exchange).
pub fn anonymous(config: &Config) -> anyhow::Result<ApiClient> {
    ApiClient::new(config, None)
}
