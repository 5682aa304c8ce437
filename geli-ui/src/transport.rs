//! HTTP transport for the rating server
//!
//! [`RatingApi`] is the seam between controllers and the network. The
//! production implementation speaks JSON over reqwest and keeps a cookie
//! store: the server tracks the comparison loop in a cookie session.

use std::time::Duration;

use async_trait::async_trait;
use geli_common::api::{
    ActionReply, Answer, CompareRequest, ExternalId, Item, RateRequest, RemoveReply,
    RemoveRequest, SearchReply, Tier,
};
use geli_common::config::TomlConfig;
use geli_common::{Error, MediaType, Result};
use reqwest::Url;
use serde::Serialize;
use tracing::debug;

const USER_AGENT: &str = concat!("geli/", env!("CARGO_PKG_VERSION"));

/// Request/response contract consumed by the controllers
///
/// Every method resolves to the parsed reply, or to `Error::Network` /
/// `Error::Parse` when the exchange itself failed. Application errors are
/// part of the reply, not an `Err`.
#[async_trait]
pub trait RatingApi: Send + Sync {
    /// GET /{media}/api/search?q=
    async fn search(&self, media: MediaType, query: &str) -> Result<SearchReply>;

    /// POST /{media}/api/rate
    async fn rate(&self, media: MediaType, item: &Item, tier: Tier) -> Result<ActionReply>;

    /// POST /{media}/api/compare
    async fn compare(&self, media: MediaType, answer: Answer) -> Result<ActionReply>;

    /// POST /{media}/api/remove
    async fn remove(&self, media: MediaType, external_id: &ExternalId) -> Result<RemoveReply>;
}

/// reqwest-backed [`RatingApi`]
pub struct HttpRatingApi {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpRatingApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        Self::new(&config.server_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, media: MediaType, action: &str) -> Result<Url> {
        self.base_url
            .join(&format!("{}/api/{}", media.as_path_segment(), action))
            .map_err(|e| Error::InvalidInput(e.to_string()))
    }

    async fn post<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<Vec<u8>> {
        debug!(url = %url, "POST");
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        read_body(response).await
    }
}

/// Normalise the base so relative joins keep any path prefix
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&with_slash)
        .map_err(|e| Error::Config(format!("Invalid server URL {}: {}", base_url, e)))
}

/// Body bytes regardless of status; the server reports application errors
/// with 4xx/5xx and an `error` field
async fn read_body(response: reqwest::Response) -> Result<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        debug!(status = status.as_u16(), "Non-success status, parsing body for error field");
    }
    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| Error::Network(e.to_string()))
}

#[async_trait]
impl RatingApi for HttpRatingApi {
    async fn search(&self, media: MediaType, query: &str) -> Result<SearchReply> {
        let url = self.endpoint(media, "search")?;
        debug!(url = %url, query = %query, "Searching catalog");

        let response = self
            .http_client
            .get(url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let body = read_body(response).await?;
        SearchReply::from_slice(&body)
    }

    async fn rate(&self, media: MediaType, item: &Item, tier: Tier) -> Result<ActionReply> {
        let url = self.endpoint(media, "rate")?;
        let body = self.post(url, &RateRequest { item, tier }).await?;
        ActionReply::from_slice(&body)
    }

    async fn compare(&self, media: MediaType, answer: Answer) -> Result<ActionReply> {
        let url = self.endpoint(media, "compare")?;
        let body = self.post(url, &CompareRequest { answer }).await?;
        ActionReply::from_slice(&body)
    }

    async fn remove(&self, media: MediaType, external_id: &ExternalId) -> Result<RemoveReply> {
        let url = self.endpoint(media, "remove")?;
        let body = self.post(url, &RemoveRequest { external_id }).await?;
        RemoveReply::from_slice(&body)
    }
}
