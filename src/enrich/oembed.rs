//! YouTube oEmbed lookups.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use super::{LookupError, MetadataSource};
use crate::core::models::VideoKey;
use crate::error::Result;

/// Public oEmbed endpoint.
pub const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// [`MetadataSource`] backed by the YouTube oEmbed endpoint.
#[derive(Debug, Clone)]
pub struct OEmbedClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OEmbedClient {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chatmerge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: OEMBED_ENDPOINT.to_string(),
        })
    }

    /// Points the client at another oEmbed-compatible endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Request URL for `key`.
    pub fn lookup_url(&self, key: &VideoKey) -> String {
        let watch = format!("{WATCH_URL}{key}");
        format!(
            "{}?url={}&format=json",
            self.endpoint,
            urlencoding::encode(&watch)
        )
    }
}

#[async_trait]
impl MetadataSource for OEmbedClient {
    async fn fetch(&self, key: &VideoKey) -> std::result::Result<Value, LookupError> {
        let url = self.lookup_url(key);
        trace!(%url, "oembed request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
