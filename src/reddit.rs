use serde_json::Value;

use crate::{Result, error::NmfError};

/// Thin read client for the public reddit JSON API.
///
/// Deliberately minimal: a single `fetch` that returns the decoded body. No
/// token lifecycle, no retry contract; the resilient machinery belongs to
/// the Spotify side, where the real state lives.
pub struct RedditClient {
    client: reqwest::Client,
    base_url: String,
}

impl RedditClient {
    pub fn new(base_url: String) -> Self {
        let user_agent = format!(
            "nmfbot/{} (weekly playlist bot)",
            env!("CARGO_PKG_VERSION")
        );
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        RedditClient { client, base_url }
    }

    /// GETs `base_url + endpoint` and parses the body as JSON.
    pub async fn fetch(&self, endpoint: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NmfError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NmfError::RemoteApi {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| NmfError::Parse(e.to_string()))
    }
}
