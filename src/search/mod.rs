use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use crate::api::{read_json, VideoId, VideoSearch};
use crate::errors::{AppError, Result};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Value>,
}

/// Picks the video id out of the first search result. Later results are
/// never looked at.
pub(crate) fn first_video_id(items: &[Value]) -> Result<VideoId> {
    let first = items.first().ok_or(AppError::NoSearchResults)?;
    first
        .get("id")
        .and_then(|id| id.get("videoId"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(|id| VideoId(id.to_string()))
        .ok_or_else(|| AppError::MalformedSearchItem(first.to_string()))
}

/// YouTube Data API v3 search, restricted to a single video result.
pub struct YouTubeSearch {
    client: Client,
    api_key: String,
    search_url: String,
}

impl YouTubeSearch {
    pub fn new(client: Client, api_key: impl Into<String>, search_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            search_url: search_url.into(),
        }
    }
}

#[async_trait]
impl VideoSearch for YouTubeSearch {
    async fn search_video(&self, query: &str) -> Result<VideoId> {
        log::debug!("Searching videos for '{}'", query);
        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", "1"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let results: SearchResponse = read_json(response, "couldn't get song ids").await?;
        let video_id = first_video_id(&results.items)?;
        log::debug!("Top result for '{}': {}", query, video_id);
        Ok(video_id)
    }
}
