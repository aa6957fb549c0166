pub mod spotify;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::errors::{AppError, Result};

/// A single playlist entry. Produced once from the listing and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub id: String,
    pub artist: String,
}

impl Track {
    pub fn new(name: impl Into<String>, id: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            artist: artist.into(),
        }
    }

    /// Free-text query used to find the track on the video platform.
    pub fn search_query(&self) -> String {
        format!("{} {}", self.name, self.artist)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    /// In the order the listing returned them.
    pub tracks: Vec<Track>,
}

/// Bearer token for the music service. One token serves the whole run; it is
/// never refreshed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoId(pub String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait MusicService {
    /// Client-credentials exchange using the credentials the client was built with.
    async fn authenticate(&self) -> Result<AccessToken>;
    async fn fetch_playlist_name(&self, playlist_id: &str, token: &AccessToken) -> Result<String>;
    /// All tracks across every page, or the first failure. Partial results are
    /// never returned.
    async fn fetch_tracks(&self, playlist_id: &str, token: &AccessToken) -> Result<Vec<Track>>;
}

#[async_trait]
pub trait VideoSearch {
    /// Identifier of the top video result for `query`.
    async fn search_video(&self, query: &str) -> Result<VideoId>;
}

/// Reads the body of `response` and decodes it as JSON, mapping a
/// non-success status to `AppError::Api`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &'static str,
) -> Result<T> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    decode_body(status, &body, context)
}

pub(crate) fn decode_body<T: DeserializeOwned>(status: u16, body: &str, context: &'static str) -> Result<T> {
    if !(200..300).contains(&status) {
        return Err(AppError::Api {
            context,
            status,
            body: body.to_string(),
        });
    }
    Ok(serde_json::from_str(body)?)
}
