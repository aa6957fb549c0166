use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use crate::api::{read_json, AccessToken, MusicService, Track};
use crate::config::{Credentials, Endpoints};
use crate::errors::Result;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    name: String,
}

/// One page of `GET /playlists/{id}/tracks`.
#[derive(Debug, Deserialize)]
pub(crate) struct TracksPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    name: String,
    // Local files carry no id.
    id: Option<String>,
    #[serde(default)]
    artists: Vec<ArtistObject>,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    name: String,
}

impl TracksPage {
    /// Tracks on this page, skipping entries with no track attached.
    fn into_tracks(self) -> (Vec<Track>, Option<String>) {
        let tracks = self
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .map(|track| {
                let artist = track.artists.into_iter().next().map(|a| a.name);
                Track::new(track.name, track.id.unwrap_or_default(), artist.unwrap_or_default())
            })
            .collect();
        (tracks, self.next)
    }
}

/// Source of listing pages, addressed by absolute URL.
#[async_trait]
pub(crate) trait TrackPages {
    async fn page(&self, url: &str) -> Result<TracksPage>;
}

/// Follows `next` links from `first_url` until they run out. The first failing
/// page aborts the walk and everything gathered so far is dropped.
pub(crate) async fn collect_tracks<P>(pages: &P, first_url: String) -> Result<Vec<Track>>
where
    P: TrackPages + Sync + ?Sized,
{
    let mut tracks = Vec::new();
    let mut next = Some(first_url);
    let mut page_count = 0usize;

    while let Some(url) = next {
        log::debug!("Fetching playlist page {}: {}", page_count + 1, url);
        let (page_tracks, next_url) = pages.page(&url).await?.into_tracks();
        tracks.extend(page_tracks);
        next = next_url;
        page_count += 1;
    }

    log::info!("Collected {} tracks over {} page(s)", tracks.len(), page_count);
    Ok(tracks)
}

pub(crate) fn basic_credential(client_id: &str, client_secret: &str) -> String {
    STANDARD.encode(format!("{}:{}", client_id, client_secret))
}

/// Spotify Web API client using the client-credentials flow.
pub struct SpotifyClient {
    client: Client,
    credentials: Credentials,
    accounts_url: String,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(client: Client, credentials: Credentials, endpoints: &Endpoints) -> Self {
        Self {
            client,
            credentials,
            accounts_url: endpoints.spotify_accounts.clone(),
            api_url: endpoints.spotify_api.trim_end_matches('/').to_string(),
        }
    }

    fn playlist_url(&self, playlist_id: &str) -> String {
        format!("{}/playlists/{}", self.api_url, playlist_id)
    }

    fn tracks_url(&self, playlist_id: &str) -> String {
        format!("{}/tracks", self.playlist_url(playlist_id))
    }
}

struct AuthorizedPages<'a> {
    client: &'a Client,
    token: &'a AccessToken,
}

#[async_trait]
impl TrackPages for AuthorizedPages<'_> {
    async fn page(&self, url: &str) -> Result<TracksPage> {
        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.as_str())
            .send()
            .await?;
        read_json(response, "couldn't get songs").await
    }
}

#[async_trait]
impl MusicService for SpotifyClient {
    async fn authenticate(&self) -> Result<AccessToken> {
        log::debug!("Requesting access token from {}", self.accounts_url);
        let credential = basic_credential(
            &self.credentials.spotify_client_id,
            &self.credentials.spotify_client_secret,
        );
        let response = self
            .client
            .post(&self.accounts_url)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {}", credential))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let token: TokenResponse = read_json(response, "couldn't get token").await?;
        Ok(AccessToken::new(token.access_token))
    }

    async fn fetch_playlist_name(&self, playlist_id: &str, token: &AccessToken) -> Result<String> {
        let response = self
            .client
            .get(self.playlist_url(playlist_id))
            .bearer_auth(token.as_str())
            .send()
            .await?;
        let playlist: PlaylistResponse = read_json(response, "couldn't get playlist name").await?;
        Ok(playlist.name)
    }

    async fn fetch_tracks(&self, playlist_id: &str, token: &AccessToken) -> Result<Vec<Track>> {
        let pages = AuthorizedPages {
            client: &self.client,
            token,
        };
        collect_tracks(&pages, self.tracks_url(playlist_id)).await
    }
}
