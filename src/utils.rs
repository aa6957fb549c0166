use std::path::Path;
use std::sync::OnceLock;
use log::info;
use regex::Regex;
use url::Url;
use crate::api::VideoId;
use crate::errors::{AppError, Result};

const PLAYLIST_URL_PREFIX: &str = "https://open.spotify.com/playlist/";
const PLAYLIST_URI_PREFIX: &str = "spotify:playlist:";

fn playlist_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https?://open\.spotify\.com/(?:intl-[a-z]{2}/)?playlist/([A-Za-z0-9]+)")
            .expect("playlist url pattern is valid")
    })
}

/// Extracts the playlist id from a sharable URL, a `spotify:playlist:` URI or a
/// bare id. Anything else comes back trimmed but otherwise untouched.
pub fn extract_playlist_id(input: &str) -> String {
    let input = input.trim();

    if let Some(captures) = playlist_url_regex().captures(input) {
        return captures[1].to_string();
    }
    if let Some(id) = input.strip_prefix(PLAYLIST_URI_PREFIX) {
        return id.to_string();
    }
    input
        .strip_prefix(PLAYLIST_URL_PREFIX)
        .unwrap_or(input)
        .to_string()
}

/// Sanitizes a filename by removing invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Folder that receives the audio files of a playlist.
pub fn output_dir_name(playlist_name: &str) -> String {
    sanitize_filename(&format!("{} (downloaded)", playlist_name))
}

/// Watch page for a video, e.g. `https://www.youtube.com/watch?v=<id>`.
pub fn watch_url(base: &str, video_id: &VideoId) -> Result<String> {
    let url = Url::parse_with_params(base, &[("v", video_id.as_str())])
        .map_err(|e| AppError::InvalidInput(format!("Invalid watch URL '{}': {}", base, e)))?;
    Ok(url.into())
}

/// Creates a directory (and its parents) if it doesn't exist
pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        tokio::fs::create_dir_all(path).await?;
        info!("Created directory: {:?}", path);
    }
    Ok(())
}
