use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use crate::errors::Result;

pub const SPOTIFY_CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
pub const YOUTUBE_API_KEY_VAR: &str = "YOUTUBE_API_KEY";

const ENV_PREFIX: &str = "PLAYLIST_DL";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Root under which the "<playlist name> (downloaded)" folder is created.
    pub download_path: PathBuf,
    pub log_file: PathBuf,
    pub preferred_quality: AudioQuality,
    pub preferred_format: AudioFormat,
    pub ytdlp_path: String,
    pub ffmpeg_path: Option<PathBuf>,
    pub proxy: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Endpoints {
    pub spotify_accounts: String,
    pub spotify_api: String,
    pub youtube_search: String,
    pub youtube_watch: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AudioQuality {
    Low,    // 128 kbps
    Medium, // 192 kbps
    High,   // 256 kbps
    Best,   // 320 kbps
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    M4a,
    Flac,
    Wav,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            download_path: PathBuf::from("."),
            log_file: PathBuf::from("logs.csv"),
            preferred_quality: AudioQuality::Medium,
            preferred_format: AudioFormat::Mp3,
            ytdlp_path: "yt-dlp".to_string(),
            ffmpeg_path: None,
            proxy: None,
            request_timeout_secs: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            spotify_accounts: "https://accounts.spotify.com/api/token".to_string(),
            spotify_api: "https://api.spotify.com/v1".to_string(),
            youtube_search: "https://www.googleapis.com/youtube/v3/search".to_string(),
            youtube_watch: "https://www.youtube.com/watch".to_string(),
        }
    }
}

impl AppConfig {
    /// Layers defaults, the optional JSON config file and `PLAYLIST_DL__*`
    /// environment variables, later sources winning.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, None)
    }

    /// Same as [`AppConfig::load`], reading the environment layer from `env`
    /// instead of the process environment when given.
    fn load_with_env(
        config_path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();

        let path = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_config_path(),
        };
        if let Some(path) = path {
            log::debug!("Reading configuration from {:?}", path);
            // An explicitly requested file must exist.
            builder = builder.add_source(config::File::from(path).required(config_path.is_some()));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("playlist-dl").join("config.json"))
    }

    pub fn get_quality_bitrate(&self) -> u32 {
        match self.preferred_quality {
            AudioQuality::Low => 128,
            AudioQuality::Medium => 192,
            AudioQuality::High => 256,
            AudioQuality::Best => 320,
        }
    }

    pub fn get_format_extension(&self) -> &'static str {
        match self.preferred_format {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Flac => "flac",
            AudioFormat::Wav => "wav",
        }
    }
}

/// The three secrets the run needs. Loaded once, never persisted.
#[derive(Clone, Default)]
pub struct Credentials {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub youtube_api_key: String,
}

impl Credentials {
    /// Reads the secrets from the process environment. Absent values become
    /// empty strings; the remote services reject them at first use.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key).unwrap_or_else(|| {
                log::warn!("{} is not set", key);
                String::new()
            })
        };

        Self {
            spotify_client_id: read(SPOTIFY_CLIENT_ID_VAR),
            spotify_client_secret: read(SPOTIFY_CLIENT_SECRET_VAR),
            youtube_api_key: read(YOUTUBE_API_KEY_VAR),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |s: &str| if s.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("Credentials")
            .field("spotify_client_id", &redact(&self.spotify_client_id))
            .field("spotify_client_secret", &redact(&self.spotify_client_secret))
            .field("youtube_api_key", &redact(&self.youtube_api_key))
            .finish()
    }
}
