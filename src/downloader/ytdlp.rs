use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use async_trait::async_trait;
use tokio::process::Command;
use crate::config::AppConfig;
use crate::downloader::MediaFetcher;
use crate::errors::{AppError, Result};
use crate::utils::ensure_dir_exists;

/// Output template handed to yt-dlp; the file takes the video's title.
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Finds an `ffmpeg` executable on `PATH`.
pub fn locate_ffmpeg() -> Option<PathBuf> {
    let binary = if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" };
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
}

/// Media fetcher that shells out to the `yt-dlp` executable.
pub struct YtDlpFetcher {
    ytdlp_path: String,
    ffmpeg_location: Option<PathBuf>,
    audio_format: &'static str,
    bitrate: u32,
}

impl YtDlpFetcher {
    pub fn new(
        ytdlp_path: impl Into<String>,
        ffmpeg_location: Option<PathBuf>,
        audio_format: &'static str,
        bitrate: u32,
    ) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
            ffmpeg_location,
            audio_format,
            bitrate,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let ffmpeg_location = config.ffmpeg_path.clone().or_else(locate_ffmpeg);
        match &ffmpeg_location {
            Some(path) => log::info!("Using ffmpeg at {:?}", path),
            None => log::warn!("ffmpeg not found; leaving the lookup to yt-dlp"),
        }
        Self::new(
            config.ytdlp_path.clone(),
            ffmpeg_location,
            config.get_format_extension(),
            config.get_quality_bitrate(),
        )
    }

    fn build_args(&self, video_url: &str, output_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--format".into(),
            "bestaudio/best".into(),
            "--extract-audio".into(),
            "--audio-format".into(),
            self.audio_format.into(),
            "--audio-quality".into(),
            format!("{}K", self.bitrate).into(),
            "--output".into(),
            output_dir.join(OUTPUT_TEMPLATE).into_os_string(),
            "--no-playlist".into(),
            "--quiet".into(),
        ];
        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.clone().into_os_string());
        }
        args.push(video_url.into());
        args
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch_audio(&self, video_url: &str, output_dir: &Path) -> Result<()> {
        ensure_dir_exists(output_dir).await?;

        let args = self.build_args(video_url, output_dir);
        log::debug!("Running {} {:?}", self.ytdlp_path, args);

        let output = Command::new(&self.ytdlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AppError::Download(format!("failed to start {}: {}", self.ytdlp_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!("yt-dlp failed for {}: {}", video_url, stderr.trim());
            return Err(AppError::Download(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        log::info!("Downloaded audio for {}", video_url);
        Ok(())
    }
}
