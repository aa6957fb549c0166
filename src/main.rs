mod api;
mod config;
mod downloader;
mod errors;
mod search;
mod utils;
#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use log::info;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::api::spotify::SpotifyClient;
use crate::config::{AppConfig, AudioFormat, AudioQuality, Credentials};
use crate::downloader::http_pool::HttpPool;
use crate::downloader::manager::{DownloadManager, RunOptions};
use crate::downloader::ytdlp::YtDlpFetcher;
use crate::search::YouTubeSearch;

/// Download every track of a Spotify playlist as audio via YouTube.
#[derive(Debug, Parser)]
#[command(name = "playlist-dl", version, about)]
struct Cli {
    /// Sharable playlist URL; prompted for when omitted
    playlist_url: Option<String>,

    /// Settings file (JSON); defaults to <config dir>/playlist-dl/config.json
    #[arg(long)]
    config: Option<PathBuf>,

    /// Result log path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Directory in which the "<playlist> (downloaded)" folder is created
    #[arg(long)]
    output_root: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<AudioFormat>,

    #[arg(long, value_enum)]
    quality: Option<AudioQuality>,

    /// yt-dlp executable
    #[arg(long = "yt-dlp")]
    ytdlp: Option<String>,

    /// ffmpeg executable handed to yt-dlp
    #[arg(long)]
    ffmpeg: Option<PathBuf>,

    #[arg(long)]
    proxy: Option<String>,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.log_file {
            config.log_file = path.clone();
        }
        if let Some(path) = &self.output_root {
            config.download_path = path.clone();
        }
        if let Some(format) = self.format {
            config.preferred_format = format;
        }
        if let Some(quality) = self.quality {
            config.preferred_quality = quality;
        }
        if let Some(ytdlp) = &self.ytdlp {
            config.ytdlp_path = ytdlp.clone();
        }
        if let Some(ffmpeg) = &self.ffmpeg {
            config.ffmpeg_path = Some(ffmpeg.clone());
        }
        if let Some(proxy) = &self.proxy {
            config.proxy = Some(proxy.clone());
        }
    }
}

async fn prompt_playlist_url() -> anyhow::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Enter playlist url: ").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read playlist url")?;
    Ok(line.trim().to_string())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut config);
    info!("Configuration loaded: {:?}", config);

    let credentials = Credentials::from_env();
    let http = HttpPool::from_config(&config).context("failed to build HTTP client")?;

    let music = SpotifyClient::new(http.get_client().clone(), credentials.clone(), &config.endpoints);
    let search = YouTubeSearch::new(
        http.get_client().clone(),
        credentials.youtube_api_key.clone(),
        config.endpoints.youtube_search.clone(),
    );
    let fetcher = YtDlpFetcher::from_config(&config);

    let manager = DownloadManager::new(
        Arc::new(music),
        Arc::new(search),
        Arc::new(fetcher),
        RunOptions {
            download_path: config.download_path.clone(),
            log_file: config.log_file.clone(),
            watch_base_url: config.endpoints.youtube_watch.clone(),
        },
    );

    let playlist_url = match cli.playlist_url {
        Some(url) => url,
        None => prompt_playlist_url().await?,
    };

    let summary = manager.run(&playlist_url).await?;
    info!(
        "Playlist '{}' done: {} succeeded, {} failed, files in {:?}",
        summary.playlist.name, summary.succeeded, summary.failed, summary.output_dir
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    // Secrets may come from a local .env file.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    info!("Starting playlist-dl");

    if let Err(e) = run(cli).await {
        log::error!("Run aborted: {:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
