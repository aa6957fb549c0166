use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::api::{AccessToken, MusicService, Playlist, Track, VideoSearch};
use crate::downloader::report::{ResultLog, ResultRow};
use crate::downloader::MediaFetcher;
use crate::errors::Result;
use crate::utils::{extract_playlist_id, output_dir_name, watch_url};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory under which the playlist folder is created.
    pub download_path: PathBuf,
    pub log_file: PathBuf,
    pub watch_base_url: String,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub playlist: Playlist,
    pub output_dir: PathBuf,
    pub succeeded: usize,
    pub failed: usize,
}

/// Drives one playlist export: authenticate, resolve the playlist, then
/// search and download each track in order, one at a time.
pub struct DownloadManager {
    music: Arc<dyn MusicService + Send + Sync>,
    search: Arc<dyn VideoSearch + Send + Sync>,
    fetcher: Arc<dyn MediaFetcher + Send + Sync>,
    options: RunOptions,
}

impl DownloadManager {
    pub fn new(
        music: Arc<dyn MusicService + Send + Sync>,
        search: Arc<dyn VideoSearch + Send + Sync>,
        fetcher: Arc<dyn MediaFetcher + Send + Sync>,
        options: RunOptions,
    ) -> Self {
        Self {
            music,
            search,
            fetcher,
            options,
        }
    }

    /// Runs the export for `playlist_url`.
    ///
    /// Authentication and playlist-name failures are reported and the run goes
    /// on. A failed track listing aborts before the result log is touched.
    /// Per-track failures only mark that track's row.
    pub async fn run(&self, playlist_url: &str) -> Result<RunSummary> {
        let playlist_id = extract_playlist_id(playlist_url);
        log::info!("Exporting playlist {}", playlist_id);

        let token = match self.music.authenticate().await {
            Ok(token) => token,
            Err(e) => {
                log::error!("Authentication failed: {}", e);
                eprintln!("couldn't fetch token: {}", e);
                // Later calls fail on their own with the empty token.
                AccessToken::default()
            }
        };

        let playlist_name = match self.music.fetch_playlist_name(&playlist_id, &token).await {
            Ok(name) => name,
            Err(e) => {
                log::warn!("Playlist name unavailable: {}", e);
                eprintln!("couldn't fetch playlist name");
                e.to_string()
            }
        };
        let output_dir = self.options.download_path.join(output_dir_name(&playlist_name));

        let tracks = match self.music.fetch_tracks(&playlist_id, &token).await {
            Ok(tracks) => tracks,
            Err(e) => {
                log::error!("Track listing failed (status {:?}): {}", e.status(), e);
                eprintln!("failed to fetch playlist data from spotify api");
                return Err(e);
            }
        };

        let playlist = Playlist {
            id: playlist_id,
            name: playlist_name,
            tracks,
        };

        let mut log = ResultLog::create(&self.options.log_file)?;
        let total = playlist.tracks.len();
        println!("Downloading {} songs from playlist: {}", total, playlist.name);

        let mut succeeded = 0;
        for (idx, track) in playlist.tracks.iter().enumerate() {
            let sequence = idx + 1;
            println!("[{}/{}] Downloading: {} by {}", sequence, total, track.name, track.artist);

            let outcome = self.process_track(track, &output_dir).await;
            match &outcome {
                Ok(()) => succeeded += 1,
                Err(e) => log::warn!("[{}/{}] {} failed: {}", sequence, total, track.name, e),
            }
            log.record(&ResultRow::new(sequence, track, &outcome))?;
        }

        log::debug!("Wrote {} rows to {:?}", log.rows(), self.options.log_file);
        let failed = total - succeeded;
        println!("Finished: {} succeeded, {} failed", succeeded, failed);

        Ok(RunSummary {
            playlist,
            output_dir,
            succeeded,
            failed,
        })
    }

    /// Search, then download. A failed search skips the download.
    async fn process_track(&self, track: &Track, output_dir: &Path) -> Result<()> {
        let video_id = self.search.search_video(&track.search_query()).await?;
        let url = watch_url(&self.options.watch_base_url, &video_id)?;
        log::debug!("Fetching '{}' from {}", track.name, url);
        self.fetcher.fetch_audio(&url, output_dir).await
    }
}
