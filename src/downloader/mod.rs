pub mod http_pool;
pub mod manager;
pub mod report;
pub mod ytdlp;

use std::path::Path;
use crate::errors::Result;

#[async_trait::async_trait]
pub trait MediaFetcher {
    /// Downloads the audio of `video_url` into `output_dir`, creating the
    /// directory if needed. The file is named after the video title.
    async fn fetch_audio(&self, video_url: &str, output_dir: &Path) -> Result<()>;
}
