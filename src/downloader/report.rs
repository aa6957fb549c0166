use std::fs::File;
use std::io::Write;
use std::path::Path;
use serde::Serialize;
use crate::api::Track;
use crate::errors::Result;

pub const HEADER: [&str; 5] = ["sr. no.", "song_name", "song_id", "download_success", "error_msg"];

/// One line of the result log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub sequence: usize,
    pub song_name: String,
    pub song_id: String,
    pub download_success: bool,
    pub error_msg: String,
}

impl ResultRow {
    pub fn new<E: std::fmt::Display>(
        sequence: usize,
        track: &Track,
        outcome: &std::result::Result<(), E>,
    ) -> Self {
        Self {
            sequence,
            song_name: track.name.clone(),
            song_id: track.id.clone(),
            download_success: outcome.is_ok(),
            error_msg: match outcome {
                Ok(()) => String::new(),
                Err(e) => e.to_string(),
            },
        }
    }
}

/// CSV log with one row per track, written in track order. The header goes
/// out as soon as the log is opened, so an empty playlist still gets one.
pub struct ResultLog<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl ResultLog<File> {
    /// Creates (or truncates) the log file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        log::debug!("Writing result log to {:?}", path);
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> ResultLog<W> {
    pub fn from_writer(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Appends a row and flushes it so the file reflects every finished track.
    pub fn record(&mut self, row: &ResultRow) -> Result<()> {
        self.writer.serialize(row)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    #[cfg(test)]
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::errors::AppError::Io(e.into_error()))
    }
}
