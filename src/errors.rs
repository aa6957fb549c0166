use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The remote service answered with a non-success status.
    #[error("{context}: {status} {body}")]
    Api {
        context: &'static str,
        status: u16,
        body: String,
    },

    #[error("no search results")]
    NoSearchResults,

    #[error("no videoId in item: {0}")]
    MalformedSearchItem(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Upstream HTTP status, when the failure came from a remote response.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            AppError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_carries_status_and_body() {
        let err = AppError::Api {
            context: "couldn't get songs",
            status: 404,
            body: "{\"error\":\"not found\"}".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "couldn't get songs: 404 {\"error\":\"not found\"}");
    }

    #[test]
    fn search_errors_render_plain_messages() {
        assert_eq!(AppError::NoSearchResults.to_string(), "no search results");
        assert_eq!(AppError::NoSearchResults.status(), None);
        assert_eq!(
            AppError::MalformedSearchItem("{}".to_string()).to_string(),
            "no videoId in item: {}"
        );
    }
}
