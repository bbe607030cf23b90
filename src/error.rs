use thiserror::Error;

/// Errors that can occur while fetching or serving recipes.
///
/// Extraction itself never fails; these cover the layers around it.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Failed to fetch recipe from URL
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Reading a file or binding a socket failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ImportError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ImportError::FetchError(e) => e.is_timeout() || e.is_connect(),
            ImportError::HttpStatus(status) => *status >= 500,
            _ => false,
        }
    }
}
