use thiserror::Error;

#[derive(Error, Debug)]
pub enum YtSaveError {
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timeout for URL: {0}")]
    RequestTimeout(String),

    /// Non-success response; `message` is what the server (or the fallback) says.
    #[error("{message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid server address: {0}")]
    InvalidServer(#[from] url::ParseError),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl YtSaveError {
    /// Text shown on the status line for this error.
    pub fn status_text(&self) -> String {
        match self {
            YtSaveError::ServerError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, YtSaveError>;
