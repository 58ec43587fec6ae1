use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key not set. Run `yt-top init` to configure.")]
    ApiKeyMissing,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Could not resolve channel: {0}")]
    Resolution(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
