use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeanderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("Image load failed for {url}: {reason}")]
    ImageLoad { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MeanderError>;
