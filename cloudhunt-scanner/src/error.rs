use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Too many redirects: {0}")]
    TooManyRedirects(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("DNS lookup failed: {0}")]
    Dns(String),

    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
