use crate::session::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Server(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("failed to read response: {0}")]
    Decode(#[from] serde_json::error::Error),
    #[error("failed to build url: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    #[error(transparent)]
    Session(#[from] SessionError),
}
