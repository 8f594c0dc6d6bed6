use crate::client::ApiError;
use crate::session::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    #[error(transparent)]
    AppErrors(#[from] AppErrors),
}

#[derive(Error, Debug)]
pub enum AppErrors {
    #[error(transparent)]
    ApiError(#[from] ApiError),
    #[error(transparent)]
    SessionError(#[from] SessionError),
    #[error("invalid input: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
    #[error("failed to render template: {0}")]
    TemplateError(#[from] askama::Error),
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("{0}")]
    UnknownEnvironment(String),
    #[error("unknown session store type")]
    UnknownSessionStoreType,
    #[error("file session store requires `file_path`")]
    MissingSessionFile,
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(url::ParseError),
}
