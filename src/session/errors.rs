use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to read with serde: {0}")]
    SerdeError(#[from] serde_json::error::Error),
    #[error("session storage lock poisoned")]
    Poisoned,
}
