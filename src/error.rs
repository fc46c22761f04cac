use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed to reach the issue tracker: {0}")]
    Transport(String),
    #[error("issue tracker responded with {status}: {message}")]
    Api { status: u16, message: String },
    #[error("failed to parse issue tracker response: {0}")]
    Parse(String),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
