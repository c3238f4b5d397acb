//! Error types for acquire-fetch.

use std::io;
use std::path::PathBuf;

use acquire_core::ErrorCode;
use acquire_verify::VerifyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("failed to initialise HTTP client: {0}")]
    ClientInit(String),

    #[error("failed to start network runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("host not found: {0}")]
    HostNotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timeout")]
    Timeout,

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("destination path is a directory: {0}")]
    DestinationIsDirectory(PathBuf),

    #[error("failed to create directory '{path}': {source}")]
    DirCreate { path: PathBuf, source: io::Error },

    #[error("failed to create '{path}': {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to open '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Checksum(#[from] VerifyError),
}

impl FetchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidUrl(_) | Self::UnsupportedScheme(_) => ErrorCode::UrlParseFailed,
            Self::ClientInit(_) | Self::Runtime(_) => ErrorCode::NetworkInitFailed,
            Self::HostNotFound(_) => ErrorCode::HostNotFound,
            Self::Network(_) | Self::Timeout => ErrorCode::NetworkFailure,
            Self::HttpStatus { .. } => ErrorCode::HttpFailure,
            Self::DestinationIsDirectory(_) => ErrorCode::InvalidArgument,
            Self::DirCreate { .. } => ErrorCode::DirCreateFailed,
            Self::Create { .. } | Self::Open { .. } => ErrorCode::FileOpenFailed,
            Self::Read { .. } => ErrorCode::FileReadFailed,
            Self::Write { .. } => ErrorCode::FileWriteFailed,
            Self::Checksum(err) => err.code(),
        }
    }
}

impl From<FetchError> for acquire_core::Error {
    fn from(err: FetchError) -> Self {
        acquire_core::Error::new(err.code(), err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
