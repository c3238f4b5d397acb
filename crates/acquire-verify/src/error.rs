use std::io;
use std::path::PathBuf;

use acquire_core::ErrorCode;

use crate::ChecksumAlgorithm;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("invalid checksum algorithm '{0}'")]
    InvalidAlgorithm(String),

    #[error("no checksum backend supports {0}")]
    Unsupported(ChecksumAlgorithm),

    #[error("{algorithm} digest must be {expected} hex characters, got {actual}")]
    DigestLength {
        algorithm: ChecksumAlgorithm,
        expected: usize,
        actual: usize,
    },

    #[error("expected digest is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    #[error("failed to open '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("illegal state: {0}")]
    IllegalState(&'static str),
}

impl VerifyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidAlgorithm(_) => ErrorCode::InvalidChecksumAlgorithm,
            Self::Unsupported(_) | Self::DigestLength { .. } => {
                ErrorCode::UnsupportedChecksumFormat
            }
            Self::InvalidHex(_) => ErrorCode::InvalidArgument,
            Self::Mismatch { .. } => ErrorCode::ChecksumMismatch,
            Self::Open { .. } => ErrorCode::FileOpenFailed,
            Self::Read { .. } => ErrorCode::FileReadFailed,
            Self::IllegalState(_) => ErrorCode::Unknown,
        }
    }
}

impl From<VerifyError> for acquire_core::Error {
    fn from(err: VerifyError) -> Self {
        acquire_core::Error::new(err.code(), err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
