use std::io;
use std::path::PathBuf;

use acquire_core::ErrorCode;

use crate::format::ArchiveFormat;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("not a readable {format} archive: {reason}")]
    Corrupted {
        format: ArchiveFormat,
        reason: String,
    },

    #[error("failed to read entry header: {0}")]
    Header(String),

    #[error("unsupported archive format")]
    UnsupportedFormat,

    #[error("{0} support is not compiled in")]
    FormatDisabled(ArchiveFormat),

    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("symlink target escapes base directory: '{target}' -> '{resolved}'")]
    SymlinkEscape { target: PathBuf, resolved: PathBuf },

    #[error("symlink target is absolute path: '{target}' in '{symlink}'")]
    AbsoluteSymlinkTarget { target: PathBuf, symlink: PathBuf },

    #[error("entry path is empty or contains a null byte: '{0}'")]
    InvalidPath(PathBuf),

    #[error("strip_components({count}) removed all path components from '{original}'")]
    NoComponentsRemaining { original: PathBuf, count: usize },

    #[error("'{0}' already exists")]
    AlreadyExists(PathBuf),

    #[error("failed to extract '{path}': {source}")]
    Extract { path: PathBuf, source: io::Error },

    #[error("failed to create symlink '{link}' -> '{target}': {source}")]
    Symlink {
        target: PathBuf,
        link: PathBuf,
        source: io::Error,
    },

    #[error("failed to create directory '{path}': {source}")]
    DirCreate { path: PathBuf, source: io::Error },
}

impl ArchiveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Open { .. } | Self::Corrupted { .. } => ErrorCode::ArchiveOpenFailed,
            Self::Header(_) => ErrorCode::ArchiveReadHeaderFailed,
            Self::UnsupportedFormat | Self::FormatDisabled(_) => {
                ErrorCode::UnsupportedArchiveFormat
            }
            Self::DirCreate { .. } => ErrorCode::DirCreateFailed,
            Self::ZipSlip { .. }
            | Self::SymlinkEscape { .. }
            | Self::AbsoluteSymlinkTarget { .. }
            | Self::InvalidPath(_)
            | Self::NoComponentsRemaining { .. }
            | Self::AlreadyExists(_)
            | Self::Extract { .. }
            | Self::Symlink { .. } => ErrorCode::ArchiveExtractFailed,
        }
    }
}

impl From<ArchiveError> for acquire_core::Error {
    fn from(err: ArchiveError) -> Self {
        acquire_core::Error::new(err.code(), err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
