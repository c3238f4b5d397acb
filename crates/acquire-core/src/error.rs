//! Error codes and the error value carried by a [`Handle`](crate::Handle).

use std::fmt;

/// Longest error message a handle stores, in bytes.
///
/// Longer messages are cut on the nearest preceding char boundary.
pub const MAX_ERROR_MESSAGE_LEN: usize = 256;

/// Closed set of error codes.
///
/// The numeric values are stable and may be persisted or compared by callers.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    #[default]
    Ok = 0,

    Unknown = 1,
    OutOfMemory = 2,
    Cancelled = 3,
    InvalidArgument = 4,

    FileOpenFailed = 100,
    FileWriteFailed = 101,
    FileReadFailed = 102,
    DirCreateFailed = 103,

    NetworkInitFailed = 200,
    UrlParseFailed = 201,
    HostNotFound = 202,
    NetworkFailure = 203,
    HttpFailure = 204,

    ArchiveOpenFailed = 300,
    ArchiveReadHeaderFailed = 301,
    ArchiveExtractFailed = 302,
    UnsupportedArchiveFormat = 303,

    UnsupportedChecksumFormat = 400,
    ChecksumMismatch = 401,
    InvalidChecksumAlgorithm = 402,
}

impl ErrorCode {
    const ALL: [ErrorCode; 21] = [
        Self::Ok,
        Self::Unknown,
        Self::OutOfMemory,
        Self::Cancelled,
        Self::InvalidArgument,
        Self::FileOpenFailed,
        Self::FileWriteFailed,
        Self::FileReadFailed,
        Self::DirCreateFailed,
        Self::NetworkInitFailed,
        Self::UrlParseFailed,
        Self::HostNotFound,
        Self::NetworkFailure,
        Self::HttpFailure,
        Self::ArchiveOpenFailed,
        Self::ArchiveReadHeaderFailed,
        Self::ArchiveExtractFailed,
        Self::UnsupportedArchiveFormat,
        Self::UnsupportedChecksumFormat,
        Self::ChecksumMismatch,
        Self::InvalidChecksumAlgorithm,
    ];

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a stored numeric code back to its variant.
    pub fn from_i32(value: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.as_i32() == value)
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    /// Short, stable, lowercase name of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Unknown => "unknown",
            Self::OutOfMemory => "out of memory",
            Self::Cancelled => "cancelled",
            Self::InvalidArgument => "invalid argument",
            Self::FileOpenFailed => "file open failed",
            Self::FileWriteFailed => "file write failed",
            Self::FileReadFailed => "file read failed",
            Self::DirCreateFailed => "directory create failed",
            Self::NetworkInitFailed => "network init failed",
            Self::UrlParseFailed => "url parse failed",
            Self::HostNotFound => "host not found",
            Self::NetworkFailure => "network failure",
            Self::HttpFailure => "http failure",
            Self::ArchiveOpenFailed => "archive open failed",
            Self::ArchiveReadHeaderFailed => "archive header read failed",
            Self::ArchiveExtractFailed => "archive extract failed",
            Self::UnsupportedArchiveFormat => "unsupported archive format",
            Self::UnsupportedChecksumFormat => "unsupported checksum format",
            Self::ChecksumMismatch => "checksum mismatch",
            Self::InvalidChecksumAlgorithm => "invalid checksum algorithm",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.as_i32())
    }
}

/// A code plus a human-readable explanation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorCode::Cancelled, "operation cancelled")
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Cut `message` to at most [`MAX_ERROR_MESSAGE_LEN`] bytes without splitting a char.
pub(crate) fn truncate_message(mut message: String) -> String {
    if message.len() > MAX_ERROR_MESSAGE_LEN {
        let mut end = MAX_ERROR_MESSAGE_LEN;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message.truncate(end);
    }
    message
}
