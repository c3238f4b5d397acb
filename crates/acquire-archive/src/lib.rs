//! Poll-driven archive extraction with path sanitization.
//!
//! Each poll of an extraction handle writes exactly one archive entry.
//! Every entry path passes through [`sanitize_path`] first, so absolute
//! paths, `..` escapes and symlinks pointing outside the destination fail
//! the extraction instead of writing outside it.
//!
//! Supported containers: zip (feature `zip`) and tar, plain or compressed
//! with gzip (feature `tar`), xz (feature `xz`) or zstd (feature `zstd`).

pub use self::detect::{SNIFF_LEN, detect_format, detect_from_reader};
pub use self::error::{ArchiveError, Result};
pub use self::extract::{extract_async_cancel, extract_async_poll, extract_async_start, extract_sync};
pub use self::format::{ArchiveFormat, TarCompress};
pub use self::options::ExtractOptions;
pub use self::sanitize::{SanitizedPath, sanitize_path, sanitize_symlink_target, strip_path_components};

mod backend;
mod detect;
mod entry;
mod error;
mod extract;
mod format;
mod options;
mod sanitize;
