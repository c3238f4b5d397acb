//! Download, verify and unpack artifacts through one handle API.
//!
//! Every capability follows the same protocol on an [`Handle`]: a
//! `*_async_start` call validates arguments and attaches a backend, each
//! `*_async_poll` does one bounded step, `*_async_cancel` requests a stop
//! that the next poll honours, and `*_sync` polls to completion.
//!
//! | Capability | Crate | Entry points |
//! |------------|-------|--------------|
//! | Download | [`fetch`] | [`download_async_start`], [`download_sync`], [`download_to_dir`] |
//! | Verify | [`verify`] | [`verify_async_start`], [`verify_sync`] |
//! | Extract | [`archive`] | [`extract_async_start`], [`extract_sync`] |
//!
//! # Example
//!
//! ```no_run
//! use acquire::{ChecksumAlgorithm, ExtractOptions, FetchOptions, Handle};
//!
//! let mut handle = Handle::new();
//! let path = acquire::download_to_dir(
//!     &mut handle,
//!     "https://example.com/tool-1.0.tar.gz",
//!     acquire::DOWNLOAD_DIR,
//!     &FetchOptions::default(),
//! )?;
//! acquire::sync::drive(&mut handle)?;
//!
//! let mut verify = Handle::new();
//! acquire::verify_sync(&mut verify, &path, "0123abcd...", ChecksumAlgorithm::Sha256)?;
//!
//! let mut extract = Handle::new();
//! acquire::extract_sync(&mut extract, &path, "tool", &ExtractOptions::default())?;
//! # Ok::<(), acquire::Error>(())
//! ```

pub use acquire_archive as archive;
pub use acquire_fetch as fetch;
pub use acquire_verify as verify;

pub use acquire_core::{
    Backend, DOWNLOAD_DIR, Error, ErrorCode, Handle, MAX_ERROR_MESSAGE_LEN, PATH_SEPARATOR,
    Progress, Result, Status, Step, UNKNOWN_SIZE, cancel, error_code, error_string, local_path,
    poll, release, sync,
};

pub use acquire_archive::{
    ArchiveFormat, ExtractOptions, TarCompress, extract_async_cancel, extract_async_poll,
    extract_async_start, extract_sync,
};
pub use acquire_fetch::{
    FetchBackend, FetchOptions, download_async_cancel, download_async_poll, download_async_start,
    download_sync, download_to_dir, local_path_for_url,
};
pub use acquire_verify::{
    ChecksumAlgorithm, verify_async_cancel, verify_async_poll, verify_async_start,
    verify_named_async_start, verify_sync,
};
