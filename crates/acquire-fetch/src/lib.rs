//! Poll-driven downloads with staged, atomic placement.
//!
//! # Architecture
//!
//! - `download.rs` - Capability entry points operating on a [`Handle`](acquire_core::Handle)
//! - `backend/` - Streaming HTTP, blocking HTTP and `file://` backends
//! - `client.rs` - The [`HttpClient`] seam and its reqwest implementation
//! - `staging.rs` - Temporary output moved onto the destination on success
//! - `location.rs` - URL parsing and local file naming
//!
//! # Example
//!
//! ```no_run
//! use acquire_core::{Handle, Status};
//! use acquire_fetch::{FetchOptions, download_async_poll, download_async_start};
//!
//! let mut handle = Handle::new();
//! download_async_start(
//!     &mut handle,
//!     "https://example.com/tool.tar.gz",
//!     ".downloads/tool.tar.gz",
//!     &FetchOptions::default(),
//! )?;
//! while download_async_poll(&mut handle) == Status::InProgress {
//!     println!("{} / {}", handle.bytes_processed(), handle.total_size());
//! }
//! # Ok::<(), acquire_core::Error>(())
//! ```

pub use self::client::{BoxFuture, BoxStream, HttpClient, HttpResponse};
pub use self::download::{
    download_async_cancel, download_async_poll, download_async_start, download_sync,
    download_to_dir,
};
pub use self::error::{FetchError, Result};
pub use self::location::{FALLBACK_FILE_NAME, file_name_from_url, local_path_for_url, parse_url};
pub use self::options::{DEFAULT_CHUNK_SIZE, DEFAULT_POLL_INTERVAL, FetchBackend, FetchOptions};
pub use self::staging::StagedOutput;

#[cfg(feature = "reqwest")]
pub use self::client::ReqwestClient;

mod backend;
mod client;
mod download;
mod error;
mod location;
mod options;
mod staging;
