//! Handle, status and poll protocol shared by every acquire capability.
//!
//! # Architecture
//!
//! - `handle.rs` - The per-operation [`Handle`] and the uniform poll contract
//! - `backend.rs` - The [`Backend`] trait each download, verify or extract backend implements
//! - `error.rs` - Stable [`ErrorCode`] values and the [`Error`] carried by a handle
//! - `sync.rs` - Blocking wrappers that poll to completion
//! - `runtime.rs` - Refcounted process-wide runtime for async backends
//! - `paths.rs` - Download directory conventions
//!
//! # Model
//!
//! "Asynchronous" means non-blocking per call, not concurrent: progress only
//! happens while the caller polls, on the caller's thread.

pub use backend::{Backend, Progress, Step, UNKNOWN_SIZE};
pub use error::{Error, ErrorCode, MAX_ERROR_MESSAGE_LEN, Result};
pub use handle::{
    Handle, INVALID_HANDLE_MESSAGE, Status, cancel, error_code, error_string, poll, release,
};
pub use paths::{DOWNLOAD_DIR, PATH_SEPARATOR, local_path};
pub use runtime::SharedRuntime;

pub mod backend;
mod error;
mod handle;
mod paths;
pub mod runtime;
pub mod sync;
