//! The per-operation handle and the uniform poll contract.

use std::fmt;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::backend::{Backend, Progress, Step};
use crate::error::{Error, ErrorCode, Result, truncate_message};

/// Returned by [`error_string`] when no handle is given.
pub const INVALID_HANDLE_MESSAGE: &str = "invalid handle";

/// Lifecycle state of a handle.
///
/// The numeric values are stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Idle = 0,
    InProgress = 1,
    Complete = 2,
    Error = 3,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "idle"),
            Status::InProgress => write!(f, "in progress"),
            Status::Complete => write!(f, "complete"),
            Status::Error => write!(f, "error"),
        }
    }
}

/// Tracks one download, verification or extraction from start to finish.
///
/// A handle runs a single operation. Start it with one of the capability
/// `*_async_start` functions, poll it until [`Status::is_terminal`], then read
/// the outcome. Backend state lives inside the handle and is dropped as soon
/// as the operation ends, when [`Handle::release`] is called, or when the
/// handle itself is dropped.
///
/// Calls on one handle must be serialized by the caller; distinct handles are
/// independent and may live on different threads.
#[derive(Default)]
pub struct Handle {
    progress: Progress,
    status: Status,
    error_code: ErrorCode,
    error_message: String,
    backend: Option<Box<dyn Backend>>,
    cancel_requested: bool,
}

impl Handle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// The stored failure, if the handle is in [`Status::Error`].
    pub fn error(&self) -> Option<Error> {
        (self.status == Status::Error)
            .then(|| Error::new(self.error_code, self.error_message.clone()))
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn bytes_processed(&self) -> i64 {
        self.progress.bytes_processed()
    }

    pub fn total_size(&self) -> i64 {
        self.progress.total_size()
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.progress.current_file()
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested
    }

    /// Name of the backend currently attached, if any.
    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.name())
    }

    /// Whether the attached backend did all of its work inside `start`.
    ///
    /// `None` when nothing is attached.
    pub fn backend_blocks_in_start(&self) -> Option<bool> {
        self.backend.as_ref().map(|b| b.blocks_in_start())
    }

    /// Run a backend constructor and attach its state.
    ///
    /// The constructor receives the handle's progress so it can record sizes
    /// learned during setup. On failure nothing is attached and the error is
    /// stored on the handle as well as returned. A handle that is not idle is
    /// rejected without running the constructor and without touching the
    /// stored outcome.
    pub fn start<F>(&mut self, start: F) -> Result<()>
    where
        F: FnOnce(&mut Progress) -> Result<Box<dyn Backend>>,
    {
        if self.status != Status::Idle {
            return Err(Error::invalid_argument(format!(
                "handle already used (status: {})",
                self.status
            )));
        }

        match start(&mut self.progress) {
            Ok(backend) => {
                debug!(backend = backend.name(), "operation started");
                self.backend = Some(backend);
                self.status = Status::InProgress;
                Ok(())
            }
            Err(err) => {
                warn!(code = %err.code(), "start failed: {}", err.message());
                self.set_error(err.code(), err.message());
                Err(err)
            }
        }
    }

    /// Advance the operation by one bounded step and report the status.
    ///
    /// Terminal and idle handles are returned unchanged. A pending cancel is
    /// honoured here, before any further work.
    pub fn poll(&mut self) -> Status {
        if self.status != Status::InProgress {
            return self.status;
        }

        let Some(backend) = self.backend.as_mut() else {
            self.set_error(ErrorCode::Unknown, "in-progress poll with no backend");
            return self.status;
        };

        if self.cancel_requested {
            debug!(backend = backend.name(), "cancelling operation");
            backend.cancel();
            self.backend = None;
            let err = Error::cancelled();
            self.set_error(err.code(), err.message());
            return self.status;
        }

        match backend.poll(&mut self.progress) {
            Ok(Step::Pending) => trace!(
                backend = backend.name(),
                bytes = self.progress.bytes_processed(),
                percent = ?self.progress.percentage(),
                "poll"
            ),
            Ok(Step::Done) => {
                debug!(
                    backend = backend.name(),
                    bytes = self.progress.bytes_processed(),
                    "operation complete"
                );
                self.backend = None;
                self.status = Status::Complete;
            }
            Err(err) => {
                warn!(
                    backend = backend.name(),
                    code = %err.code(),
                    "operation failed: {}",
                    err.message()
                );
                self.backend = None;
                self.set_error(err.code(), err.message());
            }
        }
        self.status
    }

    /// Ask the running operation to stop.
    ///
    /// Only sets a flag; the next [`Handle::poll`] performs the teardown.
    pub fn cancel(&mut self) {
        self.cancel_requested = true;
    }

    /// Drop any backend state. Safe to call any number of times.
    ///
    /// Releasing an in-progress handle leaves it in progress with no backend,
    /// which the next poll reports as an internal error.
    pub fn release(&mut self) {
        if let Some(backend) = self.backend.take() {
            debug!(backend = backend.name(), "backend state released");
        }
    }

    /// Mark the handle as failed.
    ///
    /// An empty message clears any previously stored message.
    pub(crate) fn set_error(&mut self, code: ErrorCode, message: impl Into<String>) {
        self.status = Status::Error;
        self.error_code = code;
        self.error_message = truncate_message(message.into());
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("status", &self.status)
            .field("error_code", &self.error_code)
            .field("error_message", &self.error_message)
            .field("progress", &self.progress)
            .field("backend", &self.backend_name())
            .field("cancel_requested", &self.cancel_requested)
            .finish()
    }
}

/// Release a handle's backend state; `None` is ignored.
pub fn release(handle: Option<&mut Handle>) {
    if let Some(handle) = handle {
        handle.release();
    }
}

/// Request cancellation; `None` is ignored.
pub fn cancel(handle: Option<&mut Handle>) {
    if let Some(handle) = handle {
        handle.cancel();
    }
}

/// Poll a handle; `None` reports [`Status::Error`].
pub fn poll(handle: Option<&mut Handle>) -> Status {
    handle.map_or(Status::Error, Handle::poll)
}

/// Error code of a handle; `None` reports [`ErrorCode::InvalidArgument`].
pub fn error_code(handle: Option<&Handle>) -> ErrorCode {
    handle.map_or(ErrorCode::InvalidArgument, Handle::error_code)
}

/// Error message of a handle; `None` reports [`INVALID_HANDLE_MESSAGE`].
pub fn error_string(handle: Option<&Handle>) -> &str {
    handle.map_or(INVALID_HANDLE_MESSAGE, Handle::error_message)
}
