//! Extract capability entry points.

use std::path::Path;

use acquire_core::{Handle, Status, sync};

use crate::backend;
use crate::options::ExtractOptions;

/// Begin extracting `archive_path` into `destination`.
///
/// The archive is opened and its format settled here; a missing or
/// unrecognised archive never attaches a backend.
pub fn extract_async_start(
    handle: &mut Handle,
    archive_path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> acquire_core::Result<()> {
    let archive_path = archive_path.as_ref();
    let destination = destination.as_ref();
    handle.start(|progress| Ok(backend::open(archive_path, destination, options, progress)?))
}

pub fn extract_async_poll(handle: &mut Handle) -> Status {
    handle.poll()
}

pub fn extract_async_cancel(handle: &mut Handle) {
    handle.cancel();
}

/// Extract `archive_path` into `destination`, blocking until done.
pub fn extract_sync(
    handle: &mut Handle,
    archive_path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> acquire_core::Result<()> {
    extract_async_start(handle, archive_path, destination, options)?;
    sync::drive(handle)
}
