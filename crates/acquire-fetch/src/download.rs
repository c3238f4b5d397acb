//! Download capability entry points.

use std::path::{Path, PathBuf};

use acquire_core::{Handle, Status, sync};

use crate::backend;
use crate::location::local_path_for_url;
use crate::options::FetchOptions;

/// Begin downloading `url` to the file `destination`.
///
/// URL, checksum and destination problems are reported here. With the
/// blocking backend the whole transfer also happens here.
pub fn download_async_start(
    handle: &mut Handle,
    url: &str,
    destination: impl AsRef<Path>,
    options: &FetchOptions,
) -> acquire_core::Result<()> {
    let destination = destination.as_ref();
    handle.start(|progress| Ok(backend::open(url, destination, options, progress)?))
}

pub fn download_async_poll(handle: &mut Handle) -> Status {
    handle.poll()
}

pub fn download_async_cancel(handle: &mut Handle) {
    handle.cancel();
}

/// Download `url` to `destination`, blocking until done.
pub fn download_sync(
    handle: &mut Handle,
    url: &str,
    destination: impl AsRef<Path>,
    options: &FetchOptions,
) -> acquire_core::Result<()> {
    download_async_start(handle, url, destination, options)?;
    sync::drive(handle)
}

/// Start a download into `dir`, naming the file after the URL.
///
/// Returns the path the file will have once the download completes. An
/// empty `dir` means [`acquire_core::DOWNLOAD_DIR`].
pub fn download_to_dir(
    handle: &mut Handle,
    url: &str,
    dir: impl AsRef<Path>,
    options: &FetchOptions,
) -> acquire_core::Result<PathBuf> {
    let mut destination = PathBuf::new();
    handle.start(|progress| {
        destination = local_path_for_url(url, dir)?;
        Ok(backend::open(url, &destination, options, progress)?)
    })?;
    Ok(destination)
}
