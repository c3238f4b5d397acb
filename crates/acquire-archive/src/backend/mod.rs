//! Extraction backends and the format dispatcher.

#[cfg(feature = "tar")]
mod tar;
#[cfg(feature = "zip")]
mod zip;

use std::fs::{self, File};
use std::path::Path;

use acquire_core::{Backend, Progress};
use tracing::debug;

use crate::detect::detect_from_reader;
use crate::error::{ArchiveError, Result};
use crate::format::ArchiveFormat;
use crate::options::ExtractOptions;

/// Open `archive_path`, settle its format, create `destination`, and build
/// the backend that will extract it.
pub(crate) fn open(
    archive_path: &Path,
    destination: &Path,
    options: &ExtractOptions,
    progress: &mut Progress,
) -> Result<Box<dyn Backend>> {
    let open_err = |source| ArchiveError::Open {
        path: archive_path.to_path_buf(),
        source,
    };
    let mut file = File::open(archive_path).map_err(open_err)?;
    if file.metadata().map_err(open_err)?.is_dir() {
        return Err(open_err(std::io::Error::other("is a directory")));
    }

    let format = match options.format {
        ArchiveFormat::Auto => detect_from_reader(&mut file)
            .map_err(open_err)?
            .ok_or(ArchiveError::UnsupportedFormat)?,
        explicit => explicit,
    };
    debug!(archive = %archive_path.display(), %format, "archive format resolved");

    fs::create_dir_all(destination).map_err(|source| ArchiveError::DirCreate {
        path: destination.to_path_buf(),
        source,
    })?;

    build(format, file, destination, options, progress)
}

fn build(
    format: ArchiveFormat,
    file: File,
    destination: &Path,
    options: &ExtractOptions,
    progress: &mut Progress,
) -> Result<Box<dyn Backend>> {
    match format {
        #[cfg(feature = "zip")]
        ArchiveFormat::Zip => Ok(Box::new(zip::ZipBackend::open(
            file,
            destination,
            options,
            progress,
        )?)),
        #[cfg(feature = "tar")]
        ArchiveFormat::Tar(codec) => Ok(Box::new(tar::TarBackend::open(
            file,
            codec,
            destination,
            options,
            progress,
        )?)),
        ArchiveFormat::Auto => Err(ArchiveError::UnsupportedFormat),
        #[allow(unreachable_patterns)]
        disabled => {
            let _ = (file, destination, options, progress);
            Err(ArchiveError::FormatDisabled(disabled))
        }
    }
}
