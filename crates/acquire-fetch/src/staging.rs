//! Temporary output placed next to the destination and moved into place on
//! success.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use acquire_verify::{ExpectedDigest, Hasher, backend};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{FetchError, Result};
use crate::options::FetchOptions;

/// Bytes of a download in flight.
///
/// Dropping a `StagedOutput` without calling [`commit`](Self::commit)
/// deletes the temporary file, so failed and cancelled downloads never leave
/// a destination file behind.
pub struct StagedOutput {
    destination: PathBuf,
    temp_path: PathBuf,
    writer: BufWriter<NamedTempFile>,
    checksum: Option<(Box<dyn Hasher>, ExpectedDigest)>,
    written: u64,
}

impl StagedOutput {
    pub fn create(destination: &Path, options: &FetchOptions) -> Result<Self> {
        if destination.is_dir() {
            return Err(FetchError::DestinationIsDirectory(destination.to_path_buf()));
        }

        let checksum = match &options.checksum {
            Some((algorithm, expected_hex)) => {
                let expected = ExpectedDigest::parse(*algorithm, expected_hex)?;
                Some((backend::hasher_for(*algorithm)?, expected))
            }
            None => None,
        };

        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if options.create_dirs && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| FetchError::DirCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp = tempfile::Builder::new()
            .prefix(".acquire-")
            .suffix(".part")
            .tempfile_in(parent)
            .map_err(|source| FetchError::Create {
                path: destination.to_path_buf(),
                source,
            })?;
        let temp_path = temp.path().to_path_buf();
        debug!(staging = %temp_path.display(), "staged output created");

        Ok(Self {
            destination: destination.to_path_buf(),
            temp_path,
            writer: BufWriter::with_capacity(options.chunk_size, temp),
            checksum,
            written: 0,
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .map_err(|source| FetchError::Write {
                path: self.temp_path.clone(),
                source,
            })?;
        if let Some((hasher, _)) = self.checksum.as_mut() {
            hasher.update(bytes);
        }
        self.written += bytes.len() as u64;
        Ok(())
    }

    /// Check the digest, flush, and move the file onto the destination.
    pub fn commit(self) -> Result<PathBuf> {
        let Self {
            destination,
            temp_path,
            writer,
            checksum,
            written,
        } = self;

        if let Some((hasher, expected)) = checksum {
            expected.check(&hasher.finalize())?;
        }

        let write_err = |source| FetchError::Write {
            path: temp_path.clone(),
            source,
        };
        let temp = writer.into_inner().map_err(|e| write_err(e.into_error()))?;
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(&destination).map_err(|e| FetchError::Write {
            path: destination.clone(),
            source: e.error,
        })?;

        debug!(path = %destination.display(), bytes = written, "download placed");
        Ok(destination)
    }
}
