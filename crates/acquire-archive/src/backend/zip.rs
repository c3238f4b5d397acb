use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use acquire_core::{Backend, Progress, Step};
use tracing::{debug, trace};

use crate::entry::{EntryKind, Target};
use crate::error::{ArchiveError, Result};
use crate::format::ArchiveFormat;
use crate::options::ExtractOptions;

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// Zip extraction, one central-directory entry per poll.
pub(crate) struct ZipBackend {
    archive: zip::ZipArchive<BufReader<File>>,
    index: usize,
    destination: PathBuf,
    options: ExtractOptions,
}

impl ZipBackend {
    pub(crate) fn open(
        file: File,
        destination: &Path,
        options: &ExtractOptions,
        progress: &mut Progress,
    ) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| {
            ArchiveError::Corrupted {
                format: ArchiveFormat::Zip,
                reason: e.to_string(),
            }
        })?;

        let sizes = (0..archive.len())
            .map(|i| archive.by_index_raw(i).map(|entry| entry.size()))
            .collect::<zip::result::ZipResult<Vec<_>>>()
            .map_err(|e| ArchiveError::Header(e.to_string()))?;
        let total = uncompressed_total(sizes);
        progress.set_total(Some(total));
        debug!(entries = archive.len(), total, "zip archive opened");

        Ok(Self {
            archive,
            index: 0,
            destination: destination.to_path_buf(),
            options: options.clone(),
        })
    }

    fn step(&mut self, progress: &mut Progress) -> Result<Step> {
        if self.index >= self.archive.len() {
            progress.clear_current_file();
            return Ok(Step::Done);
        }

        let mut file = self
            .archive
            .by_index(self.index)
            .map_err(|e| ArchiveError::Header(e.to_string()))?;
        self.index += 1;

        let name = PathBuf::from(file.name());
        let size = file.size();
        let mode = file.unix_mode();

        let kind = if file.is_dir() {
            EntryKind::Directory
        } else if mode.is_some_and(|m| m & S_IFMT == S_IFLNK) {
            let mut target = String::new();
            file.read_to_string(&mut target)
                .map_err(|e| ArchiveError::Header(format!("{}: {e}", name.display())))?;
            EntryKind::Symlink(PathBuf::from(target))
        } else {
            EntryKind::File
        };

        let target = Target {
            root: &self.destination,
            options: &self.options,
        };
        if let Some(path) = target.place(&name, kind, mode, &mut file)? {
            trace!(entry = %name.display(), size, "zip entry extracted");
            progress.set_current_file(path);
        }
        progress.advance(size);
        Ok(Step::Pending)
    }
}

/// Sum of entry sizes; a crafted central directory can claim more than fits.
fn uncompressed_total(sizes: impl IntoIterator<Item = u64>) -> u64 {
    sizes.into_iter().fold(0, u64::saturating_add)
}

impl Backend for ZipBackend {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn poll(&mut self, progress: &mut Progress) -> acquire_core::Result<Step> {
        Ok(self.step(progress)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_totals_saturate() {
        assert_eq!(uncompressed_total([3, 4]), 7);
        assert_eq!(uncompressed_total([u64::MAX, 10]), u64::MAX);
        assert_eq!(uncompressed_total([]), 0);
    }
}
