use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use acquire_core::{Backend, Progress, Step};
use tracing::{debug, trace};

use crate::entry::{EntryKind, Target};
use crate::error::{ArchiveError, Result};
use crate::format::{Decoder, TarCompress};
use crate::options::ExtractOptions;

const BLOCK_SIZE: u64 = 512;

/// Tar extraction, one entry per poll.
///
/// `tar::Entries` borrows its archive, so instead of keeping an iterator
/// across polls each poll reads one header from the shared stream, consumes
/// the entry body, and skips the block padding so the next poll starts on a
/// header boundary.
pub(crate) struct TarBackend {
    stream: Decoder<BufReader<File>>,
    codec: TarCompress,
    destination: PathBuf,
    options: ExtractOptions,
    finished: bool,
}

impl TarBackend {
    pub(crate) fn open(
        file: File,
        codec: TarCompress,
        destination: &Path,
        options: &ExtractOptions,
        progress: &mut Progress,
    ) -> Result<Self> {
        let stream = codec.decoder(BufReader::new(file))?;
        progress.set_total(None);
        debug!(?codec, "tar archive opened");

        Ok(Self {
            stream,
            codec,
            destination: destination.to_path_buf(),
            options: options.clone(),
            finished: false,
        })
    }

    fn step(&mut self, progress: &mut Progress) -> Result<Step> {
        if self.finished {
            return Ok(Step::Done);
        }

        let mut archive = tar::Archive::new(&mut self.stream);
        let header_err = |e: io::Error| ArchiveError::Header(e.to_string());
        let mut entries = archive.entries().map_err(header_err)?;

        let Some(entry) = entries.next() else {
            self.finished = true;
            progress.clear_current_file();
            let done = progress.bytes_processed().max(0) as u64;
            progress.set_total(Some(done));
            debug!(codec = ?self.codec, bytes = done, "tar archive exhausted");
            return Ok(Step::Done);
        };
        let mut entry = entry.map_err(header_err)?;

        let name = entry.path().map_err(header_err)?.into_owned();
        let size = entry.header().entry_size().map_err(header_err)?;
        let mode = entry.header().mode().ok();
        let entry_type = entry.header().entry_type();

        let kind = if entry_type.is_dir() {
            EntryKind::Directory
        } else if entry_type.is_symlink() || entry_type.is_hard_link() {
            let target = entry
                .link_name()
                .map_err(header_err)?
                .ok_or_else(|| ArchiveError::Header(format!("{}: link without target", name.display())))?
                .into_owned();
            if entry_type.is_symlink() {
                EntryKind::Symlink(target)
            } else {
                EntryKind::HardLink(target)
            }
        } else if entry_type.is_file() || entry_type.is_contiguous() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        let target = Target {
            root: &self.destination,
            options: &self.options,
        };
        let placed = target.place(&name, kind, mode, &mut entry)?;

        // Whatever the writer did not consume, plus padding to the next block.
        io::copy(&mut entry, &mut io::sink()).map_err(header_err)?;
        drop(entry);
        drop(entries);
        drop(archive);
        let padding = (BLOCK_SIZE - size % BLOCK_SIZE) % BLOCK_SIZE;
        io::copy(&mut (&mut self.stream).take(padding), &mut io::sink()).map_err(header_err)?;

        if let Some(path) = placed {
            trace!(entry = %name.display(), size, "tar entry extracted");
            progress.set_current_file(path);
        }
        progress.advance(size);
        Ok(Step::Pending)
    }
}

impl Backend for TarBackend {
    fn name(&self) -> &'static str {
        "tar"
    }

    fn poll(&mut self, progress: &mut Progress) -> acquire_core::Result<Step> {
        Ok(self.step(progress)?)
    }
}
