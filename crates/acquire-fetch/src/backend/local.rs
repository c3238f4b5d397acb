use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use acquire_core::{Backend, Progress, Step};
use tracing::{debug, trace};
use url::Url;

use crate::error::{FetchError, Result};
use crate::staging::StagedOutput;

/// Copy of a `file://` URL, one chunk per poll.
pub(crate) struct LocalFile {
    source: PathBuf,
    reader: File,
    output: Option<StagedOutput>,
    buf: Box<[u8]>,
}

impl LocalFile {
    pub(crate) fn start(
        url: &Url,
        output: StagedOutput,
        chunk_size: usize,
        progress: &mut Progress,
    ) -> Result<Self> {
        let source = url
            .to_file_path()
            .map_err(|()| FetchError::InvalidUrl(format!("{url}: not a local file path")))?;
        let reader = File::open(&source).map_err(|source_err| FetchError::Open {
            path: source.clone(),
            source: source_err,
        })?;
        progress.set_total(reader.metadata().map(|m| m.len()).ok());
        debug!(source = %source.display(), dest = %output.destination().display(), "local copy started");

        Ok(Self {
            source,
            reader,
            output: Some(output),
            buf: vec![0u8; chunk_size.max(1)].into_boxed_slice(),
        })
    }

    fn step(&mut self, progress: &mut Progress) -> Result<Step> {
        let n = self.reader.read(&mut self.buf).map_err(|source| FetchError::Read {
            path: self.source.clone(),
            source,
        })?;

        if n > 0 {
            if let Some(output) = self.output.as_mut() {
                output.write(&self.buf[..n])?;
                progress.set_bytes(output.written());
            }
            trace!(bytes = n, "chunk copied");
            return Ok(Step::Pending);
        }

        if let Some(output) = self.output.take() {
            output.commit()?;
        }
        debug!(source = %self.source.display(), "local copy complete");
        Ok(Step::Done)
    }
}

impl Backend for LocalFile {
    fn name(&self) -> &'static str {
        "local-file"
    }

    fn poll(&mut self, progress: &mut Progress) -> acquire_core::Result<Step> {
        Ok(self.step(progress)?)
    }

    fn cancel(&mut self) {
        debug!(source = %self.source.display(), "local copy cancelled");
        self.output = None;
    }
}
