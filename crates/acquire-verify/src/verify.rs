//! Checksum verification driven through a [`Handle`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use acquire_core::{Backend, Handle, Progress, Status, Step, sync};
use tracing::debug;

use crate::algorithm::ChecksumAlgorithm;
use crate::backend;
use crate::digest::ExpectedDigest;
use crate::error::{Result, VerifyError};
use crate::reader::VerifiedReader;

/// Bytes hashed per poll.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Hashes an already-open file one chunk per poll.
struct FileVerifier {
    path: PathBuf,
    backend: &'static str,
    reader: Option<VerifiedReader<BufReader<File>>>,
    expected: ExpectedDigest,
    buf: Box<[u8]>,
}

impl FileVerifier {
    fn open(
        path: PathBuf,
        expected_hex: &str,
        algorithm: ChecksumAlgorithm,
        progress: &mut Progress,
    ) -> Result<Self> {
        let expected = ExpectedDigest::parse(algorithm, expected_hex)?;
        let hash_backend = backend::resolve(algorithm)?;
        let hasher = hash_backend
            .hasher(algorithm)
            .ok_or(VerifyError::Unsupported(algorithm))?;

        let file = File::open(&path).map_err(|source| VerifyError::Open {
            path: path.clone(),
            source,
        })?;
        let len = file.metadata().map(|m| m.len()).ok();
        progress.set_total(len);

        debug!(
            path = %path.display(),
            %algorithm,
            backend = hash_backend.name,
            "verifying file"
        );

        Ok(Self {
            path,
            backend: hash_backend.name,
            reader: Some(VerifiedReader::new(BufReader::new(file), hasher)),
            expected,
            buf: vec![0u8; CHUNK_SIZE].into_boxed_slice(),
        })
    }

    fn step(&mut self, progress: &mut Progress) -> Result<Step> {
        let reader = self
            .reader
            .as_mut()
            .ok_or(VerifyError::IllegalState("verifier polled after finishing"))?;

        let n = reader.read(&mut self.buf).map_err(|source| VerifyError::Read {
            path: self.path.clone(),
            source,
        })?;
        if n > 0 {
            progress.advance(n as u64);
            return Ok(Step::Pending);
        }

        let reader = self
            .reader
            .take()
            .ok_or(VerifyError::IllegalState("verifier polled after finishing"))?;
        reader.finish(&self.expected)?;
        Ok(Step::Done)
    }
}

impl Backend for FileVerifier {
    fn name(&self) -> &'static str {
        self.backend
    }

    fn poll(&mut self, progress: &mut Progress) -> acquire_core::Result<Step> {
        Ok(self.step(progress)?)
    }
}

/// Begin verifying `path` against `expected_hex`.
///
/// Argument problems are reported here, before any file is opened: a digest
/// of the wrong length fails with `UnsupportedChecksumFormat`, and an
/// algorithm with no compiled backend fails the same way.
pub fn verify_async_start(
    handle: &mut Handle,
    path: impl AsRef<Path>,
    expected_hex: &str,
    algorithm: ChecksumAlgorithm,
) -> acquire_core::Result<()> {
    let path = path.as_ref().to_path_buf();
    handle.start(|progress| {
        let verifier = FileVerifier::open(path, expected_hex, algorithm, progress)?;
        Ok(Box::new(verifier) as Box<dyn Backend>)
    })
}

/// Like [`verify_async_start`], resolving the algorithm by name.
///
/// Unknown names fail with `InvalidChecksumAlgorithm`.
pub fn verify_named_async_start(
    handle: &mut Handle,
    path: impl AsRef<Path>,
    expected_hex: &str,
    algorithm: &str,
) -> acquire_core::Result<()> {
    let path = path.as_ref().to_path_buf();
    handle.start(|progress| {
        let algorithm: ChecksumAlgorithm = algorithm.parse()?;
        let verifier = FileVerifier::open(path, expected_hex, algorithm, progress)?;
        Ok(Box::new(verifier) as Box<dyn Backend>)
    })
}

pub fn verify_async_poll(handle: &mut Handle) -> Status {
    handle.poll()
}

pub fn verify_async_cancel(handle: &mut Handle) {
    handle.cancel();
}

/// Verify `path` and block until the result is known.
pub fn verify_sync(
    handle: &mut Handle,
    path: impl AsRef<Path>,
    expected_hex: &str,
    algorithm: ChecksumAlgorithm,
) -> acquire_core::Result<()> {
    verify_async_start(handle, path, expected_hex, algorithm)?;
    sync::drive(handle)
}

/// Digest a whole file at once, outside of any handle.
pub fn digest_file(path: impl AsRef<Path>, algorithm: ChecksumAlgorithm) -> Result<String> {
    let path = path.as_ref();
    let hasher = backend::hasher_for(algorithm)?;
    let file = File::open(path).map_err(|source| VerifyError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = VerifiedReader::new(BufReader::new(file), hasher);
    std::io::copy(&mut reader, &mut std::io::sink()).map_err(|source| VerifyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(hex::encode(reader.digest()))
}

/// Digest an in-memory buffer.
pub fn digest_bytes(data: &[u8], algorithm: ChecksumAlgorithm) -> Result<String> {
    let mut hasher = backend::hasher_for(algorithm)?;
    hasher.update(data);
    Ok(hex::encode(hasher.finalize()))
}
