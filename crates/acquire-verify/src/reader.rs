use std::io::{self, Read};

use crate::digest::ExpectedDigest;
use crate::error::Result;
use crate::hasher::Hasher;

/// Streaming reader that hashes data as it passes through.
pub struct VerifiedReader<R> {
    reader: R,
    hasher: Box<dyn Hasher>,
}

impl<R> VerifiedReader<R> {
    pub fn new(reader: R, hasher: Box<dyn Hasher>) -> Self {
        Self { reader, hasher }
    }

    /// Finalize the digest without comparing it.
    pub fn digest(self) -> Vec<u8> {
        self.hasher.finalize()
    }

    /// Finalize and compare against `expected`.
    pub fn finish(self, expected: &ExpectedDigest) -> Result<()> {
        let actual = self.hasher.finalize();
        expected.check(&actual)
    }
}

impl<R: Read> Read for VerifiedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
        }
        Ok(n)
    }
}
