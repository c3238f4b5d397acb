use crate::algorithm::ChecksumAlgorithm;
use crate::error::{Result, VerifyError};

/// A caller-supplied digest, validated against its algorithm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectedDigest {
    algorithm: ChecksumAlgorithm,
    bytes: Vec<u8>,
}

impl ExpectedDigest {
    /// Parse a hex digest. Case and surrounding whitespace are ignored.
    ///
    /// The length is checked before the characters, so a digest of the
    /// wrong size always reports [`VerifyError::DigestLength`].
    pub fn parse(algorithm: ChecksumAlgorithm, hex_digest: &str) -> Result<Self> {
        let hex_digest = hex_digest.trim();
        if hex_digest.len() != algorithm.hex_len() {
            return Err(VerifyError::DigestLength {
                algorithm,
                expected: algorithm.hex_len(),
                actual: hex_digest.len(),
            });
        }
        let bytes = hex::decode(hex_digest)?;
        Ok(Self { algorithm, bytes })
    }

    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Compare a finished digest against this one.
    pub fn check(&self, actual: &[u8]) -> Result<()> {
        if actual == self.bytes.as_slice() {
            Ok(())
        } else {
            Err(VerifyError::Mismatch {
                expected: self.to_hex(),
                actual: hex::encode(actual),
            })
        }
    }
}
