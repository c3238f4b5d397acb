use std::fmt;
use std::str::FromStr;

use crate::error::VerifyError;

/// Every checksum algorithm the library knows by name.
///
/// Knowing an algorithm does not mean a backend for it is compiled in; see
/// [`crate::backend::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    Crc32,
    Crc32c,
    Sha256,
    Sha512,
    Blake3,
}

impl ChecksumAlgorithm {
    pub const ALL: [ChecksumAlgorithm; 5] = [
        Self::Crc32,
        Self::Crc32c,
        Self::Sha256,
        Self::Sha512,
        Self::Blake3,
    ];

    /// Digest length in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            Self::Crc32 | Self::Crc32c => 4,
            Self::Sha256 | Self::Blake3 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Digest length in hex characters.
    pub fn hex_len(self) -> usize {
        self.digest_len() * 2
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crc32 => "crc32",
            Self::Crc32c => "crc32c",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = VerifyError;

    /// Case-insensitive; `-` and `_` are ignored, so `SHA-256` parses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == normalized)
            .ok_or_else(|| VerifyError::InvalidAlgorithm(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        assert_eq!("sha256".parse::<ChecksumAlgorithm>().unwrap(), ChecksumAlgorithm::Sha256);
        assert_eq!("SHA-512".parse::<ChecksumAlgorithm>().unwrap(), ChecksumAlgorithm::Sha512);
        assert_eq!("crc_32c".parse::<ChecksumAlgorithm>().unwrap(), ChecksumAlgorithm::Crc32c);
        assert_eq!("Blake3".parse::<ChecksumAlgorithm>().unwrap(), ChecksumAlgorithm::Blake3);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "md4".parse::<ChecksumAlgorithm>().unwrap_err();
        assert!(matches!(err, VerifyError::InvalidAlgorithm(ref name) if name == "md4"));
        assert_eq!(err.code(), acquire_core::ErrorCode::InvalidChecksumAlgorithm);
    }

    #[test]
    fn digest_lengths() {
        assert_eq!(ChecksumAlgorithm::Crc32.hex_len(), 8);
        assert_eq!(ChecksumAlgorithm::Sha256.hex_len(), 64);
        assert_eq!(ChecksumAlgorithm::Sha512.hex_len(), 128);
        assert_eq!(ChecksumAlgorithm::Blake3.digest_len(), 32);
    }

    #[test]
    fn display_round_trips() {
        for alg in ChecksumAlgorithm::ALL {
            assert_eq!(alg.to_string().parse::<ChecksumAlgorithm>().unwrap(), alg);
        }
    }
}
