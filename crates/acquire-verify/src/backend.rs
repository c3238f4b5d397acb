//! Table of compiled-in hashing backends and algorithm dispatch.

use tracing::trace;

use crate::algorithm::ChecksumAlgorithm;
use crate::error::{Result, VerifyError};
use crate::hasher::Hasher;

/// One hashing library and the algorithms it provides.
#[derive(Debug)]
pub struct HashBackend {
    pub name: &'static str,
    pub algorithms: &'static [ChecksumAlgorithm],
    make: fn(ChecksumAlgorithm) -> Option<Box<dyn Hasher>>,
}

impl HashBackend {
    pub fn supports(&self, algorithm: ChecksumAlgorithm) -> bool {
        self.algorithms.contains(&algorithm)
    }

    pub fn hasher(&self, algorithm: ChecksumAlgorithm) -> Option<Box<dyn Hasher>> {
        (self.make)(algorithm)
    }
}

#[cfg(feature = "sha2")]
fn rustcrypto(algorithm: ChecksumAlgorithm) -> Option<Box<dyn Hasher>> {
    use crate::hasher::{Sha256Hasher, Sha512Hasher};
    match algorithm {
        ChecksumAlgorithm::Sha256 => Some(Box::new(Sha256Hasher::new())),
        ChecksumAlgorithm::Sha512 => Some(Box::new(Sha512Hasher::new())),
        _ => None,
    }
}

#[cfg(feature = "blake3")]
fn blake3(algorithm: ChecksumAlgorithm) -> Option<Box<dyn Hasher>> {
    (algorithm == ChecksumAlgorithm::Blake3)
        .then(|| Box::new(crate::hasher::Blake3Hasher::new()) as Box<dyn Hasher>)
}

#[cfg(feature = "crc32")]
fn crc32(algorithm: ChecksumAlgorithm) -> Option<Box<dyn Hasher>> {
    (algorithm == ChecksumAlgorithm::Crc32)
        .then(|| Box::new(crate::hasher::Crc32Hasher::new()) as Box<dyn Hasher>)
}

static BACKENDS: &[HashBackend] = &[
    #[cfg(feature = "sha2")]
    HashBackend {
        name: "rustcrypto",
        algorithms: &[ChecksumAlgorithm::Sha256, ChecksumAlgorithm::Sha512],
        make: rustcrypto,
    },
    #[cfg(feature = "blake3")]
    HashBackend {
        name: "blake3",
        algorithms: &[ChecksumAlgorithm::Blake3],
        make: blake3,
    },
    #[cfg(feature = "crc32")]
    HashBackend {
        name: "crc32fast",
        algorithms: &[ChecksumAlgorithm::Crc32],
        make: crc32,
    },
];

/// Backends compiled into this build, in dispatch order.
pub fn backends() -> &'static [HashBackend] {
    BACKENDS
}

/// First compiled backend that implements `algorithm`.
pub fn resolve(algorithm: ChecksumAlgorithm) -> Result<&'static HashBackend> {
    let backend = BACKENDS
        .iter()
        .find(|b| b.supports(algorithm))
        .ok_or(VerifyError::Unsupported(algorithm))?;
    trace!(%algorithm, backend = backend.name, "resolved hash backend");
    Ok(backend)
}

/// Fresh hasher for `algorithm` from the backend that implements it.
pub fn hasher_for(algorithm: ChecksumAlgorithm) -> Result<Box<dyn Hasher>> {
    resolve(algorithm)?
        .hasher(algorithm)
        .ok_or(VerifyError::Unsupported(algorithm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use acquire_core::ErrorCode;

    #[test]
    fn crc32c_has_no_backend() {
        let err = resolve(ChecksumAlgorithm::Crc32c).unwrap_err();
        assert!(matches!(err, VerifyError::Unsupported(ChecksumAlgorithm::Crc32c)));
        assert_eq!(err.code(), ErrorCode::UnsupportedChecksumFormat);
    }

    #[test]
    fn every_listed_algorithm_yields_a_hasher() {
        for backend in backends() {
            for alg in backend.algorithms {
                let hasher = backend.hasher(*alg).expect("listed algorithm must build");
                assert_eq!(hasher.finalize().len(), alg.digest_len());
            }
        }
    }

    #[cfg(feature = "sha2")]
    #[test]
    fn sha_family_goes_to_rustcrypto() {
        assert_eq!(resolve(ChecksumAlgorithm::Sha256).unwrap().name, "rustcrypto");
        assert_eq!(resolve(ChecksumAlgorithm::Sha512).unwrap().name, "rustcrypto");
    }
}
