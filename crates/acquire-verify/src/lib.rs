//! Poll-driven checksum verification for downloaded artifacts.
//!
//! A verification runs on an [`acquire_core::Handle`]: `start` validates the
//! expected digest and opens the file, each poll hashes one chunk, and the
//! final poll compares digests.
//!
//! Hashing itself is delegated to whichever backend in [`backend::backends`]
//! implements the requested algorithm. Algorithms the library knows but no
//! compiled backend implements are reported as `UnsupportedChecksumFormat`.
//!
//! # Example
//!
//! ```no_run
//! use acquire_core::Handle;
//! use acquire_verify::{ChecksumAlgorithm, verify_sync};
//!
//! let mut handle = Handle::new();
//! let expected = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
//! verify_sync(&mut handle, "hello.txt", expected, ChecksumAlgorithm::Sha256)?;
//! # Ok::<(), acquire_core::Error>(())
//! ```

pub use self::algorithm::ChecksumAlgorithm;
pub use self::digest::ExpectedDigest;
pub use self::error::{Result, VerifyError};
pub use self::hasher::Hasher;
pub use self::reader::VerifiedReader;
pub use self::verify::{
    CHUNK_SIZE, digest_bytes, digest_file, verify_async_cancel, verify_async_poll,
    verify_async_start, verify_named_async_start, verify_sync,
};

#[cfg(feature = "sha2")]
pub use self::hasher::{DigestHasher, Sha256Hasher, Sha512Hasher};

#[cfg(feature = "blake3")]
pub use self::hasher::Blake3Hasher;

#[cfg(feature = "crc32")]
pub use self::hasher::Crc32Hasher;

mod algorithm;
pub mod backend;
mod digest;
mod error;
mod hasher;
mod reader;
mod verify;
