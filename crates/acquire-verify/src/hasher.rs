/// Incremental digest computation.
///
/// Object safe so backends can hand out `Box<dyn Hasher>` for whichever
/// algorithm was requested.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

/// Adapter for any RustCrypto `Digest`.
#[cfg(feature = "sha2")]
pub struct DigestHasher<D>(D);

#[cfg(feature = "sha2")]
impl<D: sha2::Digest + Send> DigestHasher<D> {
    pub fn new() -> Self {
        Self(D::new())
    }
}

#[cfg(feature = "sha2")]
impl<D: sha2::Digest + Send> Default for DigestHasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "sha2")]
impl<D: sha2::Digest + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) { sha2::Digest::update(&mut self.0, data); }
    fn finalize(self: Box<Self>) -> Vec<u8> { sha2::Digest::finalize(self.0).to_vec() }
}

#[cfg(feature = "sha2")]
pub type Sha256Hasher = DigestHasher<sha2::Sha256>;

#[cfg(feature = "sha2")]
pub type Sha512Hasher = DigestHasher<sha2::Sha512>;

#[cfg(feature = "blake3")]
#[derive(Default)]
pub struct Blake3Hasher(blake3::Hasher);

#[cfg(feature = "blake3")]
impl Blake3Hasher {
    pub fn new() -> Self { Self(blake3::Hasher::new()) }
}

#[cfg(feature = "blake3")]
impl Hasher for Blake3Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self: Box<Self>) -> Vec<u8> { self.0.finalize().as_bytes().to_vec() }
}

/// CRC-32 (IEEE), emitted big-endian as it is conventionally printed.
#[cfg(feature = "crc32")]
#[derive(Default)]
pub struct Crc32Hasher(crc32fast::Hasher);

#[cfg(feature = "crc32")]
impl Crc32Hasher {
    pub fn new() -> Self { Self(crc32fast::Hasher::new()) }
}

#[cfg(feature = "crc32")]
impl Hasher for Crc32Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self: Box<Self>) -> Vec<u8> { self.0.finalize().to_be_bytes().to_vec() }
}
