use std::fmt;
#[cfg(feature = "tar")]
use std::io::{self, BufRead, Read};

#[cfg(feature = "tar")]
use crate::error::{ArchiveError, Result};

/// Archive container, or `Auto` to sniff it from the file's magic bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ArchiveFormat {
    #[default]
    Auto,
    Zip,
    Tar(TarCompress),
}

/// Compression codec for tar archives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TarCompress {
    None,
    Gzip,
    Xz,
    Zstd,
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Zip => write!(f, "zip"),
            Self::Tar(TarCompress::None) => write!(f, "tar"),
            Self::Tar(TarCompress::Gzip) => write!(f, "tar.gz"),
            Self::Tar(TarCompress::Xz) => write!(f, "tar.xz"),
            Self::Tar(TarCompress::Zstd) => write!(f, "tar.zst"),
        }
    }
}

#[cfg(feature = "tar")]
impl TarCompress {
    /// Create a decoder for this compression codec.
    pub fn decoder<R: BufRead>(self, reader: R) -> Result<Decoder<R>> {
        match self {
            Self::None => Ok(Decoder::Passthrough(reader)),
            Self::Gzip => Ok(Decoder::Gzip(Box::new(flate2::bufread::GzDecoder::new(
                reader,
            )))),
            #[cfg(feature = "xz")]
            Self::Xz => Ok(Decoder::Xz(Box::new(xz2::bufread::XzDecoder::new(reader)))),
            #[cfg(not(feature = "xz"))]
            Self::Xz => Err(ArchiveError::FormatDisabled(ArchiveFormat::Tar(self))),
            #[cfg(feature = "zstd")]
            Self::Zstd => {
                let decoder = zstd::stream::read::Decoder::with_buffer(reader).map_err(|e| {
                    ArchiveError::Corrupted {
                        format: ArchiveFormat::Tar(self),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Decoder::Zstd(Box::new(decoder)))
            }
            #[cfg(not(feature = "zstd"))]
            Self::Zstd => Err(ArchiveError::FormatDisabled(ArchiveFormat::Tar(self))),
        }
    }
}

/// Decompressing reader in front of a tar stream.
#[cfg(feature = "tar")]
pub enum Decoder<R: BufRead> {
    Passthrough(R),
    Gzip(Box<flate2::bufread::GzDecoder<R>>),
    #[cfg(feature = "xz")]
    Xz(Box<xz2::bufread::XzDecoder<R>>),
    #[cfg(feature = "zstd")]
    Zstd(Box<zstd::stream::read::Decoder<'static, R>>),
}

#[cfg(feature = "tar")]
impl<R: BufRead> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
            #[cfg(feature = "xz")]
            Self::Xz(d) => d.read(buf),
            #[cfg(feature = "zstd")]
            Self::Zstd(d) => d.read(buf),
        }
    }
}

#[cfg(all(test, feature = "tar"))]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn none_passes_through() {
        let mut decoder = TarCompress::None.decoder(Cursor::new(b"hello".to_vec())).unwrap();
        let mut out = String::new();
        decoder.read_to_string(&mut out).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn gzip_round_trips() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"compressed body").unwrap();
        let bytes = encoder.finish().unwrap();

        let mut decoder = TarCompress::Gzip.decoder(Cursor::new(bytes)).unwrap();
        let mut out = String::new();
        decoder.read_to_string(&mut out).unwrap();
        assert_eq!(out, "compressed body");
    }

    #[test]
    fn display_names() {
        assert_eq!(ArchiveFormat::Zip.to_string(), "zip");
        assert_eq!(ArchiveFormat::Tar(TarCompress::Gzip).to_string(), "tar.gz");
        assert_eq!(ArchiveFormat::default(), ArchiveFormat::Auto);
    }
}
