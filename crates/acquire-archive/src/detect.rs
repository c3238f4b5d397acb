use std::io::{self, Read, Seek};

use crate::format::{ArchiveFormat, TarCompress};

/// Bytes needed to recognise every supported format, plain tar included.
pub const SNIFF_LEN: usize = 512;

/// Identify an archive from its leading bytes.
pub fn detect_format(data: &[u8]) -> Option<ArchiveFormat> {
    match data {
        [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..] => Some(ArchiveFormat::Zip),
        [0x1F, 0x8B, ..] => Some(ArchiveFormat::Tar(TarCompress::Gzip)),
        [0x28, 0xB5, 0x2F, 0xFD, ..] => Some(ArchiveFormat::Tar(TarCompress::Zstd)),
        [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] => Some(ArchiveFormat::Tar(TarCompress::Xz)),
        _ if is_tar_header(data) => Some(ArchiveFormat::Tar(TarCompress::None)),
        _ => None,
    }
}

/// POSIX `ustar\0` or old GNU `ustar  \0` magic at offset 257.
fn is_tar_header(data: &[u8]) -> bool {
    data.len() >= 263 && (data[257..263] == *b"ustar\0" || data[257..263] == *b"ustar ")
}

/// Sniff the format of a seekable reader and rewind it.
///
/// Inputs shorter than [`SNIFF_LEN`] are sniffed from what is there.
pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<Option<ArchiveFormat>> {
    let mut header = [0u8; SNIFF_LEN];
    let mut filled = 0;
    while filled < header.len() {
        match reader.read(&mut header[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    reader.rewind()?;
    Ok(detect_format(&header[..filled]))
}
