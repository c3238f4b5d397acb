//! URL parsing and local naming.

use std::path::{Path, PathBuf};

use acquire_core::local_path;
use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{FetchError, Result};

/// File name used when a URL has no usable path segment.
pub const FALLBACK_FILE_NAME: &str = "download";

/// Schemes a download can be started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    File,
}

pub fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))
}

pub fn scheme_of(url: &Url) -> Result<Scheme> {
    match url.scheme() {
        "http" | "https" => Ok(Scheme::Http),
        "file" => Ok(Scheme::File),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

/// Last non-empty path segment of `url`, percent-decoded.
///
/// Segments that would name something other than a plain file (`.`, `..`,
/// or anything containing a separator once decoded) are ignored.
pub fn file_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.rev().find(|s| !s.is_empty()))
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .filter(|name| is_plain_file_name(name))
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// `dir` joined with the file name derived from `url`.
pub fn local_path_for_url(url: &str, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let url = parse_url(url)?;
    Ok(local_path(dir.as_ref(), &file_name_from_url(&url)))
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}
