use std::path::{Path, PathBuf};

/// Directory downloads land in when the caller names no other.
pub const DOWNLOAD_DIR: &str = ".downloads";

/// Platform path separator used when building local paths.
pub const PATH_SEPARATOR: char = std::path::MAIN_SEPARATOR;

/// Join a download directory and a file name.
///
/// Falls back to [`DOWNLOAD_DIR`] when `dir` is empty.
pub fn local_path(dir: &Path, file_name: &str) -> PathBuf {
    if dir.as_os_str().is_empty() {
        Path::new(DOWNLOAD_DIR).join(file_name)
    } else {
        dir.join(file_name)
    }
}
