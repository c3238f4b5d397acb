//! Path checks applied to every entry before anything is written.

use std::path::{Component, Path, PathBuf};

use crate::error::{ArchiveError, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizedPath {
    /// Path as recorded in the archive.
    pub original: PathBuf,
    /// Normalized path below the destination, after stripping.
    pub relative: PathBuf,
    /// `relative` joined onto the destination.
    pub resolved: PathBuf,
}

/// Map an entry path to a location inside `base`.
///
/// Absolute paths and `..` components that climb above the archive root are
/// rejected as zip-slip. Backslashes are treated as separators so archives
/// written on Windows extract the same everywhere.
pub fn sanitize_path(
    entry_path: impl AsRef<Path>,
    base: impl AsRef<Path>,
    strip_components: usize,
) -> Result<SanitizedPath> {
    let entry_path = entry_path.as_ref();
    let base = base.as_ref();

    let normalized = normalize_relative(entry_path).map_err(|resolved| ArchiveError::ZipSlip {
        entry: entry_path.to_path_buf(),
        resolved: base.join(resolved),
    })?;
    if normalized.as_os_str().is_empty() {
        return Err(ArchiveError::InvalidPath(entry_path.to_path_buf()));
    }

    let relative = if strip_components > 0 {
        strip_path_components(&normalized, strip_components)?
    } else {
        normalized
    };

    Ok(SanitizedPath {
        original: entry_path.to_path_buf(),
        resolved: base.join(&relative),
        relative,
    })
}

/// Check that a symlink stored at `link_relative` (relative to `base`) points
/// inside `base`, and return where it points.
pub fn sanitize_symlink_target(
    target: impl AsRef<Path>,
    link_relative: impl AsRef<Path>,
    base: impl AsRef<Path>,
) -> Result<PathBuf> {
    let target = target.as_ref();
    let link_relative = link_relative.as_ref();
    let base = base.as_ref();

    if target.has_root() || has_prefix(target) {
        return Err(ArchiveError::AbsoluteSymlinkTarget {
            target: target.to_path_buf(),
            symlink: base.join(link_relative),
        });
    }

    let joined = link_relative
        .parent()
        .map(|p| p.join(target))
        .unwrap_or_else(|| target.to_path_buf());

    match normalize_relative(&joined) {
        Ok(relative) => Ok(base.join(relative)),
        Err(resolved) => Err(ArchiveError::SymlinkEscape {
            target: target.to_path_buf(),
            resolved: base.join(resolved),
        }),
    }
}

/// Strip leading path components.
pub fn strip_path_components(path: &Path, count: usize) -> Result<PathBuf> {
    let components: Vec<_> = path.components().collect();
    if components.len() <= count {
        return Err(ArchiveError::NoComponentsRemaining {
            original: path.to_path_buf(),
            count,
        });
    }
    Ok(components[count..].iter().collect())
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// On escape, the error carries the path as far as it had been resolved.
fn normalize_relative(path: &Path) -> std::result::Result<PathBuf, PathBuf> {
    let text = path.to_string_lossy();
    if text.contains('\0') {
        return Err(PathBuf::from(text.replace('\0', "")));
    }
    let unified = text.replace('\\', "/");
    let path = Path::new(&unified);

    let mut result = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                result.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir if depth > 0 => {
                result.pop();
                depth -= 1;
            }
            Component::ParentDir => return Err(result.join("..")),
            Component::RootDir | Component::Prefix(_) => return Err(path.to_path_buf()),
        }
    }
    Ok(result)
}

fn has_prefix(path: &Path) -> bool {
    matches!(path.components().next(), Some(Component::Prefix(_)))
}
