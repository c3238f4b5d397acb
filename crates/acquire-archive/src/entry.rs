//! Writing one sanitized entry to disk.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use crate::error::{ArchiveError, Result};
use crate::options::ExtractOptions;
use crate::sanitize::{SanitizedPath, sanitize_path, sanitize_symlink_target};

/// What an archive entry turns into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum EntryKind {
    File,
    Directory,
    Symlink(PathBuf),
    /// Hard link to an earlier entry, by archive path.
    HardLink(PathBuf),
    /// Devices, fifos and anything else not extracted.
    Other,
}

/// Destination directory plus the options governing writes into it.
pub(crate) struct Target<'a> {
    pub root: &'a Path,
    pub options: &'a ExtractOptions,
}

impl Target<'_> {
    /// Write one entry. Returns the written path, or `None` when the entry
    /// was skipped.
    pub(crate) fn place(
        &self,
        name: &Path,
        kind: EntryKind,
        mode: Option<u32>,
        data: &mut dyn Read,
    ) -> Result<Option<PathBuf>> {
        let Some(path) = self.resolve(name)? else {
            trace!(entry = %name.display(), "entry stripped away");
            return Ok(None);
        };
        self.reject_symlinked_parents(&path)?;

        match kind {
            EntryKind::Directory => {
                create_dirs(&path.resolved)?;
                self.apply_mode(&path.resolved, mode.map(|m| m | 0o700))?;
            }
            EntryKind::File => {
                self.prepare_parent(&path.resolved)?;
                self.clear_existing(&path.resolved)?;
                let extract_err = |source| ArchiveError::Extract {
                    path: path.resolved.clone(),
                    source,
                };
                let file = File::create(&path.resolved).map_err(extract_err)?;
                let mut writer = BufWriter::new(file);
                io::copy(data, &mut writer).map_err(extract_err)?;
                writer.flush().map_err(extract_err)?;
                self.apply_mode(&path.resolved, mode)?;
            }
            EntryKind::Symlink(target) => {
                sanitize_symlink_target(&target, &path.relative, self.root)?;
                self.confine_symlink(&path, &target)?;
                self.prepare_parent(&path.resolved)?;
                self.clear_existing(&path.resolved)?;
                make_symlink(&target, &path.resolved)?;
            }
            EntryKind::HardLink(source) => {
                let Some(source) = self.resolve(&source)? else {
                    return Ok(None);
                };
                self.reject_symlinked_parents(&source)?;
                if fs::symlink_metadata(&source.resolved).is_ok_and(|m| m.file_type().is_symlink()) {
                    return Err(ArchiveError::ZipSlip {
                        entry: source.original,
                        resolved: source.resolved,
                    });
                }
                self.prepare_parent(&path.resolved)?;
                self.clear_existing(&path.resolved)?;
                fs::copy(&source.resolved, &path.resolved).map_err(|source| {
                    ArchiveError::Extract {
                        path: path.resolved.clone(),
                        source,
                    }
                })?;
            }
            EntryKind::Other => {
                trace!(entry = %name.display(), "special entry skipped");
                return Ok(None);
            }
        }

        Ok(Some(path.resolved))
    }

    fn resolve(&self, name: &Path) -> Result<Option<SanitizedPath>> {
        match sanitize_path(name, self.root, self.options.strip_components) {
            Ok(path) => Ok(Some(path)),
            Err(ArchiveError::NoComponentsRemaining { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// An earlier symlink entry must not redirect later writes outside the
    /// destination.
    fn reject_symlinked_parents(&self, path: &SanitizedPath) -> Result<()> {
        let mut current = self.root.to_path_buf();
        let Some(parent) = path.relative.parent() else {
            return Ok(());
        };
        for component in parent.components() {
            current.push(component);
            if fs::symlink_metadata(&current).is_ok_and(|m| m.file_type().is_symlink()) {
                return Err(ArchiveError::ZipSlip {
                    entry: path.original.clone(),
                    resolved: current,
                });
            }
        }
        Ok(())
    }

    /// Follow a symlink target on disk, through links written by earlier
    /// entries, and require every step to stay below the destination.
    ///
    /// A `..` is only trusted right after a real directory: after a link or a
    /// path that does not exist yet, a later entry could change what it means.
    fn confine_symlink(&self, link: &SanitizedPath, target: &Path) -> Result<()> {
        let root = self.root.canonicalize().map_err(|source| ArchiveError::Extract {
            path: self.root.to_path_buf(),
            source,
        })?;
        let escape = |resolved: PathBuf| ArchiveError::SymlinkEscape {
            target: target.to_path_buf(),
            resolved,
        };

        // Missing parents are created as plain directories.
        let mut current = root.clone();
        if let Some(parent) = link.relative.parent() {
            current.push(parent);
        }

        let unified = target.to_string_lossy().replace('\\', "/");
        let mut settled = true;
        for component in Path::new(&unified).components() {
            match component {
                Component::CurDir => continue,
                Component::ParentDir if settled => {
                    current.pop();
                }
                Component::Normal(part) => {
                    let next = current.join(part);
                    match fs::symlink_metadata(&next) {
                        Ok(meta) if settled && meta.file_type().is_symlink() => {
                            current = next.canonicalize().map_err(|_| escape(next.clone()))?;
                            settled = false;
                        }
                        Ok(meta) if settled && meta.is_dir() => current = next,
                        _ => {
                            current = next;
                            settled = false;
                        }
                    }
                }
                _ => return Err(escape(current.join(component))),
            }
            if !current.starts_with(&root) {
                return Err(escape(current));
            }
        }
        Ok(())
    }

    fn prepare_parent(&self, path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.exists() => create_dirs(parent),
            _ => Ok(()),
        }
    }

    fn clear_existing(&self, path: &Path) -> Result<()> {
        let Ok(meta) = fs::symlink_metadata(path) else {
            return Ok(());
        };
        if !self.options.overwrite || meta.is_dir() {
            return Err(ArchiveError::AlreadyExists(path.to_path_buf()));
        }
        fs::remove_file(path).map_err(|source| ArchiveError::Extract {
            path: path.to_path_buf(),
            source,
        })
    }

    #[cfg(unix)]
    fn apply_mode(&self, path: &Path, mode: Option<u32>) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let Some(mode) = mode.filter(|_| self.options.preserve_permissions) else {
            return Ok(());
        };
        fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777)).map_err(|source| {
            ArchiveError::Extract {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[cfg(not(unix))]
    fn apply_mode(&self, _path: &Path, _mode: Option<u32>) -> Result<()> {
        Ok(())
    }
}

fn create_dirs(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| ArchiveError::DirCreate {
        path: path.to_path_buf(),
        source,
    })
}

fn make_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(target, link);
    #[cfg(windows)]
    let result = std::os::windows::fs::symlink_file(target, link);
    #[cfg(not(any(unix, windows)))]
    let result = Err(io::Error::from(io::ErrorKind::Unsupported));

    result.map_err(|source| ArchiveError::Symlink {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn place(
        root: &Path,
        options: &ExtractOptions,
        name: &str,
        kind: EntryKind,
        data: &[u8],
    ) -> Result<Option<PathBuf>> {
        let target = Target { root, options };
        target.place(Path::new(name), kind, None, &mut Cursor::new(data))
    }

    #[test]
    fn file_is_written_with_parents() {
        let dir = tempdir().unwrap();
        let options = ExtractOptions::default();
        let path = place(dir.path(), &options, "a/b/c.txt", EntryKind::File, b"data")
            .unwrap()
            .unwrap();
        assert_eq!(path, dir.path().join("a/b/c.txt"));
        assert_eq!(fs::read(&path).unwrap(), b"data");
    }

    #[test]
    fn existing_file_respects_overwrite() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("f"), b"old").unwrap();

        let keep = ExtractOptions::default().overwrite(false);
        let err = place(dir.path(), &keep, "f", EntryKind::File, b"new").unwrap_err();
        assert!(matches!(err, ArchiveError::AlreadyExists(_)));

        let replace = ExtractOptions::default();
        place(dir.path(), &replace, "f", EntryKind::File, b"new").unwrap();
        assert_eq!(fs::read(dir.path().join("f")).unwrap(), b"new");
    }

    #[test]
    fn fully_stripped_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let options = ExtractOptions::default().strip_components(1);
        let placed = place(dir.path(), &options, "top/", EntryKind::Directory, b"").unwrap();
        assert!(placed.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn writes_through_symlinked_dirs_are_rejected() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        let options = ExtractOptions::default();
        let err = place(dir.path(), &options, "link/evil", EntryKind::File, b"x").unwrap_err();
        assert!(matches!(err, ArchiveError::ZipSlip { .. }));
        assert!(!outside.path().join("evil").exists());
    }

    #[cfg(unix)]
    #[test]
    fn escaping_symlink_is_rejected() {
        let dir = tempdir().unwrap();
        let options = ExtractOptions::default();
        let err = place(
            dir.path(),
            &options,
            "bin/link",
            EntryKind::Symlink("../../etc/passwd".into()),
            b"",
        )
        .unwrap_err();
        assert!(matches!(err, ArchiveError::SymlinkEscape { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_chain_through_earlier_links_is_rejected() {
        let dir = tempdir().unwrap();
        let options = ExtractOptions::default();
        place(dir.path(), &options, "a/", EntryKind::Directory, b"").unwrap();
        place(dir.path(), &options, "a/l", EntryKind::Symlink("..".into()), b"").unwrap();

        let err = place(dir.path(), &options, "s", EntryKind::Symlink("a/l/..".into()), b"").unwrap_err();
        assert!(matches!(err, ArchiveError::SymlinkEscape { .. }));
        assert!(fs::symlink_metadata(dir.path().join("s")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn sibling_symlinks_inside_the_root_are_kept() {
        let dir = tempdir().unwrap();
        let options = ExtractOptions::default();
        place(dir.path(), &options, "lib/tool", EntryKind::File, b"bin").unwrap();
        place(dir.path(), &options, "lib/current", EntryKind::Symlink(".".into()), b"").unwrap();

        let link = place(
            dir.path(),
            &options,
            "bin/tool",
            EntryKind::Symlink("../lib/current/tool".into()),
            b"",
        )
        .unwrap()
        .unwrap();
        assert_eq!(fs::read(link).unwrap(), b"bin");
    }

    #[cfg(unix)]
    #[test]
    fn hard_links_through_symlinks_are_rejected() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("secret"), b"private").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("s")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret"), dir.path().join("f")).unwrap();
        let options = ExtractOptions::default();

        let err = place(dir.path(), &options, "stolen", EntryKind::HardLink("s/secret".into()), b"")
            .unwrap_err();
        assert!(matches!(err, ArchiveError::ZipSlip { .. }));

        let err = place(dir.path(), &options, "copied", EntryKind::HardLink("f".into()), b"").unwrap_err();
        assert!(matches!(err, ArchiveError::ZipSlip { .. }));
        assert!(!dir.path().join("stolen").exists());
        assert!(!dir.path().join("copied").exists());
    }

    #[test]
    fn special_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let options = ExtractOptions::default();
        assert!(place(dir.path(), &options, "dev/null", EntryKind::Other, b"").unwrap().is_none());
        assert!(!dir.path().join("dev").exists());
    }
}
