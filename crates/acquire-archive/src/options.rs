use crate::format::ArchiveFormat;

/// Configuration for an extraction.
///
/// # Examples
///
/// ```
/// use acquire_archive::{ArchiveFormat, ExtractOptions};
///
/// let options = ExtractOptions::default()
///     .format(ArchiveFormat::Zip)
///     .strip_components(1)
///     .overwrite(false);
/// assert_eq!(options.strip_components, 1);
/// ```
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    /// Container format. `Auto` sniffs the file's magic bytes.
    ///
    /// Default: [`ArchiveFormat::Auto`]
    pub format: ArchiveFormat,

    /// Leading path components removed from every entry. Entries with no
    /// components left are skipped.
    ///
    /// Default: 0
    pub strip_components: usize,

    /// Replace files that already exist in the destination.
    ///
    /// Default: true
    pub overwrite: bool,

    /// Apply the permission bits recorded in the archive (unix only).
    ///
    /// Default: true
    pub preserve_permissions: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            format: ArchiveFormat::Auto,
            strip_components: 0,
            overwrite: true,
            preserve_permissions: true,
        }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn format(mut self, format: ArchiveFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn strip_components(mut self, n: usize) -> Self {
        self.strip_components = n;
        self
    }

    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }
}
