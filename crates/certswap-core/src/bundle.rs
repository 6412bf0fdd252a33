//! Synthetic CA bundle assembly.
//!
//! Concatenates user-supplied PEM files byte for byte into
//! `ca-certificates.crt` inside a private temporary directory. The
//! directory lives exactly as long as the [`CaBundle`] value.

use std::fs::{self, OpenOptions, Permissions};
use std::io::Write;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use certswap_common::constants::{BUNDLE_DIR_PREFIX, BUNDLE_FILE_MODE, BUNDLE_FILE_NAME};
use certswap_common::error::{CertswapError, Result};
use certswap_common::types::Handoff;
use tempfile::TempDir;

/// A temporary directory holding the synthetic bundle.
///
/// Dropping the value removes the directory silently; call
/// [`CaBundle::cleanup`] to have a removal failure logged.
#[derive(Debug)]
pub struct CaBundle {
    dir: TempDir,
}

impl CaBundle {
    /// Builds a bundle under the system temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if any CA file cannot be read, or the directory or
    /// bundle file cannot be created.
    pub fn build<P: AsRef<Path>>(ca_files: &[P]) -> Result<Self> {
        Self::build_in(&std::env::temp_dir(), ca_files)
    }

    /// Builds a bundle in a fresh directory under `parent`.
    ///
    /// All CA files are read before anything is created on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if any CA file cannot be read, or the directory or
    /// bundle file cannot be created.
    pub fn build_in<P: AsRef<Path>>(parent: &Path, ca_files: &[P]) -> Result<Self> {
        let contents = concatenate(ca_files)?;

        let dir = tempfile::Builder::new()
            .prefix(BUNDLE_DIR_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| CertswapError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;

        let bundle = Self { dir };
        write_bundle_file(&bundle.file_path(), &contents)?;
        tracing::debug!(
            dir = %bundle.dir().display(),
            files = ca_files.len(),
            bytes = contents.len(),
            "built CA bundle"
        );
        Ok(bundle)
    }

    /// Returns the directory that replaces the system certificate directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the path of the bundle file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.dir.path().join(BUNDLE_FILE_NAME)
    }

    /// Returns the handoff telling the namespaced child where the bundle is.
    #[must_use]
    pub fn handoff(&self) -> Handoff {
        Handoff::new(self.dir.path())
    }

    /// Removes the bundle directory, logging instead of failing.
    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => tracing::debug!(dir = %path.display(), "removed CA bundle"),
            Err(e) => tracing::warn!(
                dir = %path.display(),
                error = %e,
                "failed to cleanup temporary directory"
            ),
        }
    }
}

/// Reads every file in order and returns their concatenated bytes.
///
/// No separators are inserted; an empty list yields an empty buffer.
///
/// # Errors
///
/// Returns an error naming the first file that cannot be read.
pub fn concatenate<P: AsRef<Path>>(ca_files: &[P]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for ca in ca_files {
        let ca = ca.as_ref();
        let bytes = fs::read(ca).map_err(|e| CertswapError::Io {
            path: ca.to_path_buf(),
            source: e,
        })?;
        buf.extend_from_slice(&bytes);
    }
    Ok(buf)
}

fn write_bundle_file(path: &Path, contents: &[u8]) -> Result<()> {
    let io_err = |e| CertswapError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(BUNDLE_FILE_MODE)
        .open(path)
        .map_err(io_err)?;
    file.write_all(contents).map_err(io_err)?;
    // The creation mode is filtered through the umask.
    fs::set_permissions(path, Permissions::from_mode(BUNDLE_FILE_MODE)).map_err(io_err)?;
    Ok(())
}
