//! Persisted catalog store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mcat_catalog::Catalog;

use crate::error::PublishError;

/// Path of the backup copy kept next to `path`
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, ".bak")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Replace `path` with `contents`
///
/// Any existing file is first copied to [`backup_path`]. The new contents go
/// to a sibling temporary file which is then renamed over the target, so a
/// failed write never leaves a partial target behind.
///
/// # Errors
/// Returns `PublishError::Io` naming the file that could not be copied,
/// written or renamed.
pub async fn replace_file(path: &Path, contents: &[u8]) -> Result<(), PublishError> {
    let backup = backup_path(path);
    match tokio::fs::copy(path, &backup).await {
        Ok(_) => tracing::debug!(path = %backup.display(), "Backed up previous file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(PublishError::io_error(backup, e)),
    }

    let staging = with_suffix(path, ".tmp");
    if let Err(e) = tokio::fs::write(&staging, contents).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(PublishError::io_error(staging, e));
    }
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(PublishError::io_error(path, e));
    }
    Ok(())
}

/// YAML catalog file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    /// Create store for a catalog file
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Catalog file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted catalog
    ///
    /// An absent file loads as an empty catalog.
    ///
    /// # Errors
    /// - `PublishError::Io` if the file exists but cannot be read
    /// - `PublishError::Catalog` if its contents are not a valid catalog
    pub async fn load(&self) -> Result<Catalog, PublishError> {
        let document = match tokio::fs::read_to_string(&self.path).await {
            Ok(document) => document,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No catalog yet, starting empty");
                return Ok(Catalog::default());
            }
            Err(e) => return Err(PublishError::io_error(&self.path, e)),
        };

        let catalog = Catalog::from_yaml(&document).map_err(|e| PublishError::catalog(&self.path, e))?;
        tracing::debug!(
            path = %self.path.display(),
            components = catalog.components.len(),
            metrics = catalog.row_count(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Persist the catalog, keeping a backup of the previous file
    ///
    /// # Errors
    /// - `PublishError::Catalog` if the catalog cannot be encoded
    /// - `PublishError::Io` if the backup or the replace fails
    pub async fn store(&self, catalog: &Catalog) -> Result<(), PublishError> {
        let document = catalog.to_yaml().map_err(|e| PublishError::catalog(&self.path, e))?;
        replace_file(&self.path, document.as_bytes()).await?;
        tracing::info!(path = %self.path.display(), metrics = catalog.row_count(), "Stored catalog");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_paths() {
        assert_eq!(backup_path(Path::new("docs/metrics.yaml")), PathBuf::from("docs/metrics.yaml.bak"));
        assert_eq!(with_suffix(Path::new("m.md"), ".tmp"), PathBuf::from("m.md.tmp"));
    }

    #[tokio::test]
    async fn replace_without_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        replace_file(&path, b"first").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
        assert!(!backup_path(&path).exists());
        assert!(!with_suffix(&path, ".tmp").exists());
    }

    #[tokio::test]
    async fn replace_keeps_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        replace_file(&path, b"first").await.unwrap();
        replace_file(&path, b"second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(std::fs::read_to_string(backup_path(&path)).unwrap(), "first");
    }

    #[tokio::test]
    async fn replace_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        let err = replace_file(&path, b"x").await.unwrap_err();
        assert!(matches!(err, PublishError::Io { .. }));
        assert!(!path.exists());
    }
}
