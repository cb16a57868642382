//! Directory-backed named-entry store.
//!
//! Keys are relative paths below a root directory. Registry-style keys such as
//! `gov:datamapper/in.json` can be routed to subdirectories by prefix.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument};

use mapcache_core::error::{MapCacheError, Result};
use mapcache_core::traits::EntryStore;

/// Entry store reading documents from a directory tree.
#[derive(Clone, Debug)]
pub struct FileEntryStore {
    /// Root all keys resolve under
    root: PathBuf,
    /// Key prefix → subdirectory of `root`
    prefixes: Vec<(String, PathBuf)>,
}

impl FileEntryStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            prefixes: Vec::new(),
        }
    }

    /// Routes keys starting with `prefix` to `subdir` below the root.
    pub fn with_prefix(mut self, prefix: impl Into<String>, subdir: impl AsRef<Path>) -> Self {
        self.prefixes.push((prefix.into(), subdir.as_ref().to_path_buf()));
        self
    }

    /// Maps a key to a path below the root, rejecting keys that escape it.
    pub fn resolve_path(&self, key: &str) -> Result<PathBuf> {
        let (base, relative) = self
            .prefixes
            .iter()
            .find_map(|(prefix, subdir)| {
                key.strip_prefix(prefix.as_str())
                    .map(|rest| (self.root.join(subdir), rest))
            })
            .unwrap_or_else(|| (self.root.clone(), key));

        let relative = Path::new(relative.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return Err(MapCacheError::ValidationError(format!("empty entry key '{}'", key)));
        }
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(MapCacheError::ValidationError(format!(
                "entry key '{}' escapes the store root",
                key
            )));
        }

        Ok(base.join(relative))
    }
}

impl EntryStore for FileEntryStore {
    #[instrument(skip(self))]
    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve_path(key)?;
        match std::fs::read(&path) {
            Ok(content) => {
                debug!(path = %path.display(), bytes = content.len(), "Read entry");
                Ok(content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(MapCacheError::EntryNotFound(key.to_string()))
            }
            Err(e) => Err(MapCacheError::EntryUnreadable {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, FileEntryStore) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        let store = FileEntryStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_fetch_relative_key() {
        let (_dir, store) = store_with(&[("datamapper/in.json", "{}")]);
        assert_eq!(store.fetch("datamapper/in.json").unwrap(), b"{}");
        assert_eq!(store.fetch("/datamapper/in.json").unwrap(), b"{}");
    }

    #[test]
    fn test_fetch_missing() {
        let (_dir, store) = store_with(&[]);
        let err = store.fetch("absent.json").unwrap_err();
        assert_eq!(err.failed_key(), Some("absent.json"));
    }

    #[test]
    fn test_directory_is_unreadable() {
        let (_dir, store) = store_with(&[("nested/file.json", "{}")]);
        let err = store.fetch("nested").unwrap_err();
        assert!(matches!(err, MapCacheError::EntryUnreadable { ref key, .. } if key == "nested"));
    }

    #[test]
    fn test_prefix_routing() {
        let (_dir, store) = store_with(&[("governance/mapping.dmc", "map"), ("config/mapping.dmc", "conf")]);
        let store = store
            .with_prefix("gov:", "governance")
            .with_prefix("conf:", "config");
        assert_eq!(store.fetch("gov:mapping.dmc").unwrap(), b"map");
        assert_eq!(store.fetch("conf:/mapping.dmc").unwrap(), b"conf");
    }

    #[test_case("../secret" ; "parent dir")]
    #[test_case("a/../../secret" ; "nested parent dir")]
    #[test_case("" ; "empty key")]
    #[test_case("/" ; "root only")]
    fn test_rejects_bad_keys(key: &str) {
        let (_dir, store) = store_with(&[]);
        let err = store.fetch(key).unwrap_err();
        assert!(matches!(err, MapCacheError::ValidationError(_)));
    }
}
