//! Filesystem-backed store.
//!
//! Each entry is a single file named after the composite key's hex form, so
//! entries survive the process and can be shared by any backend instance
//! pointed at the same directory. Concurrent writers of the same key are
//! last-write-wins, which matches the unconditional-upsert contract.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use memoscope_core::{Backend, BackendError, CacheKey};

/// File extension for stored entries.
const ENTRY_EXT: &str = "entry";

/// A persistent backend storing one file per entry.
#[derive(Debug)]
pub struct FsBackend {
    dir: PathBuf,
}

impl FsBackend {
    /// Open a backend rooted at `dir`, creating the directory tree if needed.
    ///
    /// Fails if the path exists and is not a directory, or if creation fails.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let dir = dir.into();
        if dir.exists() {
            if !dir.is_dir() {
                return Err(BackendError::Unavailable {
                    reason: format!(
                        "cache path exists and is not a directory: {}",
                        dir.display()
                    ),
                });
            }
        } else {
            fs::create_dir_all(&dir).map_err(|e| io_error(&dir, &e))?;
        }
        Ok(Self { dir })
    }

    /// The directory entries are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.{}", key, ENTRY_EXT))
    }
}

fn io_error(path: &Path, e: &std::io::Error) -> BackendError {
    BackendError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

impl Backend for FsBackend {
    fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, BackendError> {
        let path = self.entry_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, &e)),
        }
    }

    fn set(&self, key: &CacheKey, value: &[u8]) -> Result<(), BackendError> {
        let path = self.entry_path(key);
        fs::write(&path, value).map_err(|e| io_error(&path, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoscope_core::ArgKey;

    fn key(name: &str) -> CacheKey {
        CacheKey::derive(name, &ArgKey::from_bytes(*b"args"))
    }

    #[test]
    fn test_creates_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("cache");
        let backend = FsBackend::new(&dir).unwrap();
        assert!(backend.dir().is_dir());
    }

    #[test]
    fn test_rejects_non_directory_path() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("occupied");
        fs::write(&file, b"not a directory").unwrap();

        let err = FsBackend::new(&file).unwrap_err();
        assert!(matches!(err, BackendError::Unavailable { .. }));
    }

    #[test]
    fn test_miss_is_not_an_error() {
        let root = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(root.path()).unwrap();
        assert_eq!(backend.get(&key("absent")).unwrap(), None);
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let root = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(root.path()).unwrap();
        backend.set(&key("op"), b"16").unwrap();
        assert_eq!(backend.get(&key("op")).unwrap(), Some(b"16".to_vec()));
    }

    #[test]
    fn test_set_overwrites() {
        let root = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(root.path()).unwrap();
        backend.set(&key("op"), b"old").unwrap();
        backend.set(&key("op"), b"new").unwrap();
        assert_eq!(backend.get(&key("op")).unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn test_entries_survive_backend_instances() {
        let root = tempfile::tempdir().unwrap();
        {
            let backend = FsBackend::new(root.path()).unwrap();
            backend.set(&key("op"), b"16").unwrap();
        }
        let reopened = FsBackend::new(root.path()).unwrap();
        assert_eq!(reopened.get(&key("op")).unwrap(), Some(b"16".to_vec()));
    }
}
