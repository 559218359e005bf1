//! Durable key-value stores the saved design is mirrored into.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot open store at {}: {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("i/o error on key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid store key `{0}` (allowed: A-Z a-z 0-9 _ -)")]
    InvalidKey(String),
}

/// A string-to-string store with one record per key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

// ─── In-memory ───────────────────────────────────────────────────────────

/// `HashMap`-backed store. Useful for tests and for hosts that persist the
/// records themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.records.remove(key);
        Ok(())
    }
}

// ─── On disk ─────────────────────────────────────────────────────────────

/// One `<key>.json` file per key under a root directory.
///
/// Writes go to a temporary sibling first and are moved into place with a
/// rename, so a reader never observes a half-written record.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Root {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            drop(file);
            fs::rename(&tmp, &path)
        };

        if let Err(source) = write() {
            // Never leave a partial record behind.
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io {
                key: key.to_string(),
                source,
            });
        }
        log::trace!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wp-store-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let mut store = FileStore::open(&dir).unwrap();
        assert_eq!(store.get("savedDesign").unwrap(), None);

        store.set("savedDesign", "[1]").unwrap();
        store.set("savedDesign", "[1,2]").unwrap();
        assert_eq!(store.get("savedDesign").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.join("savedDesign.json").is_file());
        assert!(!dir.join("savedDesign.json.tmp").exists());

        store.remove("savedDesign").unwrap();
        store.remove("savedDesign").unwrap();
        assert_eq!(store.get("savedDesign").unwrap(), None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = scratch_dir("keys");
        let mut store = FileStore::open(&dir).unwrap();
        for key in ["", "../escape", "a/b", "with space"] {
            assert!(matches!(
                store.set(key, "x"),
                Err(StoreError::InvalidKey(_))
            ));
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let dir = scratch_dir("failed-write");
        let mut store = FileStore::open(&dir).unwrap();
        // A non-empty directory where the record belongs makes the rename fail.
        fs::create_dir_all(dir.join("savedDesign.json").join("occupied")).unwrap();

        assert!(matches!(
            store.set("savedDesign", "[]"),
            Err(StoreError::Io { ref key, .. }) if key == "savedDesign"
        ));
        assert!(!dir.join("savedDesign.json.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn open_reports_the_root_path() {
        let dir = scratch_dir("root-is-file");
        fs::create_dir_all(&dir).unwrap();
        let root = dir.join("not-a-dir");
        fs::write(&root, "x").unwrap();

        let err = FileStore::open(&root).unwrap_err();
        assert!(matches!(err, StoreError::Root { ref path, .. } if *path == root));
        assert!(err.to_string().contains("not-a-dir"), "{err}");

        let _ = fs::remove_dir_all(&dir);
    }
}
