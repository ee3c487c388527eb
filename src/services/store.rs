use crate::error::{DspError, Result};
use crate::types::BlobKey;
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Whole-object blob storage: full read, full overwrite, nothing else.
pub trait BlobStore: Send + Sync {
    fn name(&self) -> &'static str;
    /// `Ok(None)` when the object does not exist.
    fn get(&self, key: &BlobKey) -> Result<Option<Vec<u8>>>;
    fn put(&self, key: &BlobKey, bytes: &[u8], content_type: &str) -> Result<()>;
}

/// Blobs as files: `<root>/<container>/<name>`.
pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    /// Store rooted in the platform data directory.
    pub fn new() -> Result<Self> {
        Self::at(Self::default_root()?)
    }

    pub fn at(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| DspError::storage_error("initialization", format!("{}: {e}", root.display())))?;
        Ok(Self { root })
    }

    pub fn default_root() -> Result<PathBuf> {
        let proj = ProjectDirs::from("uk", "dsp", "dsp-numbers").ok_or_else(|| {
            DspError::storage_error("initialization", "could not resolve data dir")
        })?;
        Ok(proj.data_local_dir().join("blobs"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &BlobKey) -> Result<PathBuf> {
        for part in [&key.container, &key.name] {
            if part.is_empty() || part.contains(['/', '\\']) || part == ".." {
                return Err(DspError::storage_error(
                    "resolve",
                    format!("invalid blob key {key}"),
                ));
            }
        }
        Ok(self.root.join(&key.container).join(&key.name))
    }
}

impl BlobStore for LocalFsStore {
    fn name(&self) -> &'static str {
        "local-fs"
    }

    fn get(&self, key: &BlobKey) -> Result<Option<Vec<u8>>> {
        let p = self.path_for(key)?;
        if !p.exists() {
            return Ok(None);
        }
        fs::read(&p)
            .map(Some)
            .map_err(|e| DspError::storage_error("read", format!("{key}: {e}")))
    }

    fn put(&self, key: &BlobKey, bytes: &[u8], _content_type: &str) -> Result<()> {
        let p = self.path_for(key)?;
        if let Some(dir) = p.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| DspError::storage_error("write", format!("{key}: {e}")))?;
        }
        // Readers only ever see the old or the new object, never a partial one.
        let tmp = p.with_file_name(format!(".{}.tmp", key.name));
        fs::write(&tmp, bytes)
            .and_then(|_| fs::rename(&tmp, &p))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp);
                DspError::storage_error("write", format!("{key}: {e}"))
            })
    }
}

/// In-process store; content types are kept so callers can inspect them.
#[derive(Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<BlobKey, (String, Vec<u8>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type(&self, key: &BlobKey) -> Option<String> {
        self.blobs
            .lock()
            .ok()
            .and_then(|m| m.get(key).map(|(ct, _)| ct.clone()))
    }
}

impl BlobStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &BlobKey) -> Result<Option<Vec<u8>>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| DspError::storage_error("read", "memory store poisoned"))?;
        Ok(blobs.get(key).map(|(_, bytes)| bytes.clone()))
    }

    fn put(&self, key: &BlobKey, bytes: &[u8], content_type: &str) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| DspError::storage_error("write", "memory store poisoned"))?;
        blobs.insert(key.clone(), (content_type.to_string(), bytes.to_vec()));
        Ok(())
    }
}
