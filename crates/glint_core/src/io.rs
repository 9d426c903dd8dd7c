//! Where the loader reads manifests and sidecar files from.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{GltfError, GltfResult};

/// Byte source for the manifest and everything it references.
///
/// Paths handed to an `AssetIo` are already resolved against the
/// manifest's directory.
pub trait AssetIo: Send + Sync {
    /// Read the whole file at `path`.
    fn load_bytes(&self, path: &Path) -> GltfResult<Vec<u8>>;

    /// Read the whole file at `path` as UTF-8 text.
    fn load_text(&self, path: &Path) -> GltfResult<String> {
        let bytes = self.load_bytes(path)?;
        String::from_utf8(bytes).map_err(|e| GltfError::Io {
            path: path.to_path_buf(),
            cause: io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }
}

/// Reads from the local file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsIo;

impl AssetIo for FsIo {
    fn load_bytes(&self, path: &Path) -> GltfResult<Vec<u8>> {
        std::fs::read(path).map_err(|cause| GltfError::Io {
            path: path.to_path_buf(),
            cause,
        })
    }
}

/// In-memory files keyed by path.
#[derive(Clone, Debug, Default)]
pub struct MemoryIo {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_file(mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetIo for MemoryIo {
    fn load_bytes(&self, path: &Path) -> GltfResult<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| GltfError::Io {
            path: path.to_path_buf(),
            cause: io::Error::new(io::ErrorKind::NotFound, "no such in-memory file"),
        })
    }
}
