use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use thiserror::Error;
use uuid::Uuid;

use crate::Locator;

#[derive(Debug, Error)]
pub enum AttachmentError {
    /// The locator does not dereference to a stored blob.
    #[error("attachment not found")]
    NotFound,

    /// The locator is not one this store could have issued.
    #[error("invalid locator: {0}")]
    InvalidLocator(String),

    #[error("attachment storage io failure")]
    Io(#[from] std::io::Error),
}

/// Proof blob storage.
///
/// `put` must complete before any bill record references the returned
/// locator. Overwrite is never implicit: every `put` gets a fresh key.
pub trait AttachmentStore: Send + Sync {
    /// Store `bytes` under a fresh key and return its locator.
    ///
    /// The key is independent of the content and of `original_name`, except
    /// that the file extension is preserved for content-type sniffing later.
    fn put(&self, bytes: &[u8], original_name: &str) -> Result<Locator, AttachmentError>;

    /// Fetch the blob behind `locator`.
    fn get(&self, locator: &Locator) -> Result<Vec<u8>, AttachmentError>;
}

impl<S> AttachmentStore for std::sync::Arc<S>
where
    S: AttachmentStore + ?Sized,
{
    fn put(&self, bytes: &[u8], original_name: &str) -> Result<Locator, AttachmentError> {
        (**self).put(bytes, original_name)
    }

    fn get(&self, locator: &Locator) -> Result<Vec<u8>, AttachmentError> {
        (**self).get(locator)
    }
}

/// Fresh collision-resistant key, keeping only the original extension.
fn fresh_key(original_name: &str) -> String {
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 16 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", Uuid::now_v7(), ext.to_ascii_lowercase()),
        None => Uuid::now_v7().to_string(),
    }
}

/// In-memory store for dev/tests.
#[derive(Debug, Default)]
pub struct InMemoryAttachmentStore {
    inner: RwLock<HashMap<Locator, Vec<u8>>>,
}

impl InMemoryAttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttachmentStore for InMemoryAttachmentStore {
    fn put(&self, bytes: &[u8], original_name: &str) -> Result<Locator, AttachmentError> {
        let locator = Locator::new(fresh_key(original_name));
        self.inner
            .write()
            .map_err(|_| AttachmentError::NotFound)?
            .insert(locator.clone(), bytes.to_vec());
        Ok(locator)
    }

    fn get(&self, locator: &Locator) -> Result<Vec<u8>, AttachmentError> {
        self.inner
            .read()
            .map_err(|_| AttachmentError::NotFound)?
            .get(locator)
            .cloned()
            .ok_or(AttachmentError::NotFound)
    }
}

/// Local-disk store: one file per blob under a fixed root directory.
#[derive(Debug)]
pub struct LocalDiskAttachmentStore {
    root: PathBuf,
}

impl LocalDiskAttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AttachmentError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Locators are uuid keys issued by `put`; anything with path separators
    /// or dot-dot segments cannot be ours and must not touch the filesystem.
    fn path_for(&self, locator: &Locator) -> Result<PathBuf, AttachmentError> {
        let key = locator.as_str();
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
        if !valid || key.contains("..") {
            return Err(AttachmentError::InvalidLocator(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

impl AttachmentStore for LocalDiskAttachmentStore {
    fn put(&self, bytes: &[u8], original_name: &str) -> Result<Locator, AttachmentError> {
        let locator = Locator::new(fresh_key(original_name));
        let path = self.path_for(&locator)?;
        std::fs::write(&path, bytes)?;
        tracing::debug!(locator = %locator, size = bytes.len(), "stored attachment");
        Ok(locator)
    }

    fn get(&self, locator: &Locator) -> Result<Vec<u8>, AttachmentError> {
        let path = self.path_for(locator)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AttachmentError::NotFound),
            Err(e) => Err(AttachmentError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_round_trip_is_byte_identical() {
        let store = InMemoryAttachmentStore::new();
        let bytes = b"%PDF-1.4 fake receipt";

        let locator = store.put(bytes, "receipt.pdf").unwrap();
        assert_eq!(store.get(&locator).unwrap(), bytes.to_vec());
    }

    #[test]
    fn key_preserves_extension_only() {
        let store = InMemoryAttachmentStore::new();
        let locator = store.put(b"x", "Facture Janvier.PDF").unwrap();

        assert!(locator.as_str().ends_with(".pdf"));
        assert!(!locator.as_str().contains("Facture"));
    }

    #[test]
    fn nameless_upload_gets_bare_key() {
        let store = InMemoryAttachmentStore::new();
        let locator = store.put(b"x", "receipt").unwrap();
        assert!(!locator.as_str().contains('.'));
    }

    #[test]
    fn repeated_put_never_overwrites() {
        let store = InMemoryAttachmentStore::new();
        let first = store.put(b"one", "a.png").unwrap();
        let second = store.put(b"two", "a.png").unwrap();

        assert_ne!(first, second);
        assert_eq!(store.get(&first).unwrap(), b"one".to_vec());
        assert_eq!(store.get(&second).unwrap(), b"two".to_vec());
    }

    #[test]
    fn unknown_locator_is_not_found() {
        let store = InMemoryAttachmentStore::new();
        let err = store.get(&Locator::new("missing")).unwrap_err();
        assert!(matches!(err, AttachmentError::NotFound));
    }

    #[test]
    fn disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDiskAttachmentStore::new(dir.path()).unwrap();

        let bytes = b"\x89PNG\r\n receipt";
        let locator = store.put(bytes, "proof.png").unwrap();
        assert_eq!(store.get(&locator).unwrap(), bytes.to_vec());
    }

    #[test]
    fn disk_rejects_traversal_locators() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDiskAttachmentStore::new(dir.path()).unwrap();

        for key in ["../etc/passwd", "a/b", ""] {
            let err = store.get(&Locator::new(key)).unwrap_err();
            assert!(matches!(err, AttachmentError::InvalidLocator(_)), "{key}");
        }
    }
}
