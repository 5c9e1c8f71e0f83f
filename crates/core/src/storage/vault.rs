use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;
use uuid::Uuid;

use super::encryption::{self, KdfParams};
use super::format::{VaultHeader, CURRENT_VERSION};
use super::store::{take, upsert, LinkedItemStore};
use crate::errors::CoreError;
use crate::models::linked_item::LinkedItem;

/// Encrypt a list of linked items into vault bytes.
///
/// Flow: items → bincode → AES-256-GCM(Argon2id(password)) → LNKV bytes.
/// Salt and nonce are fresh on every call.
pub fn seal_items(
    items: &[LinkedItem],
    password: &str,
    kdf_params: KdfParams,
) -> Result<Vec<u8>, CoreError> {
    let plaintext = bincode::serialize(items)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize linked items: {e}")))?;

    let header = VaultHeader {
        version: CURRENT_VERSION,
        kdf_params,
        salt: encryption::random_bytes()?,
        nonce: encryption::random_bytes()?,
    };
    let key = encryption::derive_key(password, &header.salt, &header.kdf_params)?;
    let ciphertext = encryption::seal(&plaintext, &key, &header.nonce)?;

    Ok(header.encode(&ciphertext))
}

/// Decrypt vault bytes back into linked items.
pub fn open_items(data: &[u8], password: &str) -> Result<Vec<LinkedItem>, CoreError> {
    let (header, ciphertext) = VaultHeader::decode(data)?;
    let key = encryption::derive_key(password, &header.salt, &header.kdf_params)?;
    let plaintext = encryption::open(ciphertext, &key, &header.nonce)?;

    bincode::deserialize(&plaintext)
        .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize linked items: {e}")))
}

/// Linked-item store backed by an encrypted file.
///
/// Access tokens are credentials, so the whole list is encrypted at rest.
/// A missing file lists as empty; every write rewrites the whole vault.
pub struct VaultItemStore {
    path: PathBuf,
    password: String,
    kdf_params: KdfParams,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for VaultItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultItemStore")
            .field("path", &self.path)
            .field("kdf_params", &self.kdf_params)
            .finish_non_exhaustive()
    }
}

impl VaultItemStore {
    pub fn new(path: impl Into<PathBuf>, password: impl Into<String>) -> Self {
        Self::with_kdf_params(path, password, KdfParams::default())
    }

    pub fn with_kdf_params(
        path: impl Into<PathBuf>,
        password: impl Into<String>,
        kdf_params: KdfParams,
    ) -> Self {
        Self {
            path: path.into(),
            password: password.into(),
            kdf_params,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<LinkedItem>, CoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = std::fs::read(&self.path)?;
        open_items(&bytes, &self.password)
    }

    fn save(&self, items: &[LinkedItem]) -> Result<(), CoreError> {
        let bytes = seal_items(items, &self.password, self.kdf_params)?;
        std::fs::write(&self.path, bytes)?;
        info!(items = items.len(), path = %self.path.display(), "vault written");
        Ok(())
    }
}

impl LinkedItemStore for VaultItemStore {
    fn list(&self) -> Result<Vec<LinkedItem>, CoreError> {
        self.load()
    }

    fn add(&self, item: LinkedItem) -> Result<(), CoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut items = self.load()?;
        upsert(&mut items, item);
        self.save(&items)
    }

    fn remove(&self, id: Uuid) -> Result<LinkedItem, CoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut items = self.load()?;
        let removed = take(&mut items, id)?;
        self.save(&items)?;
        Ok(removed)
    }
}
