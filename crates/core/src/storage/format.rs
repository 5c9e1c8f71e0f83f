use super::encryption::{KdfParams, NONCE_LEN, SALT_LEN};
use crate::errors::CoreError;

/// Magic bytes of a linked-item vault.
pub const MAGIC: &[u8; 4] = b"LNKV";

pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf(12) + salt(16) + nonce(12)
pub const HEADER_LEN: usize = 4 + 2 + 12 + SALT_LEN + NONCE_LEN;

/// Header of a vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultHeader {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
}

impl VaultHeader {
    /// Layout (integers little-endian):
    /// ```text
    /// [LNKV] [version u16] [memory u32] [time u32] [parallelism u32]
    /// [salt 16B] [nonce 12B] [AES-GCM ciphertext + tag ...]
    /// ```
    pub fn encode(&self, ciphertext: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&self.version.to_le_bytes());
        for n in [
            self.kdf_params.memory_cost,
            self.kdf_params.time_cost,
            self.kdf_params.parallelism,
        ] {
            buf.extend_from_slice(&n.to_le_bytes());
        }
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(ciphertext);
        buf
    }

    /// Split vault bytes into header and ciphertext.
    pub fn decode(data: &[u8]) -> Result<(Self, &[u8]), CoreError> {
        if data.len() < HEADER_LEN {
            return Err(CoreError::InvalidFileFormat(format!(
                "vault is {} bytes, header alone needs {HEADER_LEN}",
                data.len()
            )));
        }
        let (header, ciphertext) = data.split_at(HEADER_LEN);

        if &header[0..4] != MAGIC {
            return Err(CoreError::InvalidFileFormat(
                "missing LNKV magic bytes".into(),
            ));
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version == 0 || version > CURRENT_VERSION {
            return Err(CoreError::UnsupportedVersion(version));
        }

        let word = |at: usize| u32::from_le_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]]);
        let kdf_params = KdfParams {
            memory_cost: word(6),
            time_cost: word(10),
            parallelism: word(14),
        };
        kdf_params.check_bounds()?;

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&header[18..18 + SALT_LEN]);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&header[18 + SALT_LEN..HEADER_LEN]);

        if ciphertext.is_empty() {
            return Err(CoreError::InvalidFileFormat("vault has no ciphertext".into()));
        }

        Ok((
            Self {
                version,
                kdf_params,
                salt,
                nonce,
            },
            ciphertext,
        ))
    }
}
