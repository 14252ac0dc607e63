//! AES-256-GCM encryption for upstream API keys at rest
//! (`UpstreamApiConfig.encrypted_api_key`). The key comes from
//! `config.crypto.encryption_key_hex`; ciphertext is stored as
//! `hex(nonce || ciphertext)` so it fits the existing text column.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;

use crate::models::ApiError;

const NONCE_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid encryption key: {0}")]
    InvalidKey(String),
    #[error("encryption failed")]
    EncryptFailed,
    #[error("decryption failed")]
    DecryptFailed,
    #[error("malformed ciphertext")]
    MalformedCiphertext,
}

impl From<CryptoError> for ApiError {
    fn from(err: CryptoError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Encrypts and decrypts upstream provider API keys with a single
/// process-wide key. Key rotation is out of scope — rotating
/// `encryption_key_hex` invalidates every previously stored key.
pub struct ApiKeyCipher {
    cipher: Aes256Gcm,
}

impl ApiKeyCipher {
    pub fn new(encryption_key_hex: &str) -> Result<Self, CryptoError> {
        let key_bytes = hex::decode(encryption_key_hex).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        if key_bytes.len() != 32 {
            return Err(CryptoError::InvalidKey("key must decode to 32 bytes".to_string()));
        }
        let cipher = Aes256Gcm::new_from_slice(&key_bytes).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { cipher })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::EncryptFailed)?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(hex::encode(out))
    }

    pub fn decrypt(&self, encrypted_hex: &str) -> Result<String, CryptoError> {
        let raw = hex::decode(encrypted_hex).map_err(|_| CryptoError::MalformedCiphertext)?;
        if raw.len() <= NONCE_LEN {
            return Err(CryptoError::MalformedCiphertext);
        }
        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::DecryptFailed)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptFailed)
    }
}
