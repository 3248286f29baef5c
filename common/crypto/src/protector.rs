use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::CryptoError;

pub const KEY_LENGTH: usize = 32;
const NONCE_LENGTH: usize = 12;

/// Wrapper around the process-wide secret used to key data protection.
#[derive(Clone)]
pub struct ProtectionKey(Zeroizing<[u8; KEY_LENGTH]>);

impl ProtectionKey {
    /// Construct a key from a base64-encoded string.
    pub fn from_base64(value: &str) -> Result<Self, CryptoError> {
        let decoded = BASE64_STANDARD.decode(value.trim())?;
        Self::from_bytes(decoded)
    }

    /// Construct a key from raw bytes.
    pub fn from_bytes<B>(bytes: B) -> Result<Self, CryptoError>
    where
        B: AsRef<[u8]>,
    {
        let slice = bytes.as_ref();
        if slice.len() != KEY_LENGTH {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_LENGTH,
                actual: slice.len(),
            });
        }
        let mut array = [0u8; KEY_LENGTH];
        array.copy_from_slice(slice);
        Ok(Self(Zeroizing::new(array)))
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Self(Zeroizing::new(bytes))
    }

    /// Derive an isolated subkey bound to a purpose tag.
    fn derive(&self, purpose: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&*self.0);
        hasher.update(b"storelink-protect");
        hasher.update(purpose.as_bytes());
        let digest = hasher.finalize();
        let mut out = [0u8; KEY_LENGTH];
        out.copy_from_slice(&digest);
        Self(Zeroizing::new(out))
    }
}

impl std::fmt::Debug for ProtectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtectionKey")
            .field("bytes", &"***redacted***")
            .finish()
    }
}

/// Authenticated reversible protection of opaque strings (AES-256-GCM).
///
/// `unprotect(protect(x)) == x`; any tampering with the ciphertext fails
/// with [`CryptoError::DecryptFailure`], never yielding wrong plaintext.
#[derive(Clone)]
pub struct DataProtector {
    key: ProtectionKey,
}

impl DataProtector {
    pub fn new(key: ProtectionKey) -> Self {
        Self { key }
    }

    /// Protector keyed by a subkey bound to `purpose`. Payloads protected
    /// under one purpose cannot be unprotected under another.
    pub fn for_purpose(&self, purpose: &str) -> Self {
        Self {
            key: self.key.derive(purpose),
        }
    }

    pub fn protect(&self, plaintext: &str) -> Result<String, CryptoError> {
        let sealed = self.protect_bytes(plaintext.as_bytes())?;
        Ok(BASE64_STANDARD.encode(sealed))
    }

    pub fn unprotect(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let decoded = BASE64_STANDARD.decode(ciphertext.trim())?;
        let plaintext = self.unprotect_bytes(&decoded)?;
        Ok(String::from_utf8(plaintext)?)
    }

    pub(crate) fn protect_bytes(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let cipher = Aes256Gcm::new_from_slice(&*self.key.0).map_err(|_| {
            CryptoError::InvalidKeyLength {
                expected: KEY_LENGTH,
                actual: self.key.0.len(),
            }
        })?;
        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);
        let mut ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptoError::EncryptFailure)?;
        let mut output = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        output.extend_from_slice(&nonce_bytes);
        output.append(&mut ciphertext);
        Ok(output)
    }

    pub(crate) fn unprotect_bytes(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() <= NONCE_LENGTH {
            return Err(CryptoError::MissingNonce);
        }
        let (nonce_bytes, encrypted) = ciphertext.split_at(NONCE_LENGTH);
        let cipher = Aes256Gcm::new_from_slice(&*self.key.0).map_err(|_| {
            CryptoError::InvalidKeyLength {
                expected: KEY_LENGTH,
                actual: self.key.0.len(),
            }
        })?;
        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), encrypted)
            .map_err(|_| CryptoError::DecryptFailure)
    }
}
