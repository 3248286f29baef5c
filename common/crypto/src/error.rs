use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced by the common-crypto helpers.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
    #[error("ciphertext missing nonce")]
    MissingNonce,
    #[error("encryption failure")]
    EncryptFailure,
    #[error("decryption failure")]
    DecryptFailure,
    #[error("base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
    #[error("protected payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("time-limited payload missing expiry envelope")]
    MalformedEnvelope,
    #[error("time-limited payload expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },
    #[error("password hashing failure: {0}")]
    HashFailure(String),
}
