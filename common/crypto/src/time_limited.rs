use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::CryptoError;
use crate::protector::DataProtector;

const EXPIRY_LENGTH: usize = 8;

/// Reversible protection with an enforced expiry window.
///
/// The absolute expiry is fixed inside the envelope at protect time, so a
/// payload unprotected after its window always fails with
/// [`CryptoError::Expired`] regardless of what lifetime the caller expected.
/// This backs short-lived email-confirmation and password-reset links, and
/// bounds refresh-token validity independent of revocation lag.
#[derive(Clone)]
pub struct TimeLimitedProtector {
    inner: DataProtector,
}

impl TimeLimitedProtector {
    pub fn new(inner: DataProtector) -> Self {
        Self { inner }
    }

    pub fn protect(&self, plaintext: &str, lifetime: Duration) -> Result<String, CryptoError> {
        self.protect_at(plaintext, lifetime, Utc::now())
    }

    pub fn unprotect(&self, ciphertext: &str) -> Result<String, CryptoError> {
        self.unprotect_at(ciphertext, Utc::now())
    }

    pub(crate) fn protect_at(
        &self,
        plaintext: &str,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, CryptoError> {
        let expiry = now + lifetime;
        let mut envelope = Vec::with_capacity(EXPIRY_LENGTH + plaintext.len());
        envelope.extend_from_slice(&expiry.timestamp_millis().to_be_bytes());
        envelope.extend_from_slice(plaintext.as_bytes());
        let sealed = self.inner.protect_bytes(&envelope)?;
        Ok(BASE64_STANDARD.encode(sealed))
    }

    pub(crate) fn unprotect_at(
        &self,
        ciphertext: &str,
        now: DateTime<Utc>,
    ) -> Result<String, CryptoError> {
        let decoded = BASE64_STANDARD.decode(ciphertext.trim())?;
        let envelope = self.inner.unprotect_bytes(&decoded)?;
        if envelope.len() < EXPIRY_LENGTH {
            return Err(CryptoError::MalformedEnvelope);
        }
        let (header, plaintext) = envelope.split_at(EXPIRY_LENGTH);
        let mut millis = [0u8; EXPIRY_LENGTH];
        millis.copy_from_slice(header);
        let expired_at = Utc
            .timestamp_millis_opt(i64::from_be_bytes(millis))
            .single()
            .ok_or(CryptoError::MalformedEnvelope)?;
        if now > expired_at {
            return Err(CryptoError::Expired { expired_at });
        }
        Ok(String::from_utf8(plaintext.to_vec())?)
    }
}
