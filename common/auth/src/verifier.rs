use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::JwtSettings;
use crate::error::{AuthError, AuthResult};
use crate::keyring::KeyRing;
use crate::principal::Principal;

/// Validates signed access tokens against a [`KeyRing`].
#[derive(Clone)]
pub struct JwtVerifier {
    settings: JwtSettings,
    ring: KeyRing,
}

impl JwtVerifier {
    pub fn new(settings: JwtSettings, ring: KeyRing) -> Self {
        Self { settings, ring }
    }

    pub fn settings(&self) -> &JwtSettings {
        &self.settings
    }

    pub fn ring(&self) -> &KeyRing {
        &self.ring
    }

    /// Verify signature, issuer, audience and expiry, returning the decoded
    /// principal.
    pub fn verify(&self, token: &str) -> AuthResult<Principal> {
        self.decode_checked(token, true)
    }

    /// Verify signature, issuer and audience but skip the expiry check.
    ///
    /// This exists solely for the refresh flow, to recover the identity of
    /// an expired-but-otherwise-valid access token presented together with
    /// a still-valid refresh token. It must never back normal request
    /// authentication; wire [`JwtVerifier::verify`] there.
    pub fn verify_ignoring_expiry(&self, token: &str) -> AuthResult<Principal> {
        self.decode_checked(token, false)
    }

    fn decode_checked(&self, token: &str, validate_exp: bool) -> AuthResult<Principal> {
        match self.decode_inner(token, validate_exp) {
            Ok(principal) => Ok(principal),
            Err(err) => {
                // Failure kind only; the token itself is never logged.
                warn!(kind = ?err.kind(), "access token rejected");
                Err(err)
            }
        }
    }

    fn decode_inner(&self, token: &str, validate_exp: bool) -> AuthResult<Principal> {
        let header =
            decode_header(token).map_err(|err| AuthError::InvalidHeader(err.to_string()))?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self
            .ring
            .get(&kid)
            .ok_or_else(|| AuthError::UnknownKeyId(kid.clone()))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.settings.issuer.clone()]);
        validation.set_audience(&[self.settings.audience.clone()]);
        validation.leeway = self.settings.leeway_seconds.into();
        validation.validate_exp = validate_exp;

        let token_data = decode::<Value>(token, &key, &validation)?;
        let principal = Principal::from_payload(token_data.claims)?;
        debug!(kid, "verified access token");
        Ok(principal)
    }
}
