use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use common_crypto::{CryptoError, TimeLimitedProtector};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand_core::{OsRng, RngCore};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::error::{AuthError, AuthResult};
use crate::keyring::KeyRing;
use crate::verifier::JwtVerifier;

/// Kid assigned to the key taken from [`JwtSettings`] at construction.
pub const DEFAULT_KID: &str = "primary";

/// Identity attributes stamped into an access token.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub username: String,
    pub tenant_id: Uuid,
    pub application_id: Uuid,
    pub roles: Vec<String>,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
    pub token_type: &'static str,
}

/// Issues signed access tokens and opaque refresh tokens.
///
/// Stateless apart from immutable settings and the shared [`KeyRing`]; safe
/// to share across concurrently handled requests.
pub struct TokenSigner {
    settings: JwtSettings,
    ring: KeyRing,
    active_kid: String,
    encoding_key: EncodingKey,
}

impl TokenSigner {
    pub fn new(settings: JwtSettings) -> Self {
        let ring = KeyRing::new();
        ring.install(DEFAULT_KID, settings.security_key.as_bytes());
        let encoding_key = EncodingKey::from_secret(settings.security_key.as_bytes());
        Self {
            settings,
            ring,
            active_kid: DEFAULT_KID.to_string(),
            encoding_key,
        }
    }

    pub fn settings(&self) -> &JwtSettings {
        &self.settings
    }

    pub fn ring(&self) -> &KeyRing {
        &self.ring
    }

    pub fn active_kid(&self) -> &str {
        &self.active_kid
    }

    /// A verifier sharing this signer's key ring and settings.
    pub fn verifier(&self) -> JwtVerifier {
        JwtVerifier::new(self.settings.clone(), self.ring.clone())
    }

    /// Start signing under a new key. Tokens signed under previous kids keep
    /// verifying until [`KeyRing::retire`] is called for them.
    pub fn rotate(&mut self, kid: impl Into<String>, secret: &str) {
        let kid = kid.into();
        self.ring.install(kid.clone(), secret.as_bytes());
        self.encoding_key = EncodingKey::from_secret(secret.as_bytes());
        self.active_kid = kid;
    }

    /// Mint a signed access token for `subject`, expiring after the
    /// configured lifetime. The signature covers the full claim set.
    pub fn issue_access_token(&self, subject: &TokenSubject) -> AuthResult<IssuedAccessToken> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.settings.expiration_minutes);

        let claims = AccessClaims {
            sub: subject.user_id.to_string(),
            uname: &subject.username,
            tid: subject.tenant_id.to_string(),
            app: subject.application_id.to_string(),
            roles: &subject.roles,
            active: subject.active,
            iss: &self.settings.issuer,
            aud: &self.settings.audience,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(self.active_kid.clone());

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))?;

        Ok(IssuedAccessToken {
            token,
            expires_at,
            expires_in: expires_at.signed_duration_since(now).num_seconds(),
            token_type: "Bearer",
        })
    }
}

/// Opaque proof of prior authentication. Carries no claims; the persistence
/// collaborator maps its fingerprint to a user/session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    value: String,
}

impl RefreshToken {
    /// Generate a fresh token: uuid plus 256 bits from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let random = URL_SAFE_NO_PAD.encode(bytes);
        Self {
            value: format!("{}.{}", Uuid::new_v4(), random),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// SHA-256 digest for server-side storage; the raw value is never
    /// persisted.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.value.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }

    /// Wrap the token in time-limited protection so it stops being
    /// redeemable past `lifetime` even if persistence-layer revocation lags.
    pub fn seal(
        &self,
        protector: &TimeLimitedProtector,
        lifetime: Duration,
    ) -> Result<String, CryptoError> {
        protector.protect(&self.value, lifetime)
    }

    /// Recover a token from its sealed form; fails once the wrapper expired.
    pub fn open(protector: &TimeLimitedProtector, sealed: &str) -> Result<Self, CryptoError> {
        let value = protector.unprotect(sealed)?;
        Ok(Self { value })
    }
}

#[derive(Serialize)]
struct AccessClaims<'a> {
    sub: String,
    uname: &'a str,
    tid: String,
    app: String,
    roles: &'a [String],
    active: bool,
    iss: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
    jti: String,
}
