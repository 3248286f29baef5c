use std::env;

use crate::error::{AuthError, AuthResult};

const ENV_SECRET: &str = "STORELINK_JWT_SECRET";
const ENV_ISSUER: &str = "STORELINK_JWT_ISSUER";
const ENV_AUDIENCE: &str = "STORELINK_JWT_AUDIENCE";
const ENV_TTL_MINUTES: &str = "STORELINK_JWT_ACCESS_TTL_MINUTES";
const ENV_LEEWAY_SECONDS: &str = "STORELINK_JWT_LEEWAY_SECONDS";

/// Process-wide token configuration. Built once at startup and shared
/// read-only by every request.
#[derive(Clone)]
pub struct JwtSettings {
    /// Symmetric signing key material.
    pub security_key: String,
    /// Issuer claim (iss) stamped on issued tokens and required on verify.
    pub issuer: String,
    /// Audience claim (aud) stamped on issued tokens and required on verify.
    pub audience: String,
    /// Access-token lifetime.
    pub expiration_minutes: i64,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u32,
}

impl JwtSettings {
    /// Construct settings with sensible defaults (30 second leeway).
    pub fn new(
        security_key: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expiration_minutes: i64,
    ) -> Self {
        Self {
            security_key: security_key.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            expiration_minutes,
            leeway_seconds: 30,
        }
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Load settings from `STORELINK_JWT_*` environment variables.
    pub fn from_env() -> AuthResult<Self> {
        let security_key = require_var(ENV_SECRET)?;
        let issuer = require_var(ENV_ISSUER)?;
        let audience = require_var(ENV_AUDIENCE)?;
        let expiration_minutes = parse_var(ENV_TTL_MINUTES, 15)?;
        let leeway_seconds = parse_var(ENV_LEEWAY_SECONDS, 30)?;

        Ok(Self {
            security_key,
            issuer,
            audience,
            expiration_minutes,
            leeway_seconds,
        })
    }
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("security_key", &"***redacted***")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiration_minutes", &self.expiration_minutes)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

fn require_var(name: &'static str) -> AuthResult<String> {
    let value = env::var(name).map_err(|_| AuthError::Config(format!("{name} is not set")))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::Config(format!("{name} is empty")));
    }
    Ok(trimmed.to_string())
}

fn parse_var<T>(name: &'static str, default: T) -> AuthResult<T>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AuthError::Config(format!("{name} is not a valid number: '{raw}'"))),
        Err(_) => Ok(default),
    }
}
