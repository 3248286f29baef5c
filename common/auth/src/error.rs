use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Internal token-failure taxonomy. Callers outside this crate should map
/// on [`AuthError::kind`]; the detailed variants exist for diagnostics.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token missing kid header")]
    MissingKeyId,
    #[error("no decoding key registered for kid '{0}'")]
    UnknownKeyId(String),
    #[error("failed to decode token header: {0}")]
    InvalidHeader(String),
    #[error("token signature verification failed")]
    Signature,
    #[error("token issuer or audience mismatch")]
    IssuerOrAudience,
    #[error("token expired")]
    Expired,
    #[error("token verification failed: {0}")]
    Verification(String),
    #[error("invalid claim '{0}' with value '{1}'")]
    InvalidClaim(&'static str, String),
    #[error("malformed claim payload: {0}")]
    InvalidJson(String),
    #[error("principal missing expected claim '{0}'")]
    MissingClaim(&'static str),
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("invalid jwt configuration: {0}")]
    Config(String),
}

/// Coarse failure category surfaced to the request pipeline.
///
/// `TokenExpired` is split out solely so the refresh flow can distinguish
/// an expired-but-otherwise-valid token; everything else a caller needs to
/// know is "authentication failed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    AuthenticationFailed,
    TokenExpired,
    MissingClaim,
}

impl AuthError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AuthError::Expired => FailureKind::TokenExpired,
            AuthError::MissingClaim(_) => FailureKind::MissingClaim,
            _ => FailureKind::AuthenticationFailed,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match value.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::Signature,
            ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => Self::IssuerOrAudience,
            _ => Self::Verification(value.to_string()),
        }
    }
}
