pub mod config;
pub mod error;
pub mod keyring;
pub mod principal;
pub mod signer;
pub mod verifier;

pub use config::JwtSettings;
pub use error::{AuthError, AuthResult, FailureKind};
pub use keyring::KeyRing;
pub use principal::{Identity, Principal};
pub use signer::{IssuedAccessToken, RefreshToken, TokenSigner, TokenSubject, DEFAULT_KID};
pub use verifier::JwtVerifier;
