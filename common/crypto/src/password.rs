use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version, ARGON2ID_IDENT};
use rand::rngs::OsRng;

use crate::error::CryptoError;

/// Outcome of a credential check.
///
/// `needs_upgrade` signals that the stored hash was produced with weaker
/// parameters than the hasher's current targets and should be re-hashed and
/// persisted on the next successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCheck {
    pub verified: bool,
    pub needs_upgrade: bool,
}

/// One-way credential hashing (Argon2id, PHC strings, random salt).
///
/// The cost parameters are held by the hasher so they can be raised over
/// time; [`PasswordHasher::check`] reports when a stored hash lags behind.
#[derive(Clone)]
pub struct PasswordHasher {
    context: Argon2<'static>,
    target: Params,
}

impl PasswordHasher {
    pub fn new(target: Params) -> Self {
        Self {
            context: Argon2::new(Algorithm::Argon2id, Version::V0x13, target.clone()),
            target,
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, CryptoError> {
        let salt = SaltString::generate(&mut OsRng);
        let hashed = self
            .context
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CryptoError::HashFailure(err.to_string()))?;
        Ok(hashed.to_string())
    }

    /// Verify `password` against a stored hash.
    ///
    /// Malformed stored hashes fail verification rather than erroring, so a
    /// routine login attempt never turns into a server fault. Comparison is
    /// delegated to argon2's constant-time verifier.
    pub fn check(&self, stored: &str, password: &str) -> PasswordCheck {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(_) => {
                return PasswordCheck {
                    verified: false,
                    needs_upgrade: false,
                }
            }
        };

        let verified = self
            .context
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();

        PasswordCheck {
            verified,
            needs_upgrade: self.is_below_target(&parsed),
        }
    }

    fn is_below_target(&self, parsed: &PasswordHash<'_>) -> bool {
        if parsed.algorithm != ARGON2ID_IDENT {
            return true;
        }
        match parsed.version {
            Some(version) if version >= Version::V0x13 as u32 => {}
            _ => return true,
        }
        match Params::try_from(parsed) {
            Ok(params) => {
                params.m_cost() < self.target.m_cost()
                    || params.t_cost() < self.target.t_cost()
                    || params.p_cost() < self.target.p_cost()
            }
            Err(_) => true,
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hasher = PasswordHasher::default();
        let stored = hasher.hash("hunter2-but-longer").expect("hash");
        let check = hasher.check(&stored, "hunter2-but-longer");
        assert!(check.verified);
        assert!(!check.needs_upgrade);
    }

    #[test]
    fn wrong_password_fails() {
        let hasher = PasswordHasher::default();
        let stored = hasher.hash("correct-horse").expect("hash");
        let check = hasher.check(&stored, "battery-staple");
        assert!(!check.verified);
    }

    #[test]
    fn salted_hashes_differ() {
        let hasher = PasswordHasher::default();
        let first = hasher.hash("same-password").expect("hash");
        let second = hasher.hash("same-password").expect("hash");
        assert_ne!(first, second);
        assert!(hasher.check(&first, "same-password").verified);
        assert!(hasher.check(&second, "same-password").verified);
    }

    #[test]
    fn malformed_hash_fails_verification() {
        let hasher = PasswordHasher::default();
        for stored in ["", "plaintext-left-over", "$argon2id$broken"] {
            let check = hasher.check(stored, "anything");
            assert!(!check.verified);
            assert!(!check.needs_upgrade);
        }
    }

    #[test]
    fn weaker_parameters_need_upgrade() {
        let legacy_params = Params::new(8 * 1024, 1, 1, None).expect("params");
        let legacy = PasswordHasher::new(legacy_params);
        let stored = legacy.hash("rotate-me").expect("hash");

        let current = PasswordHasher::default();
        let check = current.check(&stored, "rotate-me");
        assert!(check.verified);
        assert!(check.needs_upgrade);

        // The legacy hasher itself is satisfied with its own output.
        let check = legacy.check(&stored, "rotate-me");
        assert!(check.verified);
        assert!(!check.needs_upgrade);
    }
}
