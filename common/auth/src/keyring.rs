use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use jsonwebtoken::DecodingKey;

/// Thread-safe store of decoding keys by kid.
///
/// Rotation contract: installing a new key does not evict previous ones, so
/// tokens signed moments before a rotation keep verifying until the old kid
/// is explicitly retired.
#[derive(Clone, Default)]
pub struct KeyRing {
    inner: Arc<RwLock<HashMap<String, DecodingKey>>>,
}

impl KeyRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symmetric secret under `kid`.
    pub fn install(&self, kid: impl Into<String>, secret: &[u8]) {
        self.insert_key(kid, DecodingKey::from_secret(secret));
    }

    pub fn insert_key(&self, kid: impl Into<String>, key: DecodingKey) {
        let mut guard = self.inner.write().expect("rwlock poisoned");
        guard.insert(kid.into(), key);
    }

    /// Drop a key; tokens signed under this kid stop verifying.
    pub fn retire(&self, kid: &str) -> bool {
        let mut guard = self.inner.write().expect("rwlock poisoned");
        guard.remove(kid).is_some()
    }

    pub fn get(&self, kid: &str) -> Option<DecodingKey> {
        let guard = self.inner.read().expect("rwlock poisoned");
        guard.get(kid).cloned()
    }

    pub fn contains(&self, kid: &str) -> bool {
        let guard = self.inner.read().expect("rwlock poisoned");
        guard.contains_key(kid)
    }

    pub fn len(&self) -> usize {
        let guard = self.inner.read().expect("rwlock poisoned");
        guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_and_retire_round_trip() {
        let ring = KeyRing::new();
        assert!(ring.is_empty());
        assert!(!ring.contains("primary"));

        ring.install("primary", b"secret");
        assert!(ring.contains("primary"));
        assert!(ring.get("primary").is_some());

        ring.install("next", b"other-secret");
        assert_eq!(ring.len(), 2);

        assert!(ring.retire("primary"));
        assert!(!ring.contains("primary"));
        assert!(ring.contains("next"));
        assert!(!ring.retire("primary"));
    }
}
