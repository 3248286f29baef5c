use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IdentityError;

/// Isolation boundary partitioning users and data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
}

/// Stored credential. Holds only the one-way hash; the plaintext is never
/// retained, and rotation replaces the old hash atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    hash: String,
    updated_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            updated_at: Utc::now(),
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the stored hash; the old one is discarded in the same move.
    pub fn rotate(&mut self, new_hash: impl Into<String>) {
        self.hash = new_hash.into();
        self.updated_at = Utc::now();
    }
}

/// Plain user record. Persistence mapping belongs to an external
/// collaborator; nothing here inherits framework identity types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: String,
    pub credential: Credential,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Named role record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
}

/// Join row between a user and a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub user_id: Uuid,
    pub role_id: Uuid,
}

/// In-memory view of role grants enforcing the (user, role) uniqueness
/// invariant: the same role can never be granted to a user twice.
#[derive(Debug, Clone, Default)]
pub struct RoleAssignments {
    grants: BTreeSet<(Uuid, Uuid)>,
}

impl RoleAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, user_id: Uuid, role_id: Uuid) -> Result<UserRole, IdentityError> {
        if !self.grants.insert((user_id, role_id)) {
            return Err(IdentityError::DuplicateGrant { user_id, role_id });
        }
        Ok(UserRole { user_id, role_id })
    }

    pub fn revoke(&mut self, user_id: Uuid, role_id: Uuid) -> bool {
        self.grants.remove(&(user_id, role_id))
    }

    pub fn contains(&self, user_id: Uuid, role_id: Uuid) -> bool {
        self.grants.contains(&(user_id, role_id))
    }

    pub fn roles_for(&self, user_id: Uuid) -> Vec<Uuid> {
        self.grants
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, role)| *role)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_grants_are_rejected() {
        let mut assignments = RoleAssignments::new();
        let user = Uuid::new_v4();
        let role = Uuid::new_v4();

        assignments.grant(user, role).expect("first grant");
        let err = assignments.grant(user, role).expect_err("duplicate");
        assert_eq!(
            err,
            IdentityError::DuplicateGrant {
                user_id: user,
                role_id: role,
            }
        );
        assert_eq!(assignments.len(), 1);
    }

    #[test]
    fn revoke_allows_regrant() {
        let mut assignments = RoleAssignments::new();
        let user = Uuid::new_v4();
        let role = Uuid::new_v4();

        assignments.grant(user, role).expect("grant");
        assert!(assignments.revoke(user, role));
        assert!(!assignments.revoke(user, role));
        assignments.grant(user, role).expect("regrant after revoke");
    }

    #[test]
    fn roles_for_lists_only_that_user() {
        let mut assignments = RoleAssignments::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let admin = Uuid::new_v4();
        let customer = Uuid::new_v4();

        assignments.grant(alice, admin).expect("grant");
        assignments.grant(alice, customer).expect("grant");
        assignments.grant(bob, customer).expect("grant");

        let mut roles = assignments.roles_for(alice);
        roles.sort();
        let mut expected = vec![admin, customer];
        expected.sort();
        assert_eq!(roles, expected);
        assert_eq!(assignments.roles_for(bob), vec![customer]);
    }

    #[test]
    fn credential_rotation_discards_old_hash() {
        let mut credential = Credential::new("$argon2id$old");
        let before = credential.updated_at();
        credential.rotate("$argon2id$new");
        assert_eq!(credential.hash(), "$argon2id$new");
        assert!(credential.updated_at() >= before);
    }
}
