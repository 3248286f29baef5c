use common_auth::{AuthResult, Principal};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::Role;

/// Authorization view of a verified principal.
///
/// Built explicitly per request and passed as a parameter; there is no
/// ambient accessor, so tenant scoping can never leak between requests that
/// share a handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityContext {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub roles: Vec<Role>,
    pub active: bool,
}

impl SecurityContext {
    /// Derive a context from a verified principal. Identity claims must be
    /// present; missing ones propagate as `MissingClaim` rather than being
    /// defaulted.
    pub fn from_principal(principal: &Principal) -> AuthResult<Self> {
        Ok(Self {
            user_id: principal.user_id()?,
            tenant_id: principal.tenant_id()?,
            roles: principal
                .roles()
                .iter()
                .map(|raw| Role::from(raw.as_str()))
                .collect(),
            active: principal.is_active(),
        })
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_auth::{JwtSettings, TokenSigner, TokenSubject};

    fn verified_principal(roles: Vec<String>, active: bool) -> (Principal, TokenSubject) {
        let signer = TokenSigner::new(JwtSettings::new("ctx-secret", "iss", "aud", 5));
        let subject = TokenSubject {
            user_id: Uuid::new_v4(),
            username: "bob".to_string(),
            tenant_id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            roles,
            active,
        };
        let issued = signer.issue_access_token(&subject).expect("issue");
        let principal = signer.verifier().verify(&issued.token).expect("verify");
        (principal, subject)
    }

    #[test]
    fn context_mirrors_principal_claims() {
        let (principal, subject) =
            verified_principal(vec!["administrator".into(), "nightly_job".into()], true);
        let ctx = SecurityContext::from_principal(&principal).expect("context");
        assert_eq!(ctx.user_id, subject.user_id);
        assert_eq!(ctx.tenant_id, subject.tenant_id);
        assert!(ctx.active);
        assert!(ctx.has_role(&Role::Administrator));
        assert!(ctx.has_role(&Role::Unknown("nightly_job".to_string())));
        assert!(!ctx.has_role(&Role::Customer));
    }

    #[test]
    fn inactive_flag_carries_over() {
        let (principal, _) = verified_principal(vec!["customer".into()], false);
        let ctx = SecurityContext::from_principal(&principal).expect("context");
        assert!(!ctx.active);
    }
}
