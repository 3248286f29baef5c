use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("role {role_id} already granted to user {user_id}")]
    DuplicateGrant { user_id: Uuid, role_id: Uuid },
}
