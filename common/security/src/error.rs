use thiserror::Error;
use uuid::Uuid;

/// Authorization failures. Authenticated-but-denied is a normal outcome for
/// the pipeline to translate (403), never a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    #[error("account is deactivated")]
    InactiveAccount,
    #[error("insufficient role; required one of: {}", .required.join(", "))]
    Forbidden { required: Vec<String> },
    #[error("authenticated tenant ({expected}) does not own resource tenant ({received})")]
    TenantMismatch { expected: Uuid, received: Uuid },
}
