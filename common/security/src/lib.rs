pub mod context;
pub mod error;
pub mod policy;
pub mod roles;

pub use context::SecurityContext;
pub use error::SecurityError;
pub use policy::{ensure_any_role, ensure_capability, ensure_role, ensure_tenant, Capability};
pub use roles::{Role, ROLE_HIERARCHY};
