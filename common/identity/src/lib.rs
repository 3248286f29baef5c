pub mod error;
pub mod records;
pub mod validate;

pub use error::IdentityError;
pub use records::{Credential, Role, RoleAssignments, Tenant, User, UserRole};
pub use validate::{validate_new_user, NewUser, Violation, ALLOWED_ROLES};
