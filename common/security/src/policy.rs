use tracing::warn;
use uuid::Uuid;

use crate::context::SecurityContext;
use crate::error::SecurityError;
use crate::roles::Role;

/// Endpoint capabilities gated by role membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CatalogManage,
    OrderPlace,
    OrderManage,
    CustomerView,
    ReportView,
}

// Which roles are allowed each capability.
fn allowed_roles(cap: Capability) -> &'static [Role] {
    use Capability::*;
    use Role::*;
    match cap {
        CatalogManage => &[Administrator, PowerUser],
        OrderPlace => &[Administrator, PowerUser, User, Customer],
        OrderManage => &[Administrator, PowerUser, User],
        CustomerView => &[Administrator, PowerUser, User],
        ReportView => &[Administrator],
    }
}

/// Baseline account-status condition. Role membership alone is never
/// sufficient for a deactivated account.
fn ensure_active(ctx: &SecurityContext) -> Result<(), SecurityError> {
    if ctx.active {
        Ok(())
    } else {
        warn!(tenant_id = %ctx.tenant_id, user_id = %ctx.user_id, "inactive_account_denied");
        Err(SecurityError::InactiveAccount)
    }
}

pub fn ensure_role(ctx: &SecurityContext, required: Role) -> Result<(), SecurityError> {
    ensure_any_role(ctx, std::slice::from_ref(&required))
}

pub fn ensure_any_role(ctx: &SecurityContext, allowed: &[Role]) -> Result<(), SecurityError> {
    ensure_active(ctx)?;
    if ctx.roles.iter().any(|role| allowed.contains(role)) {
        return Ok(());
    }
    warn!(tenant_id = %ctx.tenant_id, ?allowed, roles = ?ctx.roles, "role_check_failed");
    Err(SecurityError::Forbidden {
        required: allowed.iter().map(|role| role.as_str().to_string()).collect(),
    })
}

/// Tenant isolation: the resource's owning tenant must equal the
/// principal's. Evaluated per request against the supplied resource tenant,
/// never cached on the handler.
pub fn ensure_tenant(ctx: &SecurityContext, resource_tenant: Uuid) -> Result<(), SecurityError> {
    if ctx.tenant_id == resource_tenant {
        return Ok(());
    }
    warn!(tenant_id = %ctx.tenant_id, resource_tenant = %resource_tenant, "tenant_check_failed");
    Err(SecurityError::TenantMismatch {
        expected: ctx.tenant_id,
        received: resource_tenant,
    })
}

pub fn ensure_capability(ctx: &SecurityContext, cap: Capability) -> Result<(), SecurityError> {
    ensure_any_role(ctx, allowed_roles(cap))
}
