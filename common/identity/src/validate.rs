use serde::Deserialize;

/// Roles accepted at the registration boundary.
pub const ALLOWED_ROLES: &[&str] = &["administrator", "power_user", "user", "customer"];

const MIN_PASSWORD_LENGTH: usize = 12;

/// One failed check. Boundary validation returns the full list rather than
/// stopping at the first problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub code: &'static str,
    pub message: String,
}

/// Registration input, validated before any hashing or persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

type Check = fn(&NewUser) -> Option<Violation>;

const CHECKS: &[Check] = &[name_present, email_shape, password_length, role_allowed];

/// Run the whole pipeline of predicate checks over `input`.
pub fn validate_new_user(input: &NewUser) -> Vec<Violation> {
    CHECKS.iter().filter_map(|check| check(input)).collect()
}

fn name_present(input: &NewUser) -> Option<Violation> {
    if input.name.trim().is_empty() {
        return Some(Violation {
            field: "name",
            code: "required",
            message: "name must not be empty".to_string(),
        });
    }
    None
}

fn email_shape(input: &NewUser) -> Option<Violation> {
    let email = input.email.trim();
    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
        .unwrap_or(false);
    if !well_formed {
        return Some(Violation {
            field: "email",
            code: "format",
            message: format!("'{email}' is not a valid email address"),
        });
    }
    None
}

fn password_length(input: &NewUser) -> Option<Violation> {
    if input.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(Violation {
            field: "password",
            code: "too_short",
            message: format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
        });
    }
    None
}

fn role_allowed(input: &NewUser) -> Option<Violation> {
    let role = input.role.trim().to_ascii_lowercase();
    if !ALLOWED_ROLES.contains(&role.as_str()) {
        return Some(Violation {
            field: "role",
            code: "unknown_role",
            message: format!("role must be one of: {}", ALLOWED_ROLES.join(", ")),
        });
    }
    None
}
