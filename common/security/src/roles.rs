use serde::{Deserialize, Serialize};

/// Named roles recognised by the authorization policies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Administrator,
    PowerUser,
    User,
    Customer,
    Unknown(String),
}

/// Most- to least-privileged.
pub const ROLE_HIERARCHY: &[Role] = &[Role::Administrator, Role::PowerUser, Role::User, Role::Customer];

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Administrator => "administrator",
            Role::PowerUser => "power_user",
            Role::User => "user",
            Role::Customer => "customer",
            Role::Unknown(other) => other,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "administrator" => Role::Administrator,
            "power_user" => Role::PowerUser,
            "user" => Role::User,
            "customer" => Role::Customer,
            _ => Role::Unknown(s.trim().to_string()),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(s))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
