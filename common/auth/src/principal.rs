use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// A verified token payload.
///
/// Claims are opaque (type, value) pairs at this level; the typed accessors
/// below own their semantics. Every accessor fails with
/// [`AuthError::MissingClaim`] when its claim is absent — defaulting a
/// missing tenant id would be a tenant-isolation bug, so none of them do.
#[derive(Debug, Clone)]
pub struct Principal {
    claims: Map<String, Value>,
}

/// Fully-typed identity snapshot extracted from a [`Principal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
    pub tenant_id: Uuid,
    pub application_id: Uuid,
    pub roles: Vec<String>,
    pub active: bool,
}

impl Principal {
    pub(crate) fn from_payload(value: Value) -> AuthResult<Self> {
        match value {
            Value::Object(claims) => Ok(Self { claims }),
            other => Err(AuthError::InvalidJson(format!(
                "expected claim object, got {other}"
            ))),
        }
    }

    pub fn user_id(&self) -> AuthResult<Uuid> {
        self.uuid_claim("sub")
    }

    pub fn username(&self) -> AuthResult<&str> {
        self.str_claim("uname")
    }

    pub fn tenant_id(&self) -> AuthResult<Uuid> {
        self.uuid_claim("tid")
    }

    pub fn application_id(&self) -> AuthResult<Uuid> {
        self.uuid_claim("app")
    }

    /// Role memberships. An absent claim is an empty set: it denies every
    /// role-gated action rather than failing authentication.
    pub fn roles(&self) -> Vec<String> {
        match self.claims.get("roles") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Account-status claim; absent means inactive (fail closed).
    pub fn is_active(&self) -> bool {
        matches!(self.claims.get("active"), Some(Value::Bool(true)))
    }

    pub fn expires_at(&self) -> AuthResult<DateTime<Utc>> {
        let exp = self
            .claims
            .get("exp")
            .ok_or(AuthError::MissingClaim("exp"))?;
        let seconds = exp
            .as_i64()
            .ok_or_else(|| AuthError::InvalidClaim("exp", exp.to_string()))?;
        Utc.timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| AuthError::InvalidClaim("exp", seconds.to_string()))
    }

    pub fn identity(&self) -> AuthResult<Identity> {
        Ok(Identity {
            user_id: self.user_id()?,
            username: self.username()?.to_owned(),
            tenant_id: self.tenant_id()?,
            application_id: self.application_id()?,
            roles: self.roles(),
            active: self.is_active(),
        })
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.claims
    }

    fn str_claim(&self, name: &'static str) -> AuthResult<&str> {
        let value = self.claims.get(name).ok_or(AuthError::MissingClaim(name))?;
        value
            .as_str()
            .ok_or_else(|| AuthError::InvalidClaim(name, value.to_string()))
    }

    fn uuid_claim(&self, name: &'static str) -> AuthResult<Uuid> {
        let raw = self.str_claim(name)?;
        Uuid::parse_str(raw).map_err(|_| AuthError::InvalidClaim(name, raw.to_string()))
    }
}
