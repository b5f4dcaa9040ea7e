use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClaimsError;
use crate::permission::Permission;

/// The `sub` claim.
///
/// Issuers that key users by row id send a number; others send a UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Id(i64),
    Uuid(Uuid),
}

impl From<i64> for Subject {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<Uuid> for Subject {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Uuid(id) => write!(f, "{id}"),
        }
    }
}

/// The signed-in user, as read from already verified token claims.
///
/// Permissions are kept as raw strings so a token minted by a newer issuer
/// with permissions this build does not know about still deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub sub: Subject,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Principal {
    #[must_use]
    pub fn new(
        sub: impl Into<Subject>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            sub: sub.into(),
            username: username.into(),
            email: email.into(),
            permissions: Vec::new(),
        }
    }

    /// Add a permission.
    #[must_use]
    pub fn grant(mut self, permission: Permission) -> Self {
        self.permissions.push(permission.as_str().to_owned());
        self
    }

    /// Read a principal from decoded claims.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError`] if required claims are missing or mistyped.
    pub fn from_claims(claims: serde_json::Value) -> Result<Self, ClaimsError> {
        Ok(serde_json::from_value(claims)?)
    }

    /// The known permissions this principal holds.
    ///
    /// Unrecognized permission strings are skipped.
    #[must_use]
    pub fn granted(&self) -> HashSet<Permission> {
        self.permissions
            .iter()
            .filter_map(|name| match name.parse::<Permission>() {
                Ok(permission) => Some(permission),
                Err(err) => {
                    tracing::debug!(sub = %self.sub, error = %err, "ignoring permission");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_claims_reads_numeric_subject() {
        let principal = Principal::from_claims(json!({
            "sub": 42,
            "exp": 1_900_000_000,
            "username": "alice",
            "email": "alice@example.com",
            "permissions": ["read:all", "create:product"],
        }))
        .unwrap();

        assert_eq!(principal.sub, Subject::Id(42));
        assert_eq!(principal.username, "alice");
        assert_eq!(
            principal.granted(),
            HashSet::from([Permission::ReadAll, Permission::CreateProduct])
        );
    }

    #[test]
    fn from_claims_reads_uuid_subject() {
        let sub = Uuid::from_u128(0x9c5b_94b1_35ad_49bb_b118_8e8f_c24a_bd14);
        let principal = Principal::from_claims(json!({
            "sub": sub,
            "username": "alice",
            "email": "alice@example.com",
        }))
        .unwrap();

        assert_eq!(principal.sub, Subject::Uuid(sub));
        assert!(principal.permissions.is_empty());
        assert_eq!(principal.sub.to_string(), sub.to_string());
    }

    #[test]
    fn from_claims_rejects_missing_or_mistyped_subject() {
        let err = Principal::from_claims(json!({
            "username": "alice",
            "email": "alice@example.com",
        }))
        .unwrap_err();
        assert!(err.to_string().starts_with("invalid claims:"));

        for sub in [json!("alice"), json!(4.5), json!(null)] {
            let claims = json!({"sub": sub, "username": "a", "email": "a@x"});
            assert!(Principal::from_claims(claims).is_err());
        }
    }

    #[test]
    fn granted_skips_unknown_permissions() {
        let mut principal =
            Principal::new(7_i64, "bob", "bob@example.com").grant(Permission::ReadUser);
        principal.permissions.push("read:everything".to_owned());

        assert_eq!(principal.granted(), HashSet::from([Permission::ReadUser]));
    }
}
