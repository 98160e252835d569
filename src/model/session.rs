//! Session identity
//!
//! The client's belief about who is signed in, as answered by the identity
//! endpoint or the login endpoint.

use serde::{Deserialize, Serialize};

/// Role attached to an authenticated identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Patient-facing account
    Ordinary,
    /// Clinician account, may open the clinician panel
    Professional,
}

impl Role {
    /// Wire representation used by the backend
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Ordinary => "ROLE_USER",
            Role::Professional => "ROLE_PRO",
        }
    }

    /// Parse a backend role string. Anything that is not the professional
    /// role is an ordinary account.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "ROLE_PRO" => Role::Professional,
            _ => Role::Ordinary,
        }
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from_wire(&raw))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Ordinary => write!(f, "ordinary"),
            Role::Professional => write!(f, "professional"),
        }
    }
}

/// Authenticated identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn is_professional(&self) -> bool {
        self.role == Role::Professional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_values() {
        let session: Session =
            serde_json::from_str(r#"{"username":"kim","role":"ROLE_PRO"}"#).unwrap();
        assert!(session.is_professional());

        let session: Session =
            serde_json::from_str(r#"{"username":"lee","role":"ROLE_USER"}"#).unwrap();
        assert_eq!(session.role, Role::Ordinary);
    }

    #[test]
    fn test_unknown_role_is_ordinary() {
        let session: Session =
            serde_json::from_str(r#"{"username":"park","role":"ROLE_ADMIN"}"#).unwrap();
        assert_eq!(session.role, Role::Ordinary);
        assert_eq!(serde_json::to_value(&session).unwrap()["role"], "ROLE_USER");
    }
}
