//! Session Store
//!
//! Holds the current identity. It is filled once from the identity endpoint
//! at startup and replaced wholesale by login and logout; there is no
//! expiry, polling or retry.

use crate::error::ClientResult;
use crate::model::Session;

/// Current authenticated identity, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStore {
    current: Option<Session>,
}

impl SessionStore {
    /// Unauthenticated store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Replace the session (login) or clear it (logout)
    pub fn set(&mut self, session: Option<Session>) {
        match &session {
            Some(s) => tracing::debug!(username = %s.username, role = %s.role, "Session set"),
            None => tracing::debug!("Session cleared"),
        }
        self.current = session;
    }

    /// Apply the answer of the startup identity request. A failed request
    /// leaves the store unauthenticated.
    pub fn adopt_identity(&mut self, identity: ClientResult<Session>) {
        match identity {
            Ok(session) => self.set(Some(session)),
            Err(e) => {
                tracing::debug!(error = %e, "No active session");
            }
        }
    }
}

/// Startup identity resolution for stores held outside [`SessionStore`]
/// (the browser keeps the session in a reactive signal)
pub fn resolve_identity(identity: ClientResult<Session>) -> Option<Session> {
    let mut store = SessionStore::new();
    store.adopt_identity(identity);
    store.current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::model::Role;

    #[test]
    fn test_identity_success_adopted() {
        let mut store = SessionStore::new();
        store.adopt_identity(Ok(Session::new("kim", Role::Professional)));
        assert_eq!(store.current().map(|s| s.role), Some(Role::Professional));
    }

    #[test]
    fn test_identity_failure_stays_unauthenticated() {
        let mut store = SessionStore::new();
        store.adopt_identity(Err(ClientError::Status { status: 401, message: None }));
        assert!(store.current().is_none());

        assert_eq!(
            resolve_identity(Err(ClientError::Transport("refused".into()))),
            None
        );
    }

    #[test]
    fn test_set_replaces_wholesale() {
        let mut store = SessionStore::new();
        store.set(Some(Session::new("kim", Role::Ordinary)));
        store.set(Some(Session::new("lee", Role::Professional)));
        assert_eq!(store.current().map(|s| s.username.as_str()), Some("lee"));
        store.set(None);
        assert!(store.current().is_none());
    }
}
