//! Session Handle
//!
//! Reactive wrapper around the session store. Created once by the app root
//! and passed down as a prop to every view that reads or changes it.

use leptos::*;

use cardioscope::error::ClientResult;
use cardioscope::model::Session;
use cardioscope::session::SessionStore;

#[derive(Clone, Copy)]
pub struct SessionHandle {
    store: RwSignal<SessionStore>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self {
            store: create_rw_signal(SessionStore::new()),
        }
    }

    /// Current identity (tracked)
    pub fn current(&self) -> Option<Session> {
        self.store.with(|s| s.current().cloned())
    }

    /// Current identity without subscribing
    pub fn current_untracked(&self) -> Option<Session> {
        self.store.with_untracked(|s| s.current().cloned())
    }

    pub fn set(&self, session: Option<Session>) {
        self.store.update(|s| s.set(session));
    }

    /// Apply the startup identity response
    pub fn adopt(&self, identity: ClientResult<Session>) {
        self.store.update(|s| s.adopt_identity(identity));
    }
}

/// Resolve the identity once at startup
pub fn load_identity(session: SessionHandle) {
    spawn_local(async move {
        let identity = crate::api::fetch_me(None).await;
        if let Err(e) = &identity {
            web_sys::console::log_1(&format!("No active session: {}", e).into());
        }
        session.adopt(identity);
    });
}
