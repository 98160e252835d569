//! Fetch Scope
//!
//! Binds a view's requests to its lifetime. When the owning component is
//! disposed the abort controller cancels in-flight fetches, and any
//! response that still arrives is dropped before it touches state.

use leptos::*;
use std::future::Future;
use web_sys::{AbortController, AbortSignal};

use cardioscope::error::{ClientError, ClientResult};
use cardioscope::scope::ViewScope;

#[derive(Clone)]
pub struct FetchScope {
    scope: ViewScope,
    controller: Option<AbortController>,
}

impl FetchScope {
    /// Create a scope owned by the current component
    pub fn new() -> Self {
        let fetch_scope = Self {
            scope: ViewScope::new(),
            controller: AbortController::new().ok(),
        };

        let on_dispose = fetch_scope.clone();
        on_cleanup(move || {
            on_dispose.scope.cancel();
            if let Some(controller) = &on_dispose.controller {
                controller.abort();
            }
        });

        fetch_scope
    }

    fn signal(&self) -> Option<AbortSignal> {
        self.controller.as_ref().map(|c| c.signal())
    }

    /// Run a request and hand its result to `apply`, unless the view has
    /// gone away in the meantime
    pub fn run<T, Fut>(
        &self,
        request: impl FnOnce(Option<AbortSignal>) -> Fut + 'static,
        apply: impl FnOnce(ClientResult<T>) + 'static,
    ) where
        T: 'static,
        Fut: Future<Output = ClientResult<T>> + 'static,
    {
        let scope = self.scope.clone();
        let signal = self.signal();

        spawn_local(async move {
            let response = request(signal).await;
            match scope.admit(response) {
                Err(ClientError::Cancelled) => {}
                outcome => apply(outcome),
            }
        });
    }
}
