//! View-scoped cancellation
//!
//! Every fetch a view starts is tied to that view's [`ViewScope`]. When the
//! view is torn down the scope is cancelled and any response that arrives
//! afterwards is dropped instead of being applied to a dead view.
//!
//! Views live on a single UI thread, so the flag is a shared `Cell`.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{ClientError, ClientResult};

/// Cancellation token shared between a view and its requests
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    cancelled: Rc<Cell<bool>>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear the scope down. Idempotent.
    pub fn cancel(&self) {
        if !self.cancelled.replace(true) {
            tracing::debug!("View scope cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Pass a response through the scope: responses reaching a cancelled
    /// scope turn into [`ClientError::Cancelled`]
    pub fn admit<T>(&self, response: ClientResult<T>) -> ClientResult<T> {
        if self.is_cancelled() {
            Err(ClientError::Cancelled)
        } else {
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_scope_drops_responses() {
        let scope = ViewScope::new();
        assert_eq!(scope.admit(Ok(1)), Ok(1));

        let handle = scope.clone();
        handle.cancel();
        assert!(scope.is_cancelled());
        assert_eq!(scope.admit(Ok(1)), Err(ClientError::Cancelled));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let scope = ViewScope::new();
        scope.cancel();
        scope.cancel();
        assert!(scope.is_cancelled());
        assert_eq!(
            scope.admit::<()>(Err(ClientError::Transport("refused".into()))),
            Err(ClientError::Cancelled)
        );
    }
}
