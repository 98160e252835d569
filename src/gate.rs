//! Access Gate
//!
//! One reusable role check for protected views. A denied visitor sees a
//! modal with fixed copy; after a delay the gate either navigates away
//! (route gate) or simply closes the modal (inline gate on the landing page).

use std::time::Duration;

use crate::model::{Role, Session};

pub const DENIED_TITLE: &str = "Access denied";
pub const DENIED_BODY: &str = "This page is for clinicians only.";
pub const DENIED_REDIRECT_NOTE: &str = "Returning to the previous screen...";

/// Delay before a route gate navigates away
pub const ROUTE_GATE_DELAY: Duration = Duration::from_millis(2000);
/// Delay before the landing page closes its denial modal
pub const INLINE_GATE_DELAY: Duration = Duration::from_millis(1500);

/// What happens once the denial delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    /// Leave the protected route
    Route,
    /// Stay put and dismiss the modal
    Inline,
}

/// Where a route gate sends a denied visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// One step back in browser history
    Back,
    /// Replace the current entry with the home route
    Home,
    /// No navigation
    Stay,
}

/// Outcome of a gate check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny(Denial),
}

/// Modal copy and the delayed follow-up action for a denied visitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub title: &'static str,
    pub body: &'static str,
    pub note: Option<&'static str>,
    pub delay: Duration,
    pub mode: GateMode,
}

impl Denial {
    /// Navigation once the delay has elapsed. `history_len` is the browser
    /// history length; with nothing to go back to the gate goes home.
    pub fn redirect(&self, history_len: u32) -> Redirect {
        match self.mode {
            GateMode::Inline => Redirect::Stay,
            GateMode::Route if history_len <= 1 => Redirect::Home,
            GateMode::Route => Redirect::Back,
        }
    }
}

/// Role requirement for a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGate {
    pub required: Role,
    pub delay: Duration,
    pub mode: GateMode,
}

impl AccessGate {
    /// Gate for the clinician route
    pub fn professional_route() -> Self {
        Self {
            required: Role::Professional,
            delay: ROUTE_GATE_DELAY,
            mode: GateMode::Route,
        }
    }

    /// Gate for the clinician tile on the landing page
    pub fn professional_inline() -> Self {
        Self {
            required: Role::Professional,
            delay: INLINE_GATE_DELAY,
            mode: GateMode::Inline,
        }
    }

    pub fn admits(&self, session: Option<&Session>) -> bool {
        session.map(|s| s.role == self.required).unwrap_or(false)
    }

    pub fn check(&self, session: Option<&Session>) -> GateDecision {
        if self.admits(session) {
            return GateDecision::Allow;
        }
        tracing::debug!(
            required = %self.required,
            actual = ?session.map(|s| s.role),
            "Access denied"
        );
        GateDecision::Deny(Denial {
            title: DENIED_TITLE,
            body: DENIED_BODY,
            note: match self.mode {
                GateMode::Route => Some(DENIED_REDIRECT_NOTE),
                GateMode::Inline => None,
            },
            delay: self.delay,
            mode: self.mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_professional_admitted() {
        let gate = AccessGate::professional_route();
        let pro = Session::new("dr.kim", Role::Professional);
        assert_eq!(gate.check(Some(&pro)), GateDecision::Allow);
    }

    #[test]
    fn test_ordinary_and_anonymous_denied() {
        let gate = AccessGate::professional_route();
        let user = Session::new("lee", Role::Ordinary);

        for session in [None, Some(&user)] {
            match gate.check(session) {
                GateDecision::Deny(denial) => {
                    assert_eq!(denial.title, DENIED_TITLE);
                    assert_eq!(denial.delay, Duration::from_secs(2));
                    assert_eq!(denial.redirect(3), Redirect::Back);
                    assert_eq!(denial.redirect(1), Redirect::Home);
                }
                GateDecision::Allow => panic!("non-professional admitted"),
            }
        }
    }

    #[test]
    fn test_inline_gate_stays() {
        let gate = AccessGate::professional_inline();
        match gate.check(None) {
            GateDecision::Deny(denial) => {
                assert_eq!(denial.delay, Duration::from_millis(1500));
                assert_eq!(denial.redirect(5), Redirect::Stay);
                assert!(denial.note.is_none());
            }
            GateDecision::Allow => panic!("anonymous admitted"),
        }
    }
}
