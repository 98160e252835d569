//! Client-side routes

use crate::gate::AccessGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Landing page
    Intro,
    /// Upload and result dashboard
    User,
    /// Clinician panel
    Professional,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Intro, Route::User, Route::Professional];

    pub fn path(self) -> &'static str {
        match self {
            Route::Intro => "/",
            Route::User => "/user",
            Route::Professional => "/professional",
        }
    }

    /// Sidebar label; the landing page is reached from the header instead
    pub fn nav_label(self) -> Option<&'static str> {
        match self {
            Route::Intro => None,
            Route::User => Some("For general users"),
            Route::Professional => Some("For clinicians"),
        }
    }

    /// Role gate guarding this route, if any
    pub fn gate(self) -> Option<AccessGate> {
        match self {
            Route::Professional => Some(AccessGate::professional_route()),
            Route::Intro | Route::User => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_professional_is_gated() {
        assert!(Route::Professional.gate().is_some());
        assert!(Route::User.gate().is_none());
        assert!(Route::Intro.gate().is_none());
    }
}
