//! Login / Signup form logic
//!
//! The form has two modes. Login posts credentials and, on success, the
//! returned identity replaces the session. Register posts credentials plus
//! a member-type token and only shows a confirmation.

use serde::Serialize;
use thiserror::Error;

use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::model::{MessageResponse, Session};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTER_FAILED: &str = "Sign-up failed";
pub const REGISTER_SUCCEEDED: &str = "Sign-up complete";
pub const UNKNOWN_FAILURE: &str = "Something went wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            AuthMode::Login => endpoints::LOGIN,
            AuthMode::Register => endpoints::REGISTER,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Sign in to your account",
            AuthMode::Register => "Create an account",
        }
    }
}

/// Member type chosen at sign-up, sent as the registration token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    User,
    Pro,
}

impl MemberType {
    pub fn token(self) -> &'static str {
        match self {
            MemberType::User => "user",
            MemberType::Pro => "pro",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MemberType::User => "General user",
            MemberType::Pro => "Clinician",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "user" => Some(MemberType::User),
            "pro" => Some(MemberType::Pro),
            _ => None,
        }
    }
}

/// Why a submission was not sent
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthBlocked {
    #[error("Please enter your ID")]
    MissingUsername,
    #[error("Please enter your password")]
    MissingPassword,
    #[error("Please choose a member type")]
    MissingMemberType,
}

/// JSON body posted to the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Ready-to-send auth request
#[derive(Debug, Clone, PartialEq)]
pub struct AuthRequest {
    pub mode: AuthMode,
    pub endpoint: &'static str,
    pub body: Credentials,
}

/// Result of an auth round trip as the form presents it
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// Login succeeded; replace the session
    SignedIn(Session),
    /// Registration succeeded; show the message, session untouched
    Registered(String),
    /// Show the message as the form error
    Failed(String),
}

/// Form state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub password: String,
    pub member_type: Option<MemberType>,
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Build the request, checking only that the fields are present
    pub fn prepare(&self) -> Result<AuthRequest, AuthBlocked> {
        if self.username.trim().is_empty() {
            return Err(AuthBlocked::MissingUsername);
        }
        if self.password.is_empty() {
            return Err(AuthBlocked::MissingPassword);
        }
        let token = match self.mode {
            AuthMode::Login => None,
            AuthMode::Register => Some(
                self.member_type
                    .ok_or(AuthBlocked::MissingMemberType)?
                    .token()
                    .to_string(),
            ),
        };

        Ok(AuthRequest {
            mode: self.mode,
            endpoint: self.mode.endpoint(),
            body: Credentials {
                username: self.username.clone(),
                password: self.password.clone(),
                token,
            },
        })
    }
}

impl AuthRequest {
    /// Interpret the backend's answer. `response` is the parsed JSON body of
    /// a success status, or the client error for anything else.
    pub fn outcome(&self, response: ClientResult<serde_json::Value>) -> AuthOutcome {
        let body = match response {
            Ok(body) => body,
            Err(e) => return AuthOutcome::Failed(self.failure_message(&e)),
        };

        match self.mode {
            AuthMode::Login => match serde_json::from_value::<Session>(body) {
                Ok(session) => {
                    tracing::info!(username = %session.username, "Signed in");
                    AuthOutcome::SignedIn(session)
                }
                Err(e) => AuthOutcome::Failed(ClientError::from(e).to_string()),
            },
            AuthMode::Register => {
                let message = serde_json::from_value::<MessageResponse>(body)
                    .ok()
                    .and_then(|m| m.message)
                    .unwrap_or_else(|| REGISTER_SUCCEEDED.to_string());
                AuthOutcome::Registered(message)
            }
        }
    }

    fn failure_message(&self, err: &ClientError) -> String {
        if let Some(message) = err.server_message() {
            return message.to_string();
        }
        match err {
            ClientError::Status { .. } => match self.mode {
                AuthMode::Login => LOGIN_FAILED.to_string(),
                AuthMode::Register => REGISTER_FAILED.to_string(),
            },
            _ => UNKNOWN_FAILURE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use serde_json::json;

    fn filled(mode: AuthMode) -> AuthForm {
        AuthForm {
            mode,
            username: "kim".into(),
            password: "secret".into(),
            member_type: None,
        }
    }

    #[test]
    fn test_login_request_has_no_token() {
        let request = filled(AuthMode::Login).prepare().unwrap();
        assert_eq!(request.endpoint, "/api/login");
        assert_eq!(
            serde_json::to_value(&request.body).unwrap(),
            json!({"username": "kim", "password": "secret"})
        );
    }

    #[test]
    fn test_register_requires_member_type() {
        let mut form = filled(AuthMode::Register);
        assert_eq!(form.prepare(), Err(AuthBlocked::MissingMemberType));

        form.member_type = Some(MemberType::Pro);
        let request = form.prepare().unwrap();
        assert_eq!(request.endpoint, "/api/public/insertUser");
        assert_eq!(request.body.token.as_deref(), Some("pro"));
    }

    #[test]
    fn test_presence_checks() {
        let mut form = AuthForm::new();
        assert_eq!(form.prepare(), Err(AuthBlocked::MissingUsername));
        form.username = "kim".into();
        assert_eq!(form.prepare(), Err(AuthBlocked::MissingPassword));
    }

    #[test]
    fn test_login_success_replaces_session() {
        let request = filled(AuthMode::Login).prepare().unwrap();
        let outcome = request.outcome(Ok(json!({"username": "kim", "role": "ROLE_PRO"})));
        assert_eq!(outcome, AuthOutcome::SignedIn(Session::new("kim", Role::Professional)));
    }

    #[test]
    fn test_server_message_surfaced_verbatim() {
        let request = filled(AuthMode::Login).prepare().unwrap();
        let outcome = request.outcome(Err(ClientError::Status {
            status: 401,
            message: Some("Invalid password".into()),
        }));
        assert_eq!(outcome, AuthOutcome::Failed("Invalid password".into()));

        let outcome = request.outcome(Err(ClientError::Status { status: 401, message: None }));
        assert_eq!(outcome, AuthOutcome::Failed(LOGIN_FAILED.into()));
    }

    #[test]
    fn test_register_success_keeps_session() {
        let mut form = filled(AuthMode::Register);
        form.member_type = Some(MemberType::User);
        let request = form.prepare().unwrap();

        let outcome = request.outcome(Ok(json!({"message": "Welcome aboard"})));
        assert_eq!(outcome, AuthOutcome::Registered("Welcome aboard".into()));

        let outcome = request.outcome(Ok(json!({})));
        assert_eq!(outcome, AuthOutcome::Registered(REGISTER_SUCCEEDED.into()));
    }
}
