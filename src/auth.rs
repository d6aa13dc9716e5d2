//! Session credentials for the AMS service.
//!
//! # Authentication Flow
//!
//! 1. POST username/password to `/login` with no credential attached
//! 2. Extract the session id from the `sid` response cookie
//! 3. Extract the user id from the JSON response body
//! 4. Present the session id as a cookie on every subsequent request
//!
//! A pre-established session id can be supplied instead, skipping the login
//! call entirely (the user id is then unknown).

use serde::{Deserialize, Serialize};

/// Credentials held by an authenticated [`AmsClient`](crate::client::AmsClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session token, presented as the `sid` cookie.
    pub sid: String,
    /// User identifier from the login response; `None` when the client was
    /// constructed from a pre-established session id.
    pub user_id: Option<String>,
}

/// Request body for `POST /login`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response body from `POST /login`.
///
/// The service has emitted the user id both as a number and as a string over
/// time, so it is accepted either way.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub user_id: serde_json::Value,
}

impl LoginResponse {
    pub fn user_id_string(&self) -> Option<String> {
        match &self.user_id {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_serializes_credentials() {
        let request = LoginRequest {
            username: "trader",
            password: "hunter2",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"username": "trader", "password": "hunter2"})
        );
    }

    #[test]
    fn test_login_response_accepts_string_user_id() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"user_id": "u-100"}"#).unwrap();
        assert_eq!(response.user_id_string().as_deref(), Some("u-100"));
    }

    #[test]
    fn test_login_response_accepts_numeric_user_id() {
        let response: LoginResponse = serde_json::from_str(r#"{"user_id": 100}"#).unwrap();
        assert_eq!(response.user_id_string().as_deref(), Some("100"));
    }
}
