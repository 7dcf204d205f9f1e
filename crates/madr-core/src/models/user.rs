use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{CheckRequest, Validate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }

    /// Name to greet the user with, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl CheckRequest for LoginRequest {
    const FIELDS: &'static [&'static str] = &["username", "password"];
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"access_token":"abc","refresh_token":"def","token_type":"Bearer","expires_in":900,"user":{"id":1,"username":"admin","email":"admin@madr.id","name":"","role":"admin","is_active":true}}"#;
        let resp: LoginResponse = serde_json::from_str(json).expect("valid login response");
        assert_eq!(resp.access_token, "abc");
        assert_eq!(resp.expires_in, Some(900));
        assert!(resp.user.is_admin());
        assert_eq!(resp.user.display_name(), "admin");
    }

    #[test]
    fn test_login_request_validation() {
        let req = LoginRequest {
            username: String::new(),
            password: String::new(),
        };
        let errors = req.check().unwrap_err();
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(errors.for_field("password"), Some("Password is required"));
    }
}
