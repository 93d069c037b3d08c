//! Wire Types
//!
//! Shapes of the two backend resources the loader reads, plus the bearer
//! credential it sends. Only `assigned_user_id` and `content` are required;
//! the remaining columns the backend returns are accepted when present.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user as the backend reports it.
///
/// The backend sends integer ids, but the loader only ever displays them,
/// so a string id is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Numeric(id) => write!(f, "{}", id),
            UserId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId::Numeric(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId::Text(id.to_string())
    }
}

/// `GET /users/assignment` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// The user the caller buys a gift for
    pub assigned_user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Assignment {
    pub fn new(assigned_user_id: impl Into<UserId>) -> Self {
        Self {
            assigned_user_id: assigned_user_id.into(),
            assignee_user_id: None,
            id: None,
            year: None,
            created_at: None,
        }
    }
}

/// One element of the `GET /tips/me` response array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Tip {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            id: None,
            year: None,
            subject_user_id: None,
            contributor_user_id: None,
            created_at: None,
        }
    }
}

/// Opaque bearer credential.
///
/// Sent unmodified as `Authorization: Bearer <token>`. Never refreshed or
/// inspected.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_from_backend_row() {
        let body = r#"{
            "id": 3,
            "year": 2024,
            "created_at": "2024-11-01T12:00:00",
            "assignee_user_id": 7,
            "assigned_user_id": 12
        }"#;

        let assignment: Assignment = serde_json::from_str(body).unwrap();
        assert_eq!(assignment.assigned_user_id, UserId::Numeric(12));
        assert_eq!(assignment.assignee_user_id, Some(UserId::Numeric(7)));
        assert_eq!(assignment.year, Some(2024));
    }

    #[test]
    fn test_assignment_requires_target() {
        let result: Result<Assignment, _> = serde_json::from_str(r#"{"year": 2024}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_string_user_id() {
        let assignment: Assignment =
            serde_json::from_str(r#"{"assigned_user_id": "alice"}"#).unwrap();
        assert_eq!(assignment.assigned_user_id.to_string(), "alice");
    }

    #[test]
    fn test_tips_minimal_shape() {
        let tips: Vec<Tip> =
            serde_json::from_str(r#"[{"content": "likes tea"}, {"content": "size M", "year": 2024}]"#)
                .unwrap();
        assert_eq!(tips.len(), 2);
        assert_eq!(tips[0].content, "likes tea");
        assert_eq!(tips[1].year, Some(2024));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("secret-value");
        assert_eq!(format!("{:?}", token), "AuthToken(***)");
        assert_eq!(token.bearer_header(), "Bearer secret-value");
    }
}
