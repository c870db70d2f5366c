//! Data types returned by the messaging service
//!
//! These mirror the service's wire representation. Nothing here is cached:
//! every shell command fetches fresh data, and the service stays
//! authoritative for all message and participant state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat-list entry (the service calls these dialogs)
///
/// Used only for resolving a display name to a chat identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    /// Service-assigned chat identifier
    pub id: i64,
    /// Display name shown in the chat list
    pub name: String,
}

/// A single message within a chat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Message identifier, unique within its chat
    pub id: i64,
    /// Identifier of the sending user
    pub from_id: i64,
    /// Text body; empty for media-only messages
    #[serde(default)]
    pub text: String,
    /// Service-assigned timestamp, absent for some system entries
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// A chat participant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Service-assigned user identifier
    pub id: i64,
    /// Public handle, if the user has one
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_message_deserializes_with_missing_optionals() {
        let json = r#"{"id": 7, "from_id": 42}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.id, 7);
        assert_eq!(message.from_id, 42);
        assert_eq!(message.text, "");
        assert!(message.date.is_none());
    }

    #[test]
    fn test_message_deserializes_rfc3339_date() {
        let json = r#"{"id": 1, "from_id": 2, "text": "hi", "date": "2024-03-01T12:30:00Z"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(message.date, Some(expected));
    }

    #[test]
    fn test_user_deserializes_with_null_names() {
        let json = r#"{"id": 9, "username": null, "first_name": "Ada"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 9);
        assert!(user.username.is_none());
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert!(user.last_name.is_none());
    }

    #[test]
    fn test_chat_roundtrip() {
        let chat = Chat {
            id: 3,
            name: "Team Chat".to_string(),
        };
        let json = serde_json::to_string(&chat).unwrap();
        let back: Chat = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chat);
    }
}
