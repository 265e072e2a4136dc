//! Wire types for the session API
//!
//! All payloads are camelCase JSON. Single objects and lists are wrapped in a
//! `{ "data": ... }` envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a focus session
pub type SessionId = Uuid;

/// Envelope used by every successful response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Server-side status of a focus session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Working,
    Break,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Working or Break: the session still has a running phase
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Working | SessionStatus::Break)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Working => "Working",
            SessionStatus::Break => "Break",
            SessionStatus::Completed => "Completed",
            SessionStatus::Cancelled => "Cancelled",
        }
    }
}

/// A label attached to sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    /// Hex color such as `#ff8800`
    #[serde(default)]
    pub color: String,
}

/// Focus session as returned by the server (`FocusSessionResponseDto`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub id: SessionId,
    pub status: SessionStatus,
    /// End of the current phase. Absent once the session is terminal.
    #[serde(default)]
    pub current_state_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_cycles: u32,
    #[serde(default)]
    pub session_type_id: Option<Uuid>,
    #[serde(default)]
    pub custom_duration_seconds: Option<u64>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub to_do_item_id: Option<Uuid>,
}

impl FocusSession {
    /// Custom-duration sessions carry no session type
    pub fn is_custom(&self) -> bool {
        self.session_type_id.is_none()
    }

    /// Names of the attached tags
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name.clone()).collect()
    }
}

/// How long a new session runs: a preset or an ad hoc duration, never both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionLength {
    #[serde(rename = "sessionTypeId")]
    SessionType(Uuid),
    #[serde(rename = "customDurationSeconds")]
    Custom(u64),
}

/// Body of `POST /FocusSession`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(flatten)]
    pub length: SessionLength,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_do_item_id: Option<Uuid>,
}

/// Body of `PATCH /FocusSession/{id}/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: SessionStatus,
}

/// Preset bundling work/break durations and a cycle count (seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionType {
    pub id: Uuid,
    pub name: String,
    pub work_duration: u64,
    pub break_duration: u64,
    pub number_of_cycles: u32,
}

/// A planned task that can seed a custom session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub duration_minutes: Option<u64>,
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

/// Earned or available badge (display only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub earned_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_parsing() {
        let json = r##"{
            "id": "7b1e6f2a-3c4d-4e5f-8a9b-0c1d2e3f4a5b",
            "status": "Working",
            "currentStateEndTime": "2026-01-21T14:55:00Z",
            "completedCycles": 1,
            "sessionTypeId": "11111111-2222-3333-4444-555555555555",
            "customDurationSeconds": null,
            "tags": [{"id": "aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee", "name": "deep", "color": "#00ff00"}]
        }"##;

        let session: FocusSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.status, SessionStatus::Working);
        assert_eq!(session.completed_cycles, 1);
        assert!(!session.is_custom());
        assert_eq!(session.tag_names(), vec!["deep".to_string()]);
        assert_eq!(
            session.current_state_end_time.unwrap().to_rfc3339(),
            "2026-01-21T14:55:00+00:00"
        );
    }

    #[test]
    fn test_terminal_session_without_end_time() {
        let json = r#"{"id": "7b1e6f2a-3c4d-4e5f-8a9b-0c1d2e3f4a5b", "status": "Completed"}"#;
        let session: FocusSession = serde_json::from_str(json).unwrap();
        assert!(session.current_state_end_time.is_none());
        assert!(session.is_custom());
        assert!(!session.status.is_active());
    }

    #[test]
    fn test_create_request_with_session_type() {
        let id = Uuid::nil();
        let request = CreateSessionRequest {
            length: SessionLength::SessionType(id),
            tag_ids: vec![],
            to_do_item_id: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["sessionTypeId"], id.to_string());
        assert!(value.get("customDurationSeconds").is_none());
        assert!(value.get("tagIds").is_none());
        assert!(value.get("toDoItemId").is_none());
    }

    #[test]
    fn test_create_request_with_custom_duration() {
        let tag = Uuid::new_v4();
        let plan = Uuid::new_v4();
        let request = CreateSessionRequest {
            length: SessionLength::Custom(1500),
            tag_ids: vec![tag],
            to_do_item_id: Some(plan),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["customDurationSeconds"], 1500);
        assert!(value.get("sessionTypeId").is_none());
        assert_eq!(value["tagIds"][0], tag.to_string());
        assert_eq!(value["toDoItemId"], plan.to_string());
    }

    #[test]
    fn test_status_update_body() {
        let body = StatusUpdate {
            status: SessionStatus::Cancelled,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"status":"Cancelled"}"#
        );
    }
}
