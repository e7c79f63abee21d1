use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::DomainError;

/// Kind of engagement event.
///
/// Ingestion accepts any non-empty kind; unrecognized kinds are stored as
/// `Other` and ignored by every counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    View,
    Like,
    Share,
    Comment,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::View => "view",
            EventKind::Like => "like",
            EventKind::Share => "share",
            EventKind::Comment => "comment",
            EventKind::Other(kind) => kind,
        }
    }
}

impl From<&str> for EventKind {
    fn from(kind: &str) -> Self {
        match kind {
            "view" => EventKind::View,
            "like" => EventKind::Like,
            "share" => EventKind::Share,
            "comment" => EventKind::Comment,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let kind = String::deserialize(deserializer)?;
        Ok(EventKind::from(kind.as_str()))
    }
}

/// Keys owned by the event envelope; stripped from client-supplied data.
const RESERVED_KEYS: [&str; 4] = ["eventId", "type", "timestamp", "postId"];

/// Append-only engagement record.
///
/// `post_id` is a loose reference: it is never checked against the post
/// table and may hold sentinel values such as `preview-post`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementEvent {
    #[serde(rename = "eventId")]
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Kind-specific fields (comment text and author, platform tag, ...).
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl EngagementEvent {
    /// Build an event from the raw ingestion shape `{type, data}`.
    pub fn from_submission(kind: &str, data: Option<Value>) -> Result<Self, DomainError> {
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(DomainError::Validation("Event type is required".to_string()));
        }

        let mut payload = match data {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(DomainError::Validation(
                    "Event data must be an object".to_string(),
                ));
            }
        };

        let post_id = match payload.get("postId") {
            Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
            _ => None,
        };
        for key in RESERVED_KEYS {
            payload.remove(key);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            kind: EventKind::from(kind),
            post_id,
            timestamp: Utc::now(),
            payload,
        })
    }

    pub fn targets(&self, post_id: &str) -> bool {
        self.post_id.as_deref() == Some(post_id)
    }

    pub fn is_comment(&self) -> bool {
        self.kind == EventKind::Comment
    }
}

/// Order events newest-first. Ties keep their relative order.
pub fn sort_newest_first(events: &mut [EngagementEvent]) {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submission_requires_kind() {
        let err = EngagementEvent::from_submission("  ", None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_submission_rejects_non_object_data() {
        let err = EngagementEvent::from_submission("view", Some(json!("p1"))).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_submission_extracts_post_id_and_keeps_payload() {
        let event = EngagementEvent::from_submission(
            "comment",
            Some(json!({"postId": "p1", "text": "nice", "author": "ann", "type": "spoof"})),
        )
        .unwrap();

        assert_eq!(event.kind, EventKind::Comment);
        assert_eq!(event.post_id.as_deref(), Some("p1"));
        assert_eq!(event.payload["text"], "nice");
        assert!(!event.payload.contains_key("postId"));
        assert!(!event.payload.contains_key("type"));
    }

    #[test]
    fn test_orphan_and_unknown_kinds_accepted() {
        let event = EngagementEvent::from_submission(
            "click",
            Some(json!({"postId": "preview-post"})),
        )
        .unwrap();
        assert_eq!(event.kind, EventKind::Other("click".to_string()));
        assert!(event.targets("preview-post"));
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let event = EngagementEvent::from_submission(
            "share",
            Some(json!({"postId": "p2", "platform": "twitter"})),
        )
        .unwrap();
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "share");
        assert_eq!(json["postId"], "p2");
        assert_eq!(json["platform"], "twitter");
        assert!(json.get("eventId").is_some());

        let back: EngagementEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
