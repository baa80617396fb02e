use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One notification out of a webhook callback batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub source: EventSource,
    pub reply_token: Option<String>,
    pub webhook_event_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    Message(MessagePayload),
    Postback { data: String },
    Beacon { hwid: String, beacon_type: String },
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Message(_) => "message",
            EventKind::Postback { .. } => "postback",
            EventKind::Beacon { .. } => "beacon",
            EventKind::Other(kind) => kind.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessagePayload {
    Text { id: String, text: String },
    Image { id: String },
    Other { id: String, kind: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventSource {
    User {
        user_id: String,
    },
    Group {
        group_id: String,
        user_id: Option<String>,
    },
    Room {
        room_id: String,
        user_id: Option<String>,
    },
    Unknown,
}

impl EventSource {
    /// The user id of a one-to-one source. Group and room members are not
    /// addressed directly.
    pub fn direct_user(&self) -> Option<&str> {
        match self {
            EventSource::User { user_id } => Some(user_id.as_str()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::User { .. } => "user",
            EventSource::Group { .. } => "group",
            EventSource::Room { .. } => "room",
            EventSource::Unknown => "unknown",
        }
    }
}
