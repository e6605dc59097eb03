//! Event types exchanged with the session server.
//!
//! Payload decoding is lenient: a field with the wrong JSON type
//! decodes as absent instead of failing the whole event. Numbers are kept
//! exactly as sent, fractions and negatives included.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

use crate::display::{Position, format_number};

/// Status tag carried by a `session_update` payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// A slot was granted and the session is running.
    Active,
    /// All slots are busy and the client is waiting in line.
    Queued,
    /// The session ran out of time or was closed.
    Ended,
    /// The server confirmed the connection and reset the session.
    Connected,
    /// Missing, non-string, or unrecognized tag.
    #[default]
    Unknown,
}

impl SessionStatus {
    /// Map a wire tag to a status.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "active" => SessionStatus::Active,
            "queued" => SessionStatus::Queued,
            "ended" => SessionStatus::Ended,
            "connected" => SessionStatus::Connected,
            _ => SessionStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Queued => "queued",
            SessionStatus::Ended => "ended",
            SessionStatus::Connected => "connected",
            SessionStatus::Unknown => "unknown",
        }
    }
}

/// Payload of a `session_update` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionUpdate {
    #[serde(deserialize_with = "status_tag")]
    pub status: SessionStatus,
    /// Human-readable status line. Empty strings count as absent.
    #[serde(deserialize_with = "non_empty_string")]
    pub message: Option<String>,
    /// Result artifact (usually a URL). Empty strings count as absent.
    #[serde(deserialize_with = "non_empty_string")]
    pub text: Option<String>,
    #[serde(deserialize_with = "any_number")]
    pub time_remaining: Option<Number>,
    #[serde(deserialize_with = "non_empty_string")]
    pub token: Option<String>,
    /// How the slot was granted: `"queue"` when promoted from the waiting line.
    #[serde(deserialize_with = "any_string")]
    pub source: Option<String>,
    #[serde(deserialize_with = "any_number")]
    pub wait_seconds: Option<Number>,
    #[serde(deserialize_with = "position_value")]
    pub position: Option<Position>,
}

/// Payload of a `timer_update` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimerUpdate {
    #[serde(deserialize_with = "any_number")]
    pub time_remaining: Option<Number>,
}

/// Payload of a `queue_update` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueueUpdate {
    /// Outer `None` when the key is missing; `Some(None)` when it is present
    /// but not a usable number.
    #[serde(deserialize_with = "present_position")]
    pub position: Option<Option<Position>>,
    #[serde(deserialize_with = "non_empty_string")]
    pub token: Option<String>,
    #[serde(deserialize_with = "any_number")]
    pub wait_seconds: Option<Number>,
}

/// Events delivered by the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// The channel (re)joined the server.
    Connect,
    /// The channel lost the server.
    Disconnect,
    SessionUpdate(SessionUpdate),
    TimerUpdate(TimerUpdate),
    QueueUpdate(QueueUpdate),
}

impl ServerEvent {
    /// Decode a named server event.
    ///
    /// Returns `None` for event names this client does not handle. The
    /// lifecycle events `connect` and `disconnect` are produced by the
    /// session layer and are never accepted from the wire.
    pub fn from_wire(name: &str, payload: Value) -> Option<Self> {
        match name {
            "session_update" => Some(ServerEvent::SessionUpdate(payload_or_default(payload))),
            "timer_update" => Some(ServerEvent::TimerUpdate(payload_or_default(payload))),
            "queue_update" => Some(ServerEvent::QueueUpdate(payload_or_default(payload))),
            _ => None,
        }
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Connect => "connect",
            ServerEvent::Disconnect => "disconnect",
            ServerEvent::SessionUpdate(_) => "session_update",
            ServerEvent::TimerUpdate(_) => "timer_update",
            ServerEvent::QueueUpdate(_) => "queue_update",
        }
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            ServerEvent::Connect => "Channel connected".to_string(),
            ServerEvent::Disconnect => "Channel disconnected".to_string(),
            ServerEvent::SessionUpdate(update) => {
                format!("Session update: {}", update.status.as_str())
            }
            ServerEvent::TimerUpdate(update) => match &update.time_remaining {
                Some(secs) => format!("Timer update: {}s left", format_number(secs)),
                None => "Timer update: no value".to_string(),
            },
            ServerEvent::QueueUpdate(update) => match &update.position {
                Some(Some(position)) => format!("Queue update: position {}", position),
                _ => "Queue update".to_string(),
            },
        }
    }
}

/// Actions the client sends to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAction {
    /// Ask for a session slot. Carries no arguments.
    RequestText,
}

impl ClientAction {
    /// Wire name of the action.
    pub fn name(self) -> &'static str {
        match self {
            ClientAction::RequestText => "request_text",
        }
    }
}

fn payload_or_default<T: DeserializeOwned + Default>(payload: Value) -> T {
    // Non-object payloads behave like an empty object.
    serde_json::from_value(payload).unwrap_or_default()
}

fn status_tag<'de, D: Deserializer<'de>>(d: D) -> Result<SessionStatus, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(tag) => SessionStatus::parse(&tag),
        _ => SessionStatus::Unknown,
    })
}

fn non_empty_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn any_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// JSON cannot carry NaN or infinities, so every number here is finite.
fn any_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Number>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => Some(n),
        _ => None,
    })
}

fn position_value<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Position>, D::Error> {
    Ok(as_position(Value::deserialize(d)?))
}

fn present_position<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Option<Position>>, D::Error> {
    Ok(Some(as_position(Value::deserialize(d)?)))
}

fn as_position(value: Value) -> Option<Position> {
    match value {
        Value::Number(n) => Some(Position::Number(n)),
        Value::String(s) if !s.is_empty() => Some(Position::Text(s)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use serde_json::json;

    #[test]
    fn session_update_reads_camel_case_fields() {
        let event = ServerEvent::from_wire(
            "session_update",
            json!({
                "status": "queued",
                "position": 3,
                "token": "abc",
                "waitSeconds": 12,
                "queueSize": 7,
                "message": "All slots are busy. You've been queued."
            }),
        );
        let Some(ServerEvent::SessionUpdate(update)) = event else {
            panic!("expected a session update");
        };
        assert_eq!(update.status, SessionStatus::Queued);
        assert_eq!(update.position, Some(Position::from(3)));
        assert_eq!(update.token.as_deref(), Some("abc"));
        assert_eq!(update.wait_seconds, Some(Number::from(12)));
        assert_eq!(
            update.message.as_deref(),
            Some("All slots are busy. You've been queued.")
        );
    }

    #[test]
    fn wrong_types_decode_as_absent() {
        let event = ServerEvent::from_wire(
            "session_update",
            json!({
                "status": 4,
                "text": "",
                "timeRemaining": "soon",
                "token": null,
                "waitSeconds": [3],
                "position": { "n": 1 }
            }),
        );
        assert_eq!(
            event,
            Some(ServerEvent::SessionUpdate(SessionUpdate::default()))
        );
    }

    #[test]
    fn fractional_and_negative_numbers_are_kept() {
        let event = ServerEvent::from_wire(
            "session_update",
            json!({ "status": "queued", "waitSeconds": -3, "position": 1.5, "timeRemaining": 2.5 }),
        );
        let Some(ServerEvent::SessionUpdate(update)) = event else {
            panic!("expected a session update");
        };
        assert_eq!(update.wait_seconds.map(|n| format_number(&n)).as_deref(), Some("-3"));
        assert_eq!(update.time_remaining.map(|n| format_number(&n)).as_deref(), Some("2.5"));
        assert_eq!(update.position.map(|p| p.to_string()).as_deref(), Some("1.5"));
    }

    #[test]
    fn string_positions_are_kept() {
        let event = ServerEvent::from_wire("session_update", json!({ "position": "3" }));
        let Some(ServerEvent::SessionUpdate(update)) = event else {
            panic!("expected a session update");
        };
        assert_eq!(update.position, Some(Position::Text("3".to_string())));

        let event = ServerEvent::from_wire("session_update", json!({ "position": "" }));
        assert_eq!(
            event,
            Some(ServerEvent::SessionUpdate(SessionUpdate::default()))
        );
    }

    #[test]
    fn queue_update_distinguishes_missing_from_present_position() {
        let position_of = |payload: Value| match ServerEvent::from_wire("queue_update", payload) {
            Some(ServerEvent::QueueUpdate(update)) => update.position,
            other => panic!("expected a queue update, got {other:?}"),
        };

        assert_eq!(position_of(json!({ "waitSeconds": 5 })), None);
        assert_eq!(position_of(json!({ "position": 0 })), Some(Some(Position::from(0))));
        assert_eq!(position_of(json!({ "position": null })), Some(None));
    }

    #[test]
    fn non_object_payload_is_treated_as_empty() {
        assert_eq!(
            ServerEvent::from_wire("timer_update", Value::Null),
            Some(ServerEvent::TimerUpdate(TimerUpdate::default()))
        );
        assert_eq!(
            ServerEvent::from_wire("queue_update", json!([1, 2])),
            Some(ServerEvent::QueueUpdate(QueueUpdate::default()))
        );
    }

    #[test]
    fn unknown_and_reserved_names_are_rejected() {
        assert_eq!(ServerEvent::from_wire("chat", json!({})), None);
        assert_eq!(ServerEvent::from_wire("connect", json!({})), None);
        assert_eq!(ServerEvent::from_wire("disconnect", json!({})), None);
    }

    #[test]
    fn decoded_events_keep_their_wire_name() {
        for name in ["session_update", "timer_update", "queue_update"] {
            let event = ServerEvent::from_wire(name, json!({}));
            assert_eq!(event.map(|e| e.name()), Some(name));
        }
        assert_eq!(ServerEvent::Connect.name(), "connect");
        assert_eq!(ServerEvent::Disconnect.name(), "disconnect");
    }

    #[test]
    fn request_action_name() {
        assert_eq!(ClientAction::RequestText.name(), "request_text");
    }
}
