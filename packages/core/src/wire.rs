//! Engine.IO v4 and Socket.IO v5 text framing.
//!
//! Only the websocket transport is supported, so every text frame carries
//! exactly one Engine.IO packet. Binary attachments are not decoded.

use serde::Deserialize;
use serde_json::Value;

/// Engine.IO protocol revision sent in the connection URL.
pub const ENGINE_PROTOCOL: u8 = 4;

/// Namespace every event of this client lives in.
pub const DEFAULT_NAMESPACE: &str = "/";

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("empty frame")]
    Empty,

    #[error("unknown engine packet type {0:?}")]
    UnknownEngineType(char),

    #[error("unknown socket packet type {0:?}")]
    UnknownSocketType(char),

    #[error("malformed attachment count")]
    AttachmentCount,

    #[error("malformed open handshake: {0}")]
    Handshake(#[source] serde_json::Error),

    #[error("malformed packet data: {0}")]
    Data(#[source] serde_json::Error),

    #[error("event packet is not a [name, ...args] array")]
    EventShape,
}

/// Parameters the server sends when the transport opens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings.
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong.
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

/// One Engine.IO packet, borrowing its data from the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket<'a> {
    Open(Handshake),
    Close,
    Ping(&'a str),
    Pong(&'a str),
    Message(&'a str),
    Upgrade,
    Noop,
}

impl<'a> EnginePacket<'a> {
    pub fn decode(frame: &'a str) -> Result<Self, WireError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(WireError::Empty)?;
        let data = chars.as_str();
        match kind {
            '0' => serde_json::from_str(data)
                .map(EnginePacket::Open)
                .map_err(WireError::Handshake),
            '1' => Ok(EnginePacket::Close),
            '2' => Ok(EnginePacket::Ping(data)),
            '3' => Ok(EnginePacket::Pong(data)),
            '4' => Ok(EnginePacket::Message(data)),
            '5' => Ok(EnginePacket::Upgrade),
            '6' => Ok(EnginePacket::Noop),
            other => Err(WireError::UnknownEngineType(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketPacketKind {
    Connect,
    Disconnect,
    Event,
    Ack,
    ConnectError,
    BinaryEvent,
    BinaryAck,
}

impl SocketPacketKind {
    fn from_char(c: char) -> Result<Self, WireError> {
        match c {
            '0' => Ok(SocketPacketKind::Connect),
            '1' => Ok(SocketPacketKind::Disconnect),
            '2' => Ok(SocketPacketKind::Event),
            '3' => Ok(SocketPacketKind::Ack),
            '4' => Ok(SocketPacketKind::ConnectError),
            '5' => Ok(SocketPacketKind::BinaryEvent),
            '6' => Ok(SocketPacketKind::BinaryAck),
            other => Err(WireError::UnknownSocketType(other)),
        }
    }

    fn is_binary(self) -> bool {
        matches!(self, SocketPacketKind::BinaryEvent | SocketPacketKind::BinaryAck)
    }
}

/// A Socket.IO packet carried inside an Engine.IO message.
#[derive(Debug, Clone, PartialEq)]
pub struct SocketPacket {
    pub kind: SocketPacketKind,
    pub namespace: String,
    pub ack_id: Option<u64>,
    pub data: Option<Value>,
}

impl SocketPacket {
    /// Decode the body of an Engine.IO message packet.
    pub fn decode(body: &str) -> Result<Self, WireError> {
        let mut chars = body.chars();
        let kind = SocketPacketKind::from_char(chars.next().ok_or(WireError::Empty)?)?;
        let mut rest = chars.as_str();

        if kind.is_binary() {
            let (count, after) = rest.split_once('-').ok_or(WireError::AttachmentCount)?;
            if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
                return Err(WireError::AttachmentCount);
            }
            rest = after;
        }

        let namespace = if rest.starts_with('/') {
            match rest.split_once(',') {
                Some((nsp, after)) => {
                    rest = after;
                    nsp.to_string()
                }
                None => {
                    let nsp = rest.to_string();
                    rest = "";
                    nsp
                }
            }
        } else {
            DEFAULT_NAMESPACE.to_string()
        };

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let ack_id = if digits > 0 {
            let id = rest[..digits].parse().ok();
            rest = &rest[digits..];
            id
        } else {
            None
        };

        let data = if rest.is_empty() {
            None
        } else {
            Some(serde_json::from_str(rest).map_err(WireError::Data)?)
        };

        Ok(Self {
            kind,
            namespace,
            ack_id,
            data,
        })
    }

    /// Split an event packet into its name and first argument.
    ///
    /// A missing argument comes back as `Value::Null`.
    pub fn into_event(self) -> Result<(String, Value), WireError> {
        let Some(Value::Array(items)) = self.data else {
            return Err(WireError::EventShape);
        };
        let mut items = items.into_iter();
        let Some(Value::String(name)) = items.next() else {
            return Err(WireError::EventShape);
        };
        Ok((name, items.next().unwrap_or(Value::Null)))
    }

    /// `message` field of a CONNECT_ERROR payload, if any.
    pub fn error_message(&self) -> Option<&str> {
        match &self.data {
            Some(Value::String(message)) => Some(message.as_str()),
            Some(data) => data.get("message").and_then(Value::as_str),
            None => None,
        }
    }
}

/// Join a namespace.
pub fn encode_connect(namespace: &str) -> String {
    if namespace == DEFAULT_NAMESPACE {
        "40".to_string()
    } else {
        format!("40{},", namespace)
    }
}

/// Answer a server ping, echoing its data.
pub fn encode_pong(data: &str) -> String {
    format!("3{}", data)
}

/// Emit an event on the default namespace.
pub fn encode_event(name: &str, args: &[Value]) -> Result<String, WireError> {
    let mut items = Vec::with_capacity(args.len() + 1);
    items.push(Value::String(name.to_string()));
    items.extend_from_slice(args);
    let json = serde_json::to_string(&items).map_err(WireError::Data)?;
    Ok(format!("42{}", json))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_open_handshake() -> Result<(), WireError> {
        let frame = r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;
        let EnginePacket::Open(handshake) = EnginePacket::decode(frame)? else {
            panic!("expected open packet");
        };
        assert_eq!(handshake.sid, "lv_VI97HAXpY6yYWAAAC");
        assert_eq!(handshake.ping_interval, 25000);
        assert_eq!(handshake.ping_timeout, 20000);
        assert_eq!(handshake.max_payload, Some(1_000_000));
        Ok(())
    }

    #[test]
    fn decodes_control_packets() -> Result<(), WireError> {
        assert_eq!(EnginePacket::decode("1")?, EnginePacket::Close);
        assert_eq!(EnginePacket::decode("2")?, EnginePacket::Ping(""));
        assert_eq!(EnginePacket::decode("2heartbeat")?, EnginePacket::Ping("heartbeat"));
        assert_eq!(EnginePacket::decode("6")?, EnginePacket::Noop);
        assert!(matches!(EnginePacket::decode(""), Err(WireError::Empty)));
        assert!(matches!(
            EnginePacket::decode("9"),
            Err(WireError::UnknownEngineType('9'))
        ));
        Ok(())
    }

    #[test]
    fn decodes_event_with_payload() -> Result<(), WireError> {
        let EnginePacket::Message(body) =
            EnginePacket::decode(r#"42["timer_update",{"status":"active","timeRemaining":41}]"#)?
        else {
            panic!("expected message packet");
        };
        let packet = SocketPacket::decode(body)?;
        assert_eq!(packet.kind, SocketPacketKind::Event);
        assert_eq!(packet.namespace, "/");
        assert_eq!(packet.ack_id, None);
        let (name, payload) = packet.into_event()?;
        assert_eq!(name, "timer_update");
        assert_eq!(payload, json!({ "status": "active", "timeRemaining": 41 }));
        Ok(())
    }

    #[test]
    fn decodes_namespace_and_ack_id() -> Result<(), WireError> {
        let packet = SocketPacket::decode(r#"2/admin,13["ping"]"#)?;
        assert_eq!(packet.namespace, "/admin");
        assert_eq!(packet.ack_id, Some(13));
        assert_eq!(packet.into_event()?, ("ping".to_string(), Value::Null));
        Ok(())
    }

    #[test]
    fn decodes_connect_ack_and_error() -> Result<(), WireError> {
        let ack = SocketPacket::decode(r#"0{"sid":"abc"}"#)?;
        assert_eq!(ack.kind, SocketPacketKind::Connect);
        assert_eq!(ack.data, Some(json!({ "sid": "abc" })));

        let refused = SocketPacket::decode(r#"4{"message":"Not authorized"}"#)?;
        assert_eq!(refused.kind, SocketPacketKind::ConnectError);
        assert_eq!(refused.error_message(), Some("Not authorized"));
        Ok(())
    }

    #[test]
    fn binary_event_header_is_skipped() -> Result<(), WireError> {
        let packet = SocketPacket::decode(r#"51-["upload",{"_placeholder":true,"num":0}]"#)?;
        assert_eq!(packet.kind, SocketPacketKind::BinaryEvent);
        assert!(matches!(
            SocketPacket::decode("5x-[]"),
            Err(WireError::AttachmentCount)
        ));
        Ok(())
    }

    #[test]
    fn event_shape_is_checked() -> Result<(), WireError> {
        let packet = SocketPacket::decode(r#"2{"not":"an array"}"#)?;
        assert!(matches!(packet.into_event(), Err(WireError::EventShape)));
        let packet = SocketPacket::decode("2[7]")?;
        assert!(matches!(packet.into_event(), Err(WireError::EventShape)));
        Ok(())
    }

    #[test]
    fn encodes_client_frames() -> Result<(), WireError> {
        assert_eq!(encode_connect("/"), "40");
        assert_eq!(encode_connect("/admin"), "40/admin,");
        assert_eq!(encode_pong(""), "3");
        assert_eq!(encode_pong("heartbeat"), "3heartbeat");
        assert_eq!(encode_event("request_text", &[])?, r#"42["request_text"]"#);
        Ok(())
    }
}
