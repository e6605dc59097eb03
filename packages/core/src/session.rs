//! Sans-IO Socket.IO client session.
//!
//! Feed it every text frame the transport receives; it answers with frames
//! to write back and with [`ServerEvent`]s for the reducer. It never touches
//! a socket or a clock itself.

use std::time::Duration;

use crate::events::{ClientAction, ServerEvent};
use crate::wire::{
    self, DEFAULT_NAMESPACE, EnginePacket, Handshake, SocketPacket, SocketPacketKind, WireError,
};

/// What the transport loop should do after a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutput {
    /// Write this frame to the transport.
    Send(String),
    /// Hand this event to the reducer.
    Event(ServerEvent),
    /// The server sent an event this client does not handle.
    Unhandled(String),
    /// Drop the transport; the reconnect loop takes over.
    Close(String),
}

/// Connection-level state of one transport.
#[derive(Debug, Default)]
pub struct SocketSession {
    handshake: Option<Handshake>,
    joined: bool,
}

impl SocketSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the default namespace has been joined.
    pub fn is_joined(&self) -> bool {
        self.joined
    }

    pub fn handshake(&self) -> Option<&Handshake> {
        self.handshake.as_ref()
    }

    /// Longest silence tolerated before the server is considered gone.
    ///
    /// `None` until the transport has opened.
    pub fn liveness_window(&self) -> Option<Duration> {
        self.handshake
            .as_ref()
            .map(|h| Duration::from_millis(h.ping_interval.saturating_add(h.ping_timeout)))
    }

    /// Process one text frame.
    pub fn handle_frame(&mut self, frame: &str) -> Result<Vec<SessionOutput>, WireError> {
        let outputs = match EnginePacket::decode(frame)? {
            EnginePacket::Open(handshake) => {
                self.handshake = Some(handshake);
                vec![SessionOutput::Send(wire::encode_connect(DEFAULT_NAMESPACE))]
            }
            EnginePacket::Ping(data) => vec![SessionOutput::Send(wire::encode_pong(data))],
            EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => Vec::new(),
            EnginePacket::Close => {
                let mut outputs: Vec<_> = self.leave().into_iter().collect();
                outputs.push(SessionOutput::Close("server closed the transport".to_string()));
                outputs
            }
            EnginePacket::Message(body) => self.handle_packet(SocketPacket::decode(body)?)?,
        };
        Ok(outputs)
    }

    fn handle_packet(&mut self, packet: SocketPacket) -> Result<Vec<SessionOutput>, WireError> {
        if packet.namespace != DEFAULT_NAMESPACE {
            return Ok(Vec::new());
        }

        let outputs = match packet.kind {
            SocketPacketKind::Connect => {
                self.joined = true;
                vec![SessionOutput::Event(ServerEvent::Connect)]
            }
            SocketPacketKind::Disconnect => {
                let mut outputs: Vec<_> = self.leave().into_iter().collect();
                outputs.push(SessionOutput::Close("server left the namespace".to_string()));
                outputs
            }
            SocketPacketKind::ConnectError => {
                let reason = packet
                    .error_message()
                    .unwrap_or("connection refused")
                    .to_string();
                vec![SessionOutput::Close(reason)]
            }
            SocketPacketKind::Event => {
                let (name, payload) = packet.into_event()?;
                match ServerEvent::from_wire(&name, payload) {
                    Some(event) => vec![SessionOutput::Event(event)],
                    None => vec![SessionOutput::Unhandled(name)],
                }
            }
            SocketPacketKind::Ack | SocketPacketKind::BinaryEvent | SocketPacketKind::BinaryAck => {
                Vec::new()
            }
        };
        Ok(outputs)
    }

    /// Frame for an outbound action.
    ///
    /// Returns `None` while not joined: actions are fire-and-forget and are
    /// not buffered across reconnects.
    pub fn request(&self, action: ClientAction) -> Result<Option<String>, WireError> {
        if !self.joined {
            return Ok(None);
        }
        wire::encode_event(action.name(), &[]).map(Some)
    }

    /// The transport went away. Yields a disconnect if the namespace was joined.
    pub fn transport_lost(&mut self) -> Option<ServerEvent> {
        self.handshake = None;
        self.leave().and_then(|output| match output {
            SessionOutput::Event(event) => Some(event),
            _ => None,
        })
    }

    fn leave(&mut self) -> Option<SessionOutput> {
        if std::mem::take(&mut self.joined) {
            Some(SessionOutput::Event(ServerEvent::Disconnect))
        } else {
            None
        }
    }
}
