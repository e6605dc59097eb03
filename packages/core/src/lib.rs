//! Core types for the session status client.
//!
//! This crate is transport- and UI-agnostic:
//! - Server events and the client action they answer to
//! - The display state and its pure reducer
//! - Socket.IO framing and the sans-IO session state machine
//! - Channel configuration and reconnect bookkeeping

mod config;
mod display;
mod events;
mod reconnect;
mod reducer;
mod session;
pub mod wire;

pub use config::{ChannelConfig, ConfigError};
pub use display::{ABSENT, DisplayState, DisplayView, Phase, Position, format_number, format_seconds};
pub use events::{ClientAction, QueueUpdate, ServerEvent, SessionStatus, SessionUpdate, TimerUpdate};
pub use reconnect::{ReconnectBudget, Retry};
pub use reducer::{messages, reduce};
pub use session::{SessionOutput, SocketSession};
pub use wire::WireError;
