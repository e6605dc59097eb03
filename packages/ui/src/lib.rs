//! Shared UI for the session status client.

// Dioxus `rsx!` macro expands to unwraps internally; allow to avoid false positives.
#![allow(clippy::disallowed_methods)]

mod channel;
pub use channel::use_session_channel;

mod phase_badge;
pub use phase_badge::PhaseBadge;

mod status_panel;
pub use status_panel::StatusPanel;

mod session_page;
pub use session_page::SessionPage;

pub mod transport;
pub use transport::TransportError;
