//! Pure state transitions for the status display.

use serde_json::Number;

use crate::display::{DisplayState, Phase, Position};
use crate::events::{QueueUpdate, ServerEvent, SessionStatus, SessionUpdate, TimerUpdate};

/// Fixed status lines.
pub mod messages {
    pub const CONNECT_PROMPT: &str = "Connected. Click the button to request text.";
    pub const DISCONNECTED: &str = "Disconnected from server.";
    pub const ACTIVE: &str = "Text is ready.";
    pub const QUEUED: &str = "Waiting for a slot…";
    pub const ENDED: &str = "Session ended.";
    pub const CONNECTED: &str = "Connected. Click the button to ask for text.";
}

/// `source` value marking a slot that was granted from the waiting line.
const QUEUE_SOURCE: &str = "queue";

/// Compute the display state that follows `event`.
///
/// Absent payload fields never clear anything on their own; clearing only
/// happens through the per-event rules below.
pub fn reduce(state: &DisplayState, event: &ServerEvent) -> DisplayState {
    let mut next = state.clone();
    match event {
        ServerEvent::Connect => next.on_connect(),
        ServerEvent::Disconnect => next.on_disconnect(),
        ServerEvent::SessionUpdate(update) => next.on_session_update(update),
        ServerEvent::TimerUpdate(update) => next.on_timer_update(update),
        ServerEvent::QueueUpdate(update) => next.on_queue_update(update),
    }
    next
}

impl DisplayState {
    fn enter(&mut self, phase: Phase, message: Option<&str>, default_message: &str) {
        self.phase = phase;
        self.status_message = Some(message.unwrap_or(default_message).to_string());
    }

    /// Drop every timer and queue field. The artifact is kept.
    fn clear_session_fields(&mut self) {
        self.time_remaining = None;
        self.queue_position = None;
        self.queue_token = None;
        self.queue_wait = None;
    }

    fn on_connect(&mut self) {
        self.enter(Phase::Connected, None, messages::CONNECT_PROMPT);
        self.clear_session_fields();
    }

    fn on_disconnect(&mut self) {
        self.enter(Phase::Disconnected, None, messages::DISCONNECTED);
        self.clear_session_fields();
    }

    fn on_session_update(&mut self, update: &SessionUpdate) {
        let message = update.message.as_deref();
        match update.status {
            SessionStatus::Active => {
                self.enter(Phase::Active, message, messages::ACTIVE);
                if let Some(secs) = &update.time_remaining {
                    self.time_remaining = Some(secs.clone());
                }
                if let Some(text) = &update.text {
                    self.result_artifact = Some(text.clone());
                }
                self.queue_position = None;
                self.queue_token = match update.source.as_deref() {
                    Some(QUEUE_SOURCE) => update.token.clone(),
                    _ => None,
                };
                self.queue_wait = None;
            }
            SessionStatus::Queued => {
                self.enter(Phase::Queued, message, messages::QUEUED);
                if let Some(position) = truthy(&update.position) {
                    self.queue_position = Some(position.clone());
                }
                self.queue_token = update.token.clone();
                self.queue_wait = update.wait_seconds.clone();
                self.time_remaining = None;
            }
            SessionStatus::Ended => {
                self.enter(Phase::Ended, message, messages::ENDED);
                self.time_remaining = Some(Number::from(0u64));
                self.queue_token = None;
                self.queue_wait = None;
            }
            SessionStatus::Connected => {
                self.enter(Phase::Connected, message, messages::CONNECTED);
                self.queue_wait = None;
            }
            SessionStatus::Unknown => {}
        }

        // Late position data wins over the per-status rule, whatever the tag.
        if let Some(position) = truthy(&update.position) {
            self.queue_position = Some(position.clone());
        }
    }

    fn on_timer_update(&mut self, update: &TimerUpdate) {
        if let Some(secs) = &update.time_remaining {
            self.time_remaining = Some(secs.clone());
        }
    }

    fn on_queue_update(&mut self, update: &QueueUpdate) {
        // Presence, not truthiness: a position of zero is applied here.
        if let Some(position) = &update.position {
            self.queue_position = position.clone();
        }
        if let Some(token) = &update.token {
            self.queue_token = Some(token.clone());
            self.enter(Phase::Queued, None, messages::QUEUED);
        }
        self.queue_wait = update.wait_seconds.clone();
    }
}

/// Zero counts as "no position" in `session_update`.
fn truthy(position: &Option<Position>) -> Option<&Position> {
    position.as_ref().filter(|p| p.is_truthy())
}
