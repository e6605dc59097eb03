//! Display state for the session status panel.

use serde_json::Number;

/// Placeholder rendered for any field that has no value in the current phase.
pub const ABSENT: &str = "—";

/// Mutually exclusive display mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Joined the server, no session requested yet.
    #[default]
    Connected,
    /// Waiting in line for a slot.
    Queued,
    /// Holding a slot.
    Active,
    /// The session is over.
    Ended,
    /// The channel lost the server and is retrying.
    Disconnected,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Connected => "connected",
            Phase::Queued => "queued",
            Phase::Active => "active",
            Phase::Ended => "ended",
            Phase::Disconnected => "disconnected",
        }
    }

    /// Text and style tag of the phase badge.
    ///
    /// An idle connection is labelled `active` and a lost link `ended`;
    /// [`Phase::as_str`] keeps the distinct names for logs.
    pub fn badge_tag(self) -> &'static str {
        match self {
            Phase::Connected | Phase::Active => "active",
            Phase::Queued => "queued",
            Phase::Ended | Phase::Disconnected => "ended",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queue position as the server sent it: a number or a non-empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    Number(Number),
    Text(String),
}

impl Position {
    /// Zero is falsy; every other position is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Position::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Position::Text(_) => true,
        }
    }
}

impl From<u64> for Position {
    fn from(n: u64) -> Self {
        Position::Number(n.into())
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Number(n) => f.write_str(&format_number(n)),
            Position::Text(text) => f.write_str(text),
        }
    }
}

/// Everything the status panel shows.
///
/// Produced by [`crate::reduce`]; never edited by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub phase: Phase,
    pub status_message: Option<String>,
    /// Seconds left in the session. Only meaningful while active or ended.
    pub time_remaining: Option<Number>,
    /// Place in line. Only meaningful while queued.
    pub queue_position: Option<Position>,
    /// Opaque queue ticket, kept while queued and when promoted from the queue.
    pub queue_token: Option<String>,
    /// Estimated seconds until a slot frees up.
    pub queue_wait: Option<Number>,
    /// Last result handed out by the server. Survives phase changes.
    pub result_artifact: Option<String>,
}

/// String projection of a [`DisplayState`], ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayView {
    pub phase_label: String,
    /// Class list for the badge, e.g. `badge queued`.
    pub badge_class: String,
    pub message: String,
    pub countdown: String,
    pub queue_position: String,
    pub queue_token: String,
    pub queue_wait: String,
    /// Shown as link text and used as the link target.
    pub artifact: Option<String>,
}

impl DisplayState {
    /// Project the state into display strings.
    pub fn view(&self) -> DisplayView {
        DisplayView {
            phase_label: self.phase.badge_tag().to_string(),
            badge_class: format!("badge {}", self.phase.badge_tag()),
            message: self.status_message.clone().unwrap_or_default(),
            countdown: format_seconds(self.time_remaining.as_ref()),
            queue_position: self
                .queue_position
                .as_ref()
                .map_or_else(|| ABSENT.to_string(), ToString::to_string),
            queue_token: self
                .queue_token
                .clone()
                .unwrap_or_else(|| ABSENT.to_string()),
            queue_wait: format_seconds(self.queue_wait.as_ref()),
            artifact: self.result_artifact.clone(),
        }
    }
}

/// Render a seconds value as `<n>s`, or the absence marker.
///
/// The value is printed as sent: no rounding, no clamping.
pub fn format_seconds(seconds: Option<&Number>) -> String {
    match seconds {
        Some(secs) => format!("{}s", format_number(secs)),
        None => ABSENT.to_string(),
    }
}

/// Print a JSON number the way a browser does: `30`, `2.5`, `-3`.
pub fn format_number(n: &Number) -> String {
    if !n.is_f64() {
        return n.to_string();
    }
    match n.as_f64() {
        // Negative zero prints as `0`.
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use serde_json::json;

    fn number(value: serde_json::Value) -> Number {
        match value {
            serde_json::Value::Number(n) => n,
            other => panic!("not a number: {other}"),
        }
    }

    #[test]
    fn empty_state_renders_absence_markers() {
        let view = DisplayState::default().view();
        assert_eq!(view.phase_label, "active");
        assert_eq!(view.badge_class, "badge active");
        assert_eq!(view.message, "");
        assert_eq!(view.countdown, ABSENT);
        assert_eq!(view.queue_position, ABSENT);
        assert_eq!(view.queue_token, ABSENT);
        assert_eq!(view.queue_wait, ABSENT);
        assert_eq!(view.artifact, None);
    }

    #[test]
    fn zero_seconds_is_not_absent() {
        assert_eq!(format_seconds(Some(&Number::from(0))), "0s");
        assert_eq!(format_seconds(None), "—");
    }

    #[test]
    fn seconds_render_like_a_browser() {
        assert_eq!(format_seconds(Some(&number(json!(30)))), "30s");
        assert_eq!(format_seconds(Some(&number(json!(30.0)))), "30s");
        assert_eq!(format_seconds(Some(&number(json!(2.5)))), "2.5s");
        assert_eq!(format_seconds(Some(&number(json!(-3)))), "-3s");
        assert_eq!(format_seconds(Some(&number(json!(-0.0)))), "0s");
    }

    #[test]
    fn position_truthiness() {
        assert!(!Position::from(0).is_truthy());
        assert!(!Position::Number(number(json!(0.0))).is_truthy());
        assert!(Position::from(3).is_truthy());
        assert!(Position::Number(number(json!(-1.5))).is_truthy());
        assert!(Position::Text("0".to_string()).is_truthy());
        assert_eq!(Position::Number(number(json!(2.0))).to_string(), "2");
        assert_eq!(Position::Text("3".to_string()).to_string(), "3");
    }

    #[test]
    fn badge_label_matches_its_style_tag() {
        let connected = DisplayState::default().view();
        assert_eq!(connected.phase_label, "active");

        let lost = DisplayState {
            phase: Phase::Disconnected,
            ..DisplayState::default()
        }
        .view();
        assert_eq!(lost.phase_label, "ended");
        assert_eq!(lost.badge_class, "badge ended");
    }

    #[test]
    fn badge_tags() {
        assert_eq!(Phase::Queued.badge_tag(), "queued");
        assert_eq!(Phase::Disconnected.badge_tag(), "ended");
        assert_eq!(Phase::Disconnected.to_string(), "disconnected");
    }
}
