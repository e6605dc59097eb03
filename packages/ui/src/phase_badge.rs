//! Phase badge component.

use dioxus::prelude::*;
use session_core::Phase;

/// Badge for displaying the session phase.
#[component]
pub fn PhaseBadge(phase: Phase) -> Element {
    let tag = phase.badge_tag();

    rsx! {
        span {
            id: "status-label",
            class: "badge {tag}",
            title: "{phase}",
            "{tag}"
        }
    }
}
