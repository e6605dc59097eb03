//! Session page: connects the channel and renders its state.

use dioxus::prelude::*;
use session_core::{ChannelConfig, ClientAction, DisplayState};

use crate::channel::use_session_channel;
use crate::{PhaseBadge, StatusPanel};

const SESSION_CSS: Asset = asset!("/assets/styling/session.css");

/// Props for SessionPage component.
#[derive(Props, Clone, PartialEq)]
pub struct SessionPageProps {
    /// Where to reach the session server.
    pub config: ChannelConfig,
    /// Page heading.
    #[props(default = "Session".to_string())]
    pub title: String,
}

/// Full status page for one client session.
#[component]
pub fn SessionPage(props: SessionPageProps) -> Element {
    let (state, channel) = use_session_channel(props.config.clone());

    let current = state();
    let phase = current.as_ref().map(|s| s.phase);
    let view = current.as_ref().map(DisplayState::view);

    rsx! {
        document::Link { rel: "stylesheet", href: SESSION_CSS }
        div { class: "page-container",
            div { class: "page-header",
                h1 { class: "page-title", "{props.title}" }
                if let Some(phase) = phase {
                    PhaseBadge { phase }
                }
            }

            // Nothing to show until the first connect
            if let Some(view) = view {
                div { class: "card",
                    StatusPanel { view }
                    div { class: "card-actions",
                        button {
                            id: "request-btn",
                            class: "btn btn-primary",
                            onclick: move |_| channel.send(ClientAction::RequestText),
                            "Request text"
                        }
                    }
                }
            } else {
                div { class: "loading", "Connecting..." }
            }
        }
    }
}
