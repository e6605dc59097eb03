//! Status panel showing the message, timer, queue details and result.

use dioxus::prelude::*;
use session_core::DisplayView;

/// Props for StatusPanel component.
#[derive(Props, Clone, PartialEq)]
pub struct StatusPanelProps {
    /// Rendered display state.
    pub view: DisplayView,
}

/// Panel rendering every field of the display state.
#[component]
pub fn StatusPanel(props: StatusPanelProps) -> Element {
    let view = props.view;

    rsx! {
        div { class: "status-panel",
            p { id: "status-message", class: "status-message", "{view.message}" }

            dl { class: "status-fields",
                div { class: "status-field",
                    dt { "Time remaining" }
                    dd { id: "timer", class: "tabular-nums", "{view.countdown}" }
                }
                div { class: "status-field",
                    dt { "Queue position" }
                    dd { id: "queue-position", class: "tabular-nums", "{view.queue_position}" }
                }
                div { class: "status-field",
                    dt { "Queue token" }
                    dd { id: "queue-token", class: "mono", "{view.queue_token}" }
                }
                div { class: "status-field",
                    dt { "Estimated wait" }
                    dd { id: "queue-wait", class: "tabular-nums", "{view.queue_wait}" }
                }
            }

            div { class: "result",
                h2 { class: "result-title", "Result" }
                if let Some(ref artifact) = view.artifact {
                    a {
                        id: "text-output",
                        class: "result-link",
                        href: "{artifact}",
                        target: "_blank",
                        rel: "noopener noreferrer",
                        "{artifact}"
                    }
                } else {
                    p { class: "result-empty", "Nothing yet" }
                }
            }
        }
    }
}
