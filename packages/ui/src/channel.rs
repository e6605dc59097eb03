//! Event channel hook.
//!
//! Owns the websocket for the lifetime of the component, feeds frames
//! through a [`SocketSession`], and replaces the display state with the
//! reducer's output for every event.

use std::time::Duration;

use dioxus::prelude::*;
use futures_util::{FutureExt, StreamExt, pin_mut, select};
use session_core::{
    ChannelConfig, ClientAction, DisplayState, Retry, ServerEvent, SessionOutput, SocketSession,
    reduce,
};

use crate::transport::{self, Transport, TransportError};

/// How long to wait for the server's open packet.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(20);

/// How one connection ended.
enum Closed {
    /// The server or the socket ended it; reconnect.
    Remote(String),
    /// Nobody is listening for actions anymore; stop for good.
    Shutdown,
}

enum Step {
    Frame(Option<Result<String, TransportError>>),
    Action(Option<ClientAction>),
    Silent(Duration),
}

/// Connect to the session server and track its display state.
///
/// The returned signal stays `None` until the first `connect`. Send
/// [`ClientAction`]s through the returned coroutine.
pub fn use_session_channel(
    config: ChannelConfig,
) -> (Signal<Option<DisplayState>>, Coroutine<ClientAction>) {
    let state = use_signal(|| None::<DisplayState>);
    let actions = use_coroutine(move |actions: UnboundedReceiver<ClientAction>| {
        run_channel(config.clone(), actions, state)
    });
    (state, actions)
}

async fn run_channel(
    config: ChannelConfig,
    mut actions: UnboundedReceiver<ClientAction>,
    mut state: Signal<Option<DisplayState>>,
) {
    let url = match config.websocket_url() {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::error!("Channel disabled: {}", e);
            return;
        }
    };

    let mut budget = config.reconnect_budget();
    loop {
        tracing::info!("Connecting to {}", url);
        match Transport::connect(&url).await {
            Ok(transport) => {
                let mut session = SocketSession::new();
                let mut joined = false;
                let outcome = drive(transport, &mut session, &mut actions, &mut state, &mut joined).await;

                if let Some(event) = session.transport_lost() {
                    apply(&mut state, &event);
                }
                if joined {
                    budget.joined();
                }

                match outcome {
                    Ok(Closed::Shutdown) => {
                        tracing::info!("Channel shut down");
                        return;
                    }
                    Ok(Closed::Remote(reason)) => tracing::info!("Channel closed: {}", reason),
                    Err(e) => tracing::warn!("Channel lost: {}", e),
                }
            }
            Err(e) => tracing::warn!("Connection failed: {}", e),
        }

        match budget.next() {
            Retry::Attempt(n) => tracing::debug!("Reconnect attempt {}", n),
            Retry::GiveUp { attempts } => {
                tracing::warn!("Giving up after {} reconnect attempts", attempts);
                return;
            }
        }
        transport::sleep(config.reconnect_delay).await;
    }
}

async fn drive(
    mut transport: Transport,
    session: &mut SocketSession,
    actions: &mut UnboundedReceiver<ClientAction>,
    state: &mut Signal<Option<DisplayState>>,
    joined: &mut bool,
) -> Result<Closed, TransportError> {
    loop {
        let window = session.liveness_window().unwrap_or(HANDSHAKE_TIMEOUT);
        let step = {
            let frame = transport.next_frame().fuse();
            let timeout = transport::sleep(window).fuse();
            let mut action = actions.next();
            pin_mut!(frame, timeout);

            select! {
                frame = frame => Step::Frame(frame),
                action = action => Step::Action(action),
                _ = timeout => Step::Silent(window),
            }
        };

        match step {
            Step::Frame(None) => return Ok(Closed::Remote("socket closed".to_string())),
            Step::Frame(Some(Err(e))) => return Err(e),
            Step::Frame(Some(Ok(frame))) => {
                let outputs = match session.handle_frame(&frame) {
                    Ok(outputs) => outputs,
                    Err(e) => {
                        tracing::warn!("Skipping malformed frame: {}", e);
                        continue;
                    }
                };
                for output in outputs {
                    match output {
                        SessionOutput::Send(reply) => transport.send(reply).await?,
                        SessionOutput::Event(event) => {
                            if event == ServerEvent::Connect {
                                *joined = true;
                                if let Some(handshake) = session.handshake() {
                                    tracing::info!("Joined session {}", handshake.sid);
                                }
                            }
                            apply(state, &event);
                        }
                        SessionOutput::Unhandled(name) => {
                            tracing::debug!("Ignoring event {}", name);
                        }
                        SessionOutput::Close(reason) => return Ok(Closed::Remote(reason)),
                    }
                }
            }
            Step::Action(None) => return Ok(Closed::Shutdown),
            Step::Action(Some(action)) => match session.request(action) {
                Ok(Some(frame)) => transport.send(frame).await?,
                Ok(None) => tracing::warn!("Dropping {} while not connected", action.name()),
                Err(e) => tracing::warn!("Failed to encode {}: {}", action.name(), e),
            },
            Step::Silent(window) => return Err(TransportError::Silent(window)),
        }
    }
}

fn apply(state: &mut Signal<Option<DisplayState>>, event: &ServerEvent) {
    tracing::debug!(event = event.name(), "{}", event.description());
    let current = (*state.peek()).clone().unwrap_or_default();
    state.set(Some(reduce(&current, event)));
}
