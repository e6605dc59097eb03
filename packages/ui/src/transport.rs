//! Websocket transport, one implementation per target.
//!
//! Both implementations expose the same surface: open a socket, send a
//! text frame, wait for the next text frame, and sleep.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to open websocket: {0}")]
    Open(String),

    #[error("failed to send frame: {0}")]
    Send(String),

    #[error("websocket receive failed: {0}")]
    Receive(String),

    #[error("no frame from server within {0:?}")]
    Silent(Duration),
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use gloo_net::websocket::{Message, futures::WebSocket};

    use super::TransportError;

    pub struct Transport {
        socket: WebSocket,
    }

    impl Transport {
        pub async fn connect(url: &str) -> Result<Self, TransportError> {
            let socket = WebSocket::open(url).map_err(|e| TransportError::Open(e.to_string()))?;
            Ok(Self { socket })
        }

        pub async fn send(&mut self, frame: String) -> Result<(), TransportError> {
            self.socket
                .send(Message::Text(frame))
                .await
                .map_err(|e| TransportError::Send(e.to_string()))
        }

        /// Next text frame; `None` once the socket is closed.
        pub async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
            loop {
                match self.socket.next().await? {
                    Ok(Message::Text(text)) => return Some(Ok(text)),
                    Ok(Message::Bytes(_)) => continue,
                    Err(e) => return Some(Err(TransportError::Receive(e.to_string()))),
                }
            }
        }
    }

    pub async fn sleep(duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use tokio::net::TcpStream;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

    use super::TransportError;

    pub struct Transport {
        socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    }

    impl Transport {
        pub async fn connect(url: &str) -> Result<Self, TransportError> {
            let (socket, _response) = connect_async(url)
                .await
                .map_err(|e| TransportError::Open(e.to_string()))?;
            Ok(Self { socket })
        }

        pub async fn send(&mut self, frame: String) -> Result<(), TransportError> {
            self.socket
                .send(Message::Text(frame))
                .await
                .map_err(|e| TransportError::Send(e.to_string()))
        }

        /// Next text frame; `None` once the socket is closed.
        pub async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
            loop {
                match self.socket.next().await? {
                    Ok(Message::Text(text)) => return Some(Ok(text)),
                    Ok(Message::Close(_)) => return None,
                    // Pings are answered by tungstenite itself.
                    Ok(_) => continue,
                    Err(e) => return Some(Err(TransportError::Receive(e.to_string()))),
                }
            }
        }
    }

    pub async fn sleep(duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub use imp::{Transport, sleep};
