//! Channel configuration.

use std::time::Duration;

use url::Url;

use crate::reconnect::ReconnectBudget;
use crate::wire::ENGINE_PROTOCOL;

const DEFAULT_SERVER_URL: &str = "http://localhost:81";
const DEFAULT_SOCKET_PATH: &str = "/socket.io";
const DEFAULT_RECONNECT_DELAY_MS: u64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid channel config: {0}")]
    InvalidConfig(String),

    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),
}

/// Where the event channel connects and how it retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Base URL of the server (`http`, `https`, `ws` or `wss`).
    pub server_url: String,
    /// Engine.IO endpoint path on that server.
    pub socket_path: String,
    /// Fixed pause between reconnect attempts.
    pub reconnect_delay: Duration,
    /// Attempts after the first connection; `None` retries forever.
    pub reconnect_attempts: Option<u32>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

impl ChannelConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            socket_path: DEFAULT_SOCKET_PATH.to_string(),
            reconnect_delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
            reconnect_attempts: None,
        }
    }

    /// Config for a page served from `origin` at `pathname`.
    ///
    /// A page under a sub-path talks to `<sub-path>/socket.io`.
    pub fn for_page(origin: &str, pathname: &str) -> Self {
        Self::new(origin).with_socket_path(socket_path_for(pathname))
    }

    pub fn with_socket_path(mut self, socket_path: impl Into<String>) -> Self {
        self.socket_path = socket_path.into();
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_reconnect_attempts(mut self, attempts: Option<u32>) -> Self {
        self.reconnect_attempts = attempts;
        self
    }

    /// Build a config from environment variables.
    ///
    /// - `SESSION_SERVER_URL` (default: `http://localhost:81`)
    /// - `SESSION_SOCKET_PATH` (default: `/socket.io`)
    /// - `SESSION_RECONNECT_DELAY_MS` (default: `1000`)
    /// - `SESSION_RECONNECT_ATTEMPTS` (default: unlimited)
    ///
    /// Empty values count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ChannelConfig::from_env`], reading from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).and_then(non_empty);

        let mut cfg = Self::new(
            read("SESSION_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
        );
        if let Some(path) = read("SESSION_SOCKET_PATH") {
            cfg.socket_path = path;
        }
        if let Some(ms) = parse_u64("SESSION_RECONNECT_DELAY_MS", read("SESSION_RECONNECT_DELAY_MS"))? {
            cfg.reconnect_delay = Duration::from_millis(ms);
        }
        if let Some(attempts) =
            parse_u64("SESSION_RECONNECT_ATTEMPTS", read("SESSION_RECONNECT_ATTEMPTS"))?
        {
            let attempts = u32::try_from(attempts).map_err(|_| {
                ConfigError::InvalidConfig(format!(
                    "SESSION_RECONNECT_ATTEMPTS={attempts} is out of range"
                ))
            })?;
            cfg.reconnect_attempts = Some(attempts);
        }

        cfg.websocket_url()?;
        Ok(cfg)
    }

    /// Websocket URL of the Engine.IO endpoint.
    pub fn websocket_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.server_url)?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(ConfigError::InvalidConfig(format!(
                    "unsupported scheme {other} (expected http|https|ws|wss)"
                )));
            }
        };
        url.set_scheme(scheme).map_err(|()| {
            ConfigError::InvalidConfig(format!("cannot switch {} to {scheme}", self.server_url))
        })?;

        let path = self.socket_path.trim_matches('/');
        if path.is_empty() {
            url.set_path("/");
        } else {
            url.set_path(&format!("/{path}/"));
        }
        url.set_query(Some(&format!(
            "EIO={ENGINE_PROTOCOL}&transport=websocket"
        )));
        url.set_fragment(None);
        Ok(url)
    }

    /// Fresh attempt counter for the reconnect loop.
    pub fn reconnect_budget(&self) -> ReconnectBudget {
        ReconnectBudget::new(self.reconnect_attempts)
    }
}

/// Socket path for a page at `pathname`: one trailing slash is dropped and
/// the remainder is used as the base.
pub fn socket_path_for(pathname: &str) -> String {
    let base = pathname.strip_suffix('/').unwrap_or(pathname);
    if base.is_empty() {
        DEFAULT_SOCKET_PATH.to_string()
    } else {
        format!("{base}{DEFAULT_SOCKET_PATH}")
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_u64(var_name: &str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    value
        .map(|v| {
            v.parse().map_err(|_| {
                ConfigError::InvalidConfig(format!(
                    "invalid number for {var_name}={v} (expected a non-negative integer)"
                ))
            })
        })
        .transpose()
}
