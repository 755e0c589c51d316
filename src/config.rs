use std::env;
use std::net::{AddrParseError, SocketAddr};
use tracing_subscriber::EnvFilter;

pub const HTTP_ADDR_ENV: &str = "GANTT_TOOL_HTTP_ADDR";
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_LOG_FILTER: &str = "gantt_tool=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub addr: SocketAddr,
}

impl HttpConfig {
    /// Read the listen address from `GANTT_TOOL_HTTP_ADDR`.
    pub fn from_env() -> Result<Self, AddrParseError> {
        Self::from_addr(env::var(HTTP_ADDR_ENV).ok().as_deref())
    }

    /// `None` or a blank value falls back to [`DEFAULT_HTTP_ADDR`].
    pub fn from_addr(addr: Option<&str>) -> Result<Self, AddrParseError> {
        let raw = addr
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_HTTP_ADDR);
        Ok(Self { addr: raw.parse()? })
    }
}

/// Install the global fmt subscriber. `RUST_LOG` overrides
/// [`DEFAULT_LOG_FILTER`].
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
