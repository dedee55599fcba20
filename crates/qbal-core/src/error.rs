//! Error taxonomy: fatal configuration errors vs. per-tick transport errors.
//!
//! `ConfigError` is raised once at startup and never recovered. A
//! `TransportError` only ever costs the current tick (snapshot fetch) or the
//! current mutation (priority change); the rebalance loop keeps running.

use thiserror::Error;

/// Invalid tuning values. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tick_interval_secs must be non-zero")]
    ZeroTickInterval,

    #[error("full_check_interval_secs must be non-zero")]
    ZeroFullCheckInterval,

    #[error("full_check_interval_secs ({full}) must be an integer multiple of tick_interval_secs ({tick})")]
    IntervalMismatch { full: u64, tick: u64 },

    /// Slot positions are 1-based; 0 is never a valid slot.
    #[error("slot positions are 1-based, got 0 in {field}")]
    ZeroSlot { field: &'static str },

    #[error("invalid qb_host url: {0}")]
    InvalidHost(#[from] url::ParseError),
}

/// Any failure talking to the queue service, at snapshot or mutation time.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] curl::Error),

    #[error("{action} returned HTTP {status}")]
    Status { action: &'static str, status: u32 },

    /// The Web API answered the login request with something other than `Ok.`.
    #[error("login rejected (check qb_username/qb_password)")]
    AuthRejected,

    #[error("failed to decode torrent list: {0}")]
    Decode(#[from] serde_json::Error),
}
