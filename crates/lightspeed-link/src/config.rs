//! Runtime settings for the peer link, read from the environment.

use std::env;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wire protocol version sent in the handshake.
pub const PROTOCOL_VERSION: u32 = 1;

pub const DEFAULT_PORT: u16 = 62832;

pub const DEFAULT_INBOX_CAPACITY: usize = 256;

pub fn port() -> u16 {
    env::var("LIGHTSPEED_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Match seed chosen by the host. Falls back to the clock when unset.
pub fn seed() -> u64 {
    env::var("LIGHTSPEED_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        })
}

/// Orders buffered between the reader thread and the simulation.
pub fn inbox_capacity() -> usize {
    env::var("LIGHTSPEED_INBOX_CAPACITY")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_INBOX_CAPACITY)
}

pub fn frame_interval() -> Duration {
    let millis = env::var("LIGHTSPEED_FRAME_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(16);
    Duration::from_millis(millis.max(1))
}
