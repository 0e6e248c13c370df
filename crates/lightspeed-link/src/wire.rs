//! Wire format: one JSON object per line.
//!
//! The host opens with `{"type":"Hello","version":1,"seed":N}`; every
//! line after that is an order, e.g.
//! `{"type":"Order","ship":0,"kind":{"action":"Move"},"x":1.0,"y":2.0,"time":3.0}`.

use serde::{Deserialize, Serialize};

use lightspeed_core::orders::Order;

use crate::error::LinkResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PeerMessage {
    Hello { version: u32, seed: u64 },
    Order(Order),
}

/// Encode a message as a single line, newline included.
pub fn encode(message: &PeerMessage) -> LinkResult<String> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

pub fn decode(line: &str) -> LinkResult<PeerMessage> {
    Ok(serde_json::from_str(line.trim_end())?)
}
