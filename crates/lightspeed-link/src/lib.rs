//! Peer link for LIGHTSPEED.
//!
//! Carries orders between the two peers over a line-delimited JSON TCP
//! stream and drives a `Battlefield` from them. The simulation itself lives
//! in `lightspeed-sim`; nothing here changes game rules.

pub mod config;
pub mod connection;
pub mod error;
pub mod inbox;
pub mod session;
pub mod wire;

pub use connection::Connection;
pub use error::{LinkError, LinkResult};
pub use lightspeed_core as core;
pub use lightspeed_sim as sim;
pub use session::Session;
