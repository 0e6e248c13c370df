//! A match in progress: one battlefield paired with one peer link.
//!
//! Local orders go to the peer and into the local battlefield through the
//! same `receive` call remote orders use, so both sides apply the same
//! stream. Clocks are wall-clock milliseconds since the Unix epoch on both
//! peers.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use lightspeed_core::error::OrderResult;
use lightspeed_core::orders::Order;
use lightspeed_sim::{Battlefield, BattlefieldConfig};

use crate::connection::Connection;
use crate::error::LinkError;
use crate::inbox::Inbox;

/// Current wall-clock time in engine time units.
pub fn wall_clock_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or_default()
}

pub struct Session {
    // Dropped before the connection so a blocked reader can exit.
    inbox: Inbox,
    connection: Connection,
    battlefield: Battlefield,
    linked: bool,
}

impl Session {
    /// Start a match on a freshly established link. Team and seed come
    /// from the handshake.
    pub fn new(connection: Connection, inbox: Inbox, start_time: f64) -> Self {
        let config = BattlefieldConfig {
            seed: connection.seed(),
            local_team: connection.team(),
            ..Default::default()
        };
        Self {
            inbox,
            battlefield: Battlefield::new(config, start_time),
            connection,
            linked: true,
        }
    }

    /// Apply whatever the peer sent, then advance to `now`.
    pub fn frame(&mut self, now: f64) {
        if self.linked {
            if let Err(e) = self.inbox.drain_into(&mut self.battlefield) {
                self.unlink(e);
            }
        }
        self.battlefield.update(now);
    }

    /// Issue a local order: send it to the peer and apply it here.
    pub fn issue(&mut self, order: Order) -> OrderResult {
        if self.linked {
            if let Err(e) = self.connection.send(&order) {
                self.unlink(e);
            }
        }
        self.battlefield.receive(order)
    }

    fn unlink(&mut self, error: LinkError) {
        warn!(%error, peer = %self.connection.peer(), "peer link lost");
        self.linked = false;
        self.battlefield.abandon(&error.to_string());
    }

    /// The battlefield's pending message, if any, dismissing it.
    pub fn take_message(&mut self) -> Option<String> {
        let message = self.battlefield.message();
        if message.is_empty() {
            return None;
        }
        let message = message.to_string();
        self.battlefield.dismiss_message();
        Some(message)
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }
}
