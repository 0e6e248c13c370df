//! Hand-off of remote orders from the reader thread to the simulation.
//!
//! The reader thread owns the sending half of a bounded channel. The
//! simulation drains the receiving half once per frame, applying orders in
//! arrival order. A dropped sender means the peer is gone.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use tracing::debug;

use lightspeed_core::orders::Order;
use lightspeed_sim::Battlefield;

use crate::error::{LinkError, LinkResult};

/// Create a connected sender/inbox pair holding at most `capacity` orders.
pub fn inbox(capacity: usize) -> (Sender<Order>, Inbox) {
    let (tx, rx) = bounded(capacity);
    (tx, Inbox { rx })
}

pub struct Inbox {
    rx: Receiver<Order>,
}

impl Inbox {
    /// Apply every queued order to `battlefield`. Returns how many were
    /// taken; `Closed` once the sender is gone and nothing is left.
    pub fn drain_into(&self, battlefield: &mut Battlefield) -> LinkResult<usize> {
        let mut taken = 0;
        loop {
            match self.rx.try_recv() {
                Ok(order) => {
                    // Rejections are logged by the battlefield.
                    let _ = battlefield.receive(order);
                    taken += 1;
                }
                Err(TryRecvError::Empty) => {
                    if taken > 0 {
                        debug!(taken, "remote orders applied");
                    }
                    return Ok(taken);
                }
                Err(TryRecvError::Disconnected) if taken > 0 => return Ok(taken),
                Err(TryRecvError::Disconnected) => return Err(LinkError::Closed),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
