//! Reasons an order is dropped.
//!
//! A rejected order leaves the battlefield untouched. The error exists so
//! callers and logs can tell why; nothing upstream has to act on it.

use thiserror::Error;

use crate::enums::Team;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum OrderRejected {
    /// Ship actions are ignored until both teams are ready.
    #[error("match has not started")]
    NotStarted,

    /// Placement and readiness are only accepted before the match starts.
    #[error("match already started")]
    AlreadyStarted,

    /// The match is over; nothing more is applied.
    #[error("match has ended")]
    MatchEnded,

    #[error("no ship with id {0}")]
    UnknownShip(u8),

    #[error("ship {ship} does not exist at t={time}")]
    ShipDestroyed { ship: u8, time: f64 },

    #[error("ship {ship} needs {required} J but has {available} J")]
    InsufficientEnergy {
        ship: u8,
        required: f64,
        available: f64,
    },

    #[error("ship {0} has no special ability")]
    NoSpecial(u8),

    #[error("placement at ({x}, {y}) is outside the {team:?} region")]
    OutsideRegion { team: Team, x: f64, y: f64 },

    #[error("ship id {0} is already placed")]
    DuplicateShip(u8),

    #[error("{0:?} cannot ready without ships")]
    EmptyFleet(Team),
}

/// Result type for order dispatch.
pub type OrderResult = Result<(), OrderRejected>;
