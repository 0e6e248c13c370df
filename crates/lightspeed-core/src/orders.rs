//! Player orders.
//!
//! An order is the only thing the two peers exchange. Each side applies the
//! same ordered stream through `Battlefield::receive`, so orders must be
//! plain data: they carry their own issue time and never refer to local
//! state.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::{ShipClass, Team};

/// What an order asks its ship to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum OrderKind {
    /// Fly to the target point.
    Move,
    /// Fire a laser toward the target point.
    Shoot,
    /// Use the ship class's special ability at the target point.
    Special,
    /// Place a new ship at the target point (placement phase only).
    Place { class: ShipClass, team: Team },
    /// The team has finished placing ships.
    Ready { team: Team },
}

impl OrderKind {
    /// Sprite index used for on-screen order markers.
    pub fn marker_index(self) -> Option<u8> {
        match self {
            OrderKind::Move => Some(0),
            OrderKind::Shoot => Some(1),
            OrderKind::Special => Some(2),
            OrderKind::Place { .. } | OrderKind::Ready { .. } => None,
        }
    }
}

/// An immutable, time-stamped command addressed to one ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// ID of the ship the order addresses.
    pub ship: u8,
    pub kind: OrderKind,
    pub x: f64,
    pub y: f64,
    /// Issue time in engine time units.
    pub time: f64,
}

impl Order {
    pub fn new(ship: u8, kind: OrderKind, x: f64, y: f64, time: f64) -> Self {
        Self {
            ship,
            kind,
            x,
            y,
            time,
        }
    }

    pub fn move_to(ship: u8, x: f64, y: f64, time: f64) -> Self {
        Self::new(ship, OrderKind::Move, x, y, time)
    }

    pub fn shoot(ship: u8, x: f64, y: f64, time: f64) -> Self {
        Self::new(ship, OrderKind::Shoot, x, y, time)
    }

    pub fn special(ship: u8, x: f64, y: f64, time: f64) -> Self {
        Self::new(ship, OrderKind::Special, x, y, time)
    }

    /// Place a ship of `class` for `team`; the ship ID follows from both.
    pub fn place(team: Team, class: ShipClass, x: f64, y: f64, time: f64) -> Self {
        Self::new(
            class.placement_id(team),
            OrderKind::Place { class, team },
            x,
            y,
            time,
        )
    }

    pub fn ready(team: Team, time: f64) -> Self {
        Self::new(0, OrderKind::Ready { team }, 0.0, 0.0, time)
    }

    pub fn target(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Whether this order steers a ship (as opposed to match control).
    pub fn is_action(&self) -> bool {
        matches!(
            self.kind,
            OrderKind::Move | OrderKind::Shoot | OrderKind::Special
        )
    }
}
