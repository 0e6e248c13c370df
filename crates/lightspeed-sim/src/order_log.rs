//! Orders kept after dispatch so they can be drawn as markers.
//!
//! A logged order sits at its target point. The marker drawn for it runs
//! from the ship to the target, shortened by `r_val_at`, so a shot marker
//! shrinks as the laser closes in and a move marker follows the ship.

use glam::DVec2;

use lightspeed_core::constants::LASER_SPEED;
use lightspeed_core::enums::Team;
use lightspeed_core::orders::{Order, OrderKind};

use crate::observation::Observable;

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedOrder {
    order: Order,
    /// Team of the ship the order addressed, when it was known.
    team: Option<Team>,
    /// End of the display window. `None` for orders that are never shown.
    shown_until: Option<f64>,
}

impl LoggedOrder {
    pub fn new(order: Order, team: Option<Team>, shown_until: Option<f64>) -> Self {
        Self {
            order,
            team,
            shown_until,
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn ship(&self) -> u8 {
        self.order.ship
    }

    pub fn shown_until(&self) -> Option<f64> {
        self.shown_until
    }

    /// Whether the marker is on screen at `t`.
    pub fn exists_at(&self, t: f64) -> bool {
        t >= self.order.time && self.shown_until.map_or(false, |until| t < until)
    }

    pub fn x_val_at(&self, _t: f64) -> f64 {
        self.order.x
    }

    pub fn y_val_at(&self, _t: f64) -> f64 {
        self.order.y
    }

    /// Length already closed at `t`. Only a shot closes on its own, at the
    /// speed of its laser.
    pub fn r_val_at(&self, t: f64) -> f64 {
        match self.order.kind {
            OrderKind::Shoot => (t - self.order.time).max(0.0) * LASER_SPEED,
            _ => 0.0,
        }
    }

    /// Marker sprite, e.g. `order1` for a shot.
    pub fn sprite_name(&self) -> Option<String> {
        self.order
            .kind
            .marker_index()
            .map(|index| format!("order{index}"))
    }
}

impl Observable for LoggedOrder {
    fn position_at(&self, _t: f64) -> DVec2 {
        self.order.target()
    }

    fn home_team(&self) -> Option<Team> {
        self.team
    }
}
