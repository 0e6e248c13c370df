//! Lasers: light-speed projectiles carrying an energy payload.

use glam::DVec2;
use serde::Serialize;

use lightspeed_core::constants::*;
use lightspeed_core::enums::LaserKind;
use lightspeed_core::types::SpriteTransform;
use lightspeed_core::units::MJ;

use crate::body::{Body, BodyKind, Motion};

#[derive(Debug, Clone, Serialize)]
pub struct Laser {
    kind: LaserKind,
    /// Direction of travel in radians.
    heading: f64,
    energy: f64,
    collided_at: Option<f64>,
}

impl Laser {
    /// Blast radius of a laser carrying `energy`.
    pub fn radius_for(energy: f64) -> f64 {
        LASER_RADIUS_PER_ROOT_MJ * (energy.max(0.0) / MJ).sqrt()
    }

    pub fn kind(&self) -> LaserKind {
        self.kind
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Energy payload.
    pub fn e_val(&self) -> f64 {
        self.energy
    }

    pub fn radius(&self) -> f64 {
        Self::radius_for(self.energy)
    }

    pub fn collided_at(&self) -> Option<f64> {
        self.collided_at
    }

    pub fn is_spent(&self) -> bool {
        self.collided_at.is_some()
    }

    /// Stop existing from `t` on. An earlier collision wins.
    pub(crate) fn collide(&mut self, t: f64) {
        self.collided_at = Some(self.collided_at.map_or(t, |c| c.min(t)));
    }

    pub(crate) fn intact_at(&self, motion: &Motion, t: f64) -> bool {
        let in_range = motion.age(t) * LASER_SPEED < LASER_RANGE;
        let uncollided = self.collided_at.map_or(true, |c| t < c);
        in_range && uncollided
    }

    pub fn sprite_name(&self) -> &'static str {
        match self.kind {
            LaserKind::Visible => "laser",
            LaserKind::Ultraviolet => "laser_uv",
        }
    }

    pub(crate) fn sprite_transform(&self) -> SpriteTransform {
        let scale = self.radius() / LASER_SPRITE_RADIUS;
        SpriteTransform {
            rotation: self.heading,
            scale_x: scale,
            scale_y: scale,
            alpha: 1.0,
        }
    }
}

impl Body {
    /// A laser leaving `pos` at time `t` along `heading`.
    pub fn laser(kind: LaserKind, pos: DVec2, heading: f64, energy: f64, t: f64) -> Self {
        let vel = DVec2::from_angle(heading) * LASER_SPEED;
        Body::new(
            Motion::new(pos, vel, t),
            BodyKind::Laser(Laser {
                kind,
                heading,
                energy,
                collided_at: None,
            }),
        )
    }
}
