//! Fundamental kinematic and presentation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A constant-velocity motion segment, the value type of position timelines.
///
/// The position at time `t` inside a segment recorded at `t0` is
/// `pos + vel * (t - t0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub pos: DVec2,
    pub vel: DVec2,
}

impl Segment {
    pub fn new(pos: DVec2, vel: DVec2) -> Self {
        Self { pos, vel }
    }

    /// A segment that stays put.
    pub fn at_rest(pos: DVec2) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
        }
    }

    /// Position `dt` time units after the segment starts.
    pub fn position_after(&self, dt: f64) -> DVec2 {
        self.pos + self.vel * dt
    }
}

/// Energy state of a gas cloud.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudCharge {
    /// Energy absorbed and not yet re-emitted.
    pub stored: f64,
    /// Built-up energy; a laser is emitted each time it reaches the threshold.
    pub accumulated: f64,
}

/// How a sprite should be drawn at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteTransform {
    /// Rotation in radians.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl Default for SpriteTransform {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            alpha: 1.0,
        }
    }
}

impl SpriteTransform {
    /// `None` when the transform cannot be drawn: a non-finite component or a
    /// scale that collapses the sprite to nothing.
    pub fn checked(self) -> Option<Self> {
        let finite = self.rotation.is_finite()
            && self.scale_x.is_finite()
            && self.scale_y.is_finite()
            && self.alpha.is_finite();
        if !finite || self.scale_x <= 0.0 || self.scale_y <= 0.0 {
            return None;
        }
        Some(Self {
            alpha: self.alpha.clamp(0.0, 1.0),
            ..self
        })
    }
}
