//! Bodies: every physical object on the battlefield.
//!
//! A `Body` is a shared `Motion` (creation time, position timeline, sound
//! cues) plus a `BodyKind` carrying the variant-specific state. The
//! capability methods below (`exists_at`, `update`, `sprite_*`) dispatch on
//! the kind; pairwise effects live in `interaction`.

use glam::DVec2;
use serde::Serialize;

use lightspeed_core::enums::{Sound, Team};
use lightspeed_core::events::{Cue, CueList};
use lightspeed_core::timeline::Timeline;
use lightspeed_core::types::{Segment, SpriteTransform};

use crate::gas_cloud::GasCloud;
use crate::laser::Laser;
use crate::region::Region;
use crate::ship::Ship;
use crate::spawner::Spawner;

/// Identifier of a body, derived from whatever created it.
pub type BodyId = u64;

/// State every body has: when it appeared, where it goes, what it sounds like.
#[derive(Debug, Clone, Serialize)]
pub struct Motion {
    pub created: f64,
    pub track: Timeline<Segment>,
    pub cues: CueList,
}

impl Motion {
    pub fn new(pos: DVec2, vel: DVec2, created: f64) -> Self {
        Self {
            created,
            track: Timeline::new(created, Segment::new(pos, vel)),
            cues: CueList::default(),
        }
    }

    pub fn position_at(&self, t: f64) -> DVec2 {
        let record = self.track.record_at(t);
        record.value.position_after(t - record.time)
    }

    pub fn velocity_at(&self, t: f64) -> DVec2 {
        self.track.value_at(t).vel
    }

    pub fn age(&self, t: f64) -> f64 {
        t - self.created
    }

    pub fn cue(&mut self, sound: Sound, t: f64) {
        self.cues.push(sound, t);
    }
}

/// Variant-specific state.
#[derive(Debug, Clone, Serialize)]
pub enum BodyKind {
    Ship(Ship),
    Laser(Laser),
    GasCloud(GasCloud),
    Region(Region),
}

/// A simulated object owned by the battlefield.
#[derive(Debug, Clone, Serialize)]
pub struct Body {
    pub(crate) id: BodyId,
    pub(crate) motion: Motion,
    pub(crate) kind: BodyKind,
    /// First tick at which the body was seen not to exist.
    pub(crate) gone_since: Option<f64>,
}

impl Body {
    pub(crate) fn new(motion: Motion, kind: BodyKind) -> Self {
        Self {
            id: 0,
            motion,
            kind,
            gone_since: None,
        }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn created(&self) -> f64 {
        self.motion.created
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn kind(&self) -> &BodyKind {
        &self.kind
    }

    /// Whether the body is part of the world at time `t`.
    pub fn exists_at(&self, t: f64) -> bool {
        if t < self.motion.created {
            return false;
        }
        match &self.kind {
            BodyKind::Ship(ship) => ship.alive_at(t),
            BodyKind::Laser(laser) => laser.intact_at(&self.motion, t),
            BodyKind::GasCloud(_) => GasCloud::within_lifetime(self.motion.age(t)),
            BodyKind::Region(region) => region.open_at(t),
        }
    }

    pub fn position_at(&self, t: f64) -> DVec2 {
        self.motion.position_at(t)
    }

    pub fn x_val_at(&self, t: f64) -> f64 {
        self.position_at(t).x
    }

    pub fn y_val_at(&self, t: f64) -> f64 {
        self.position_at(t).y
    }

    pub fn vx_val_at(&self, t: f64) -> f64 {
        self.motion.velocity_at(t).x
    }

    pub fn vy_val_at(&self, t: f64) -> f64 {
        self.motion.velocity_at(t).y
    }

    /// Autonomous behavior for one tick. Only gas clouds act on their own.
    pub fn update(&mut self, t: f64, spawner: &mut Spawner) {
        if !self.exists_at(t) {
            return;
        }
        if let BodyKind::GasCloud(cloud) = &mut self.kind {
            cloud.emit(self.id, &self.motion, t, spawner);
        }
    }

    /// Whether the sprite is resized with the zoom level. Ship icons are not.
    pub fn scales(&self) -> bool {
        !matches!(self.kind, BodyKind::Ship(_))
    }

    pub fn sprite_name(&self) -> String {
        match &self.kind {
            BodyKind::Ship(ship) => ship.sprite_name(),
            BodyKind::Laser(laser) => laser.sprite_name().to_string(),
            BodyKind::GasCloud(_) => "gas".to_string(),
            BodyKind::Region(region) => region.sprite_name(),
        }
    }

    /// How to draw the body at `t`, or `None` if it cannot be drawn this frame.
    pub fn sprite_transform(&self, t: f64) -> Option<SpriteTransform> {
        let transform = match &self.kind {
            BodyKind::Ship(_) | BodyKind::Region(_) => SpriteTransform::default(),
            BodyKind::Laser(laser) => laser.sprite_transform(),
            BodyKind::GasCloud(_) => GasCloud::sprite_transform(self.motion.age(t)),
        };
        transform.checked()
    }

    /// Sound cues in the window `(from, to]`.
    pub fn cues_between(&self, from: f64, to: f64) -> &[Cue] {
        self.motion.cues.between(from, to)
    }

    /// The team a body belongs to, if it is a ship or a region.
    pub fn team(&self) -> Option<Team> {
        match &self.kind {
            BodyKind::Ship(ship) => Some(ship.team()),
            BodyKind::Region(region) => Some(region.team()),
            BodyKind::Laser(_) | BodyKind::GasCloud(_) => None,
        }
    }

    pub fn as_ship(&self) -> Option<&Ship> {
        match &self.kind {
            BodyKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_laser(&self) -> Option<&Laser> {
        match &self.kind {
            BodyKind::Laser(laser) => Some(laser),
            _ => None,
        }
    }

    pub fn as_gas_cloud(&self) -> Option<&GasCloud> {
        match &self.kind {
            BodyKind::GasCloud(cloud) => Some(cloud),
            _ => None,
        }
    }

    pub fn as_region(&self) -> Option<&Region> {
        match &self.kind {
            BodyKind::Region(region) => Some(region),
            _ => None,
        }
    }

    pub(crate) fn as_region_mut(&mut self) -> Option<&mut Region> {
        match &mut self.kind {
            BodyKind::Region(region) => Some(region),
            _ => None,
        }
    }
}
