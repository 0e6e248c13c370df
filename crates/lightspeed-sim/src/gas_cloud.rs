//! Gas clouds: expanding bodies that absorb visible lasers and slowly
//! re-emit the energy as weaker lasers in random directions.
//!
//! The cloud keeps two energies. `stored` is what it has absorbed and not
//! yet given back. `accumulated` builds up at a rate proportional to
//! `stored`; each time it reaches `GAS_CLOUD_LASER_ENERGY` a laser is
//! emitted and both drop by that amount. The direction of each emitted
//! laser comes from a random source keyed by that laser's own ID.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;
use serde::Serialize;
use tracing::warn;

use lightspeed_core::constants::*;
use lightspeed_core::enums::LaserKind;
use lightspeed_core::timeline::Timeline;
use lightspeed_core::types::{CloudCharge, SpriteTransform};

use crate::body::{Body, BodyId, BodyKind, Motion};
use crate::laser::Laser;
use crate::spawner::{derive_id, Spawner};

#[derive(Debug, Clone, Serialize)]
pub struct GasCloud {
    charge: Timeline<CloudCharge>,
    /// Lasers emitted over the cloud's whole life.
    emitted: u64,
}

impl GasCloud {
    pub fn new(t: f64) -> Self {
        Self {
            charge: Timeline::new(t, CloudCharge::default()),
            emitted: 0,
        }
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub(crate) fn within_lifetime(age: f64) -> bool {
        age < GAS_CLOUD_LIFETIME
    }

    /// Radius at a given age. Follows from a density that decays
    /// exponentially with distance, with non-interacting gas particles.
    pub fn r_val_for(age: f64) -> f64 {
        if age <= 0.0 {
            return 0.0;
        }
        (-GAS_CLOUD_SPEED * age * (age / GAS_CLOUD_LIFETIME).ln()).max(0.0)
    }

    /// Energy absorbed and not yet re-emitted, at time `t`.
    pub fn e_val_at(&self, t: f64) -> f64 {
        self.charge.value_at(t).stored
    }

    /// Built-up energy at time `t`.
    pub fn es_val_at(&self, t: f64) -> f64 {
        let record = self.charge.record_at(t);
        let dt = t - record.time;
        (record.value.accumulated + record.value.stored * dt / GAS_CLOUD_HALF_LIFE).max(0.0)
    }

    pub fn charge(&self) -> &Timeline<CloudCharge> {
        &self.charge
    }

    /// Overwrite the charge state from `t` on.
    pub(crate) fn set_charge(&mut self, t: f64, charge: CloudCharge) {
        self.charge.append(t, charge);
    }

    /// Take in a laser's energy at `t`.
    pub(crate) fn absorb(&mut self, energy: f64, t: f64) {
        let charge = CloudCharge {
            stored: self.e_val_at(t) + energy,
            accumulated: self.es_val_at(t),
        };
        self.set_charge(t, charge);
    }

    /// Emit one laser per threshold crossing of the built-up energy.
    pub(crate) fn emit(&mut self, id: BodyId, motion: &Motion, t: f64, spawner: &mut Spawner) -> u32 {
        let center = motion.position_at(t);
        let clearance = Self::r_val_for(motion.age(t)) + Laser::radius_for(GAS_CLOUD_LASER_ENERGY);
        let mut emitted = 0;

        while self.es_val_at(t) >= GAS_CLOUD_LASER_ENERGY {
            if emitted == MAX_EMISSIONS_PER_UPDATE {
                warn!(cloud = id, emitted, t, "gas cloud emission capped for this update");
                break;
            }
            let laser_id = derive_id(id, self.emitted);
            let heading = spawner.rng_for(laser_id).gen_range(0.0..TAU);
            let start = center + DVec2::from_angle(heading) * clearance;
            spawner.spawn(
                Body::laser(LaserKind::Visible, start, heading, GAS_CLOUD_LASER_ENERGY, t),
                laser_id,
            );
            self.emitted += 1;

            let charge = CloudCharge {
                stored: self.e_val_at(t) - GAS_CLOUD_LASER_ENERGY,
                accumulated: self.es_val_at(t) - GAS_CLOUD_LASER_ENERGY,
            };
            self.set_charge(t, charge);
            emitted += 1;
        }
        emitted
    }

    pub(crate) fn sprite_transform(age: f64) -> SpriteTransform {
        let scale = Self::r_val_for(age) / GAS_SPRITE_RADIUS;
        let fade = (age / GAS_CLOUD_LIFETIME).powi(2);
        SpriteTransform {
            rotation: 0.0,
            scale_x: scale,
            scale_y: scale,
            alpha: (1.0 - fade).max(0.0),
        }
    }
}

impl Body {
    /// A gas cloud released at `pos`, drifting with `vel`.
    pub fn gas_cloud(pos: DVec2, vel: DVec2, t: f64) -> Self {
        Body::new(Motion::new(pos, vel, t), BodyKind::GasCloud(GasCloud::new(t)))
    }

    /// Cloud radius at `t`, for gas clouds.
    pub fn r_val_at(&self, t: f64) -> Option<f64> {
        self.as_gas_cloud()
            .map(|_| GasCloud::r_val_for(self.motion.age(t)))
    }
}
