//! Ships: the bodies players command.
//!
//! Health and energy are scalar timelines changed only through `damaged`
//! and `expend`. Actions (`move_to`, `shoot`, `special`) are methods on the
//! owning `Body` because they need both the ship state and its motion.

use glam::DVec2;
use serde::Serialize;

use lightspeed_core::constants::*;
use lightspeed_core::enums::{LaserKind, ShipClass, Sound, Team};
use lightspeed_core::error::{OrderRejected, OrderResult};
use lightspeed_core::timeline::{Record, Timeline};
use lightspeed_core::types::Segment;

use crate::body::{Body, BodyId, BodyKind, Motion};
use crate::laser::Laser;
use crate::spawner::{derive_id, Spawner, SHIP_LINEAGE};

/// Below this distance a move order is treated as "stop here".
const MIN_MOVE_DISTANCE: f64 = 1.0e-9;

/// Salts separating what a ship creates at the same instant.
const SHOT_SALT: u64 = 1;
const SPECIAL_SALT: u64 = 2;

/// Body ID of the ship with match ID `id`.
fn ship_body_id(id: u8) -> BodyId {
    derive_id(SHIP_LINEAGE, u64::from(id))
}

/// Body ID of whatever ship `parent` creates at `t` with `salt`.
fn offspring_id(parent: BodyId, t: f64, salt: u64) -> BodyId {
    derive_id(derive_id(parent, t.to_bits()), salt)
}

#[derive(Debug, Clone, Serialize)]
pub struct Ship {
    id: u8,
    team: Team,
    class: ShipClass,
    health: Timeline<f64>,
    energy: Timeline<f64>,
}

impl Ship {
    pub fn new(id: u8, team: Team, class: ShipClass, t: f64) -> Self {
        Self {
            id,
            team,
            class,
            health: Timeline::new(t, SHIP_INITIAL_HEALTH),
            energy: Timeline::new(t, SHIP_INITIAL_ENERGY),
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    /// Health at time `t`.
    pub fn h_val_at(&self, t: f64) -> f64 {
        self.health.at(t)
    }

    /// Energy at time `t`.
    pub fn e_val_at(&self, t: f64) -> f64 {
        self.energy.at(t)
    }

    pub fn health(&self) -> &Timeline<f64> {
        &self.health
    }

    pub fn energy(&self) -> &Timeline<f64> {
        &self.energy
    }

    pub(crate) fn alive_at(&self, t: f64) -> bool {
        self.h_val_at(t) > 0.0
    }

    pub fn sprite_name(&self) -> String {
        format!("{}{}", self.class.sprite(), self.team.sprite_suffix())
    }

    /// Take damage. Always applies; a ship whose health drops to zero or
    /// below stops existing from `t` on.
    pub(crate) fn damaged(&mut self, motion: &mut Motion, amount: f64, t: f64) {
        let was_alive = self.alive_at(t);
        self.health.adjust(t, -amount);
        if was_alive && !self.alive_at(t) {
            motion.cues.clear_after(t);
            motion.cue(Sound::Boom, t);
        }
    }

    /// Spend energy if there is enough of it at `t` and at every later
    /// record. Returns false and changes nothing otherwise.
    pub(crate) fn expend(&mut self, amount: f64, t: f64) -> bool {
        if self.energy.min_from(t) < amount {
            return false;
        }
        self.energy.adjust(t, -amount);
        true
    }

    fn afford(&mut self, amount: f64, t: f64) -> OrderResult {
        let available = self.e_val_at(t);
        if self.expend(amount, t) {
            Ok(())
        } else {
            Err(OrderRejected::InsufficientEnergy {
                ship: self.id,
                required: amount,
                available,
            })
        }
    }
}

/// Replace everything planned from `t` on with a straight leg to `target`
/// followed by a stop. Returns the arrival time.
pub(crate) fn plan_move(motion: &mut Motion, speed: f64, target: DVec2, t: f64) -> f64 {
    let start = motion.position_at(t);
    let distance = start.distance(target);
    motion.cues.clear_after(t);

    if distance < MIN_MOVE_DISTANCE || speed <= 0.0 {
        motion.track = motion
            .track
            .spliced(t, [Record::new(t, Segment::at_rest(start))]);
        return t;
    }

    let duration = distance / speed;
    let leg = Segment::new(start, (target - start) / duration);
    motion.track = motion.track.spliced(
        t,
        [
            Record::new(t, leg),
            Record::new(t + duration, Segment::at_rest(target)),
        ],
    );
    motion.cue(Sound::Blast, t);
    motion.cue(Sound::Blast, t + duration);
    t + duration
}

/// Fire a laser from the ship's position toward `target`, far enough ahead
/// that it cannot hit the ship that fired it.
fn fire(
    id: BodyId,
    motion: &mut Motion,
    kind: LaserKind,
    energy: f64,
    target: DVec2,
    t: f64,
    spawner: &mut Spawner,
) {
    let origin = motion.position_at(t);
    let delta = target - origin;
    let heading = delta.y.atan2(delta.x);
    let clearance = Laser::radius_for(energy) + SHOT_SPAWN_CLEARANCE;
    let start = origin + DVec2::from_angle(heading) * clearance;
    spawner.spawn(Body::laser(kind, start, heading, energy, t), id);
    motion.cue(Sound::Pew, t);
}

impl Body {
    /// A freshly placed ship at rest.
    pub fn ship(id: u8, team: Team, class: ShipClass, pos: DVec2, t: f64) -> Self {
        let mut body = Body::new(
            Motion::new(pos, DVec2::ZERO, t),
            BodyKind::Ship(Ship::new(id, team, class, t)),
        );
        body.id = ship_body_id(id);
        body
    }

    /// Split into motion and ship state, provided the ship exists at `t`.
    fn acting_ship(&mut self, t: f64) -> Result<(&mut Motion, &mut Ship), OrderRejected> {
        let exists = self.exists_at(t);
        match (&mut self.motion, &mut self.kind) {
            (motion, BodyKind::Ship(ship)) => {
                if exists {
                    Ok((motion, ship))
                } else {
                    Err(OrderRejected::ShipDestroyed {
                        ship: ship.id,
                        time: t,
                    })
                }
            }
            // Only ships carry a match ID; the battlefield never routes orders elsewhere.
            _ => Err(OrderRejected::UnknownShip(u8::MAX)),
        }
    }

    /// Fly to `target`, cancelling any motion planned after `t`.
    /// Returns the planned arrival time.
    pub fn move_to(&mut self, target: DVec2, t: f64) -> Result<f64, OrderRejected> {
        let (motion, ship) = self.acting_ship(t)?;
        Ok(plan_move(motion, ship.class.speed(), target, t))
    }

    /// Fire an ordinary laser toward `target`.
    pub fn shoot(&mut self, target: DVec2, t: f64, spawner: &mut Spawner) -> OrderResult {
        let id = offspring_id(self.id, t, SHOT_SALT);
        let (motion, _) = self.acting_ship(t)?;
        fire(id, motion, LaserKind::Visible, SHOT_ENERGY, target, t, spawner);
        Ok(())
    }

    /// Use the class's special ability. Rejected without side effects when
    /// the class has none or the ship cannot pay for it.
    pub fn special(&mut self, target: DVec2, t: f64, spawner: &mut Spawner) -> OrderResult {
        let id = offspring_id(self.id, t, SPECIAL_SALT);
        let (motion, ship) = self.acting_ship(t)?;
        match ship.class {
            ShipClass::Fighter => Err(OrderRejected::NoSpecial(ship.id)),
            ShipClass::Steamship => {
                ship.afford(STEAMSHIP_SPECIAL_COST, t)?;
                let cloud = Body::gas_cloud(motion.position_at(t), motion.velocity_at(t), t);
                spawner.spawn(cloud, id);
                motion.cue(Sound::Woosh, t);
                Ok(())
            }
            ShipClass::Lamplighter => {
                ship.afford(LAMPLIGHTER_SPECIAL_COST, t)?;
                fire(
                    id,
                    motion,
                    LaserKind::Ultraviolet,
                    UV_LASER_ENERGY,
                    target,
                    t,
                    spawner,
                );
                Ok(())
            }
        }
    }

    /// Apply damage to a ship body. No effect on other kinds.
    pub fn damaged(&mut self, amount: f64, t: f64) {
        if let BodyKind::Ship(ship) = &mut self.kind {
            ship.damaged(&mut self.motion, amount, t);
        }
    }

    /// Spend energy from a ship body; false for other kinds or when short.
    pub fn expend(&mut self, amount: f64, t: f64) -> bool {
        match &mut self.kind {
            BodyKind::Ship(ship) => ship.expend(amount, t),
            _ => false,
        }
    }

    /// Health at `t`, for ships.
    pub fn h_val_at(&self, t: f64) -> Option<f64> {
        self.as_ship().map(|ship| ship.h_val_at(t))
    }

    /// Energy at `t`, for ships.
    pub fn e_val_at(&self, t: f64) -> Option<f64> {
        self.as_ship().map(|ship| ship.e_val_at(t))
    }
}
