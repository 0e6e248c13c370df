//! Pairwise body interactions.
//!
//! The battlefield calls `interact` for every ordered pair of bodies that
//! exist at the tick time, so each effect is written from the point of view
//! of exactly one of the two kinds. Effects land at the tick time itself;
//! light delay only applies to what players see. A laser covers a whole
//! tick of distance between samples, so hits on ships use the closest
//! approach since the previous tick rather than the sampled distance.

use tracing::trace;

use lightspeed_core::constants::SHIP_RADIUS;
use lightspeed_core::enums::LaserKind;

use crate::body::{Body, BodyKind};
use crate::gas_cloud::GasCloud;

/// Closest distance between `a` and `b` over `(since, t]`, with both moving
/// in a straight line across the interval.
fn closest_approach(a: &Body, b: &Body, since: f64, t: f64) -> f64 {
    let from = since.max(a.created()).max(b.created());
    let start = a.position_at(from) - b.position_at(from);
    let end = a.position_at(t) - b.position_at(t);
    let path = end - start;
    let length_sq = path.length_squared();
    if length_sq == 0.0 {
        return end.length();
    }
    let s = (-start.dot(path) / length_sq).clamp(0.0, 1.0);
    (start + path * s).length()
}

/// Apply `a`'s effect on `b` at tick `t`, the previous tick being `since`.
pub(crate) fn interact(a: &mut Body, b: &mut Body, since: f64, t: f64) {
    // An earlier pair in the same tick may have used one of them up.
    if !a.exists_at(t) || !b.exists_at(t) {
        return;
    }
    let dist = a.position_at(t).distance(b.position_at(t));
    let passing = closest_approach(a, b, since, t);
    let a_age = a.motion.age(t);

    match (&mut a.kind, &mut b.kind) {
        (BodyKind::GasCloud(cloud), BodyKind::Laser(laser))
            if laser.kind() == LaserKind::Visible && dist < GasCloud::r_val_for(a_age) =>
        {
            laser.collide(t);
            cloud.absorb(laser.e_val(), t);
            trace!(cloud = a.id, laser = b.id, t, "laser absorbed");
        }
        (BodyKind::Laser(laser), BodyKind::Ship(ship)) if passing < laser.radius() + SHIP_RADIUS => {
            laser.collide(t);
            ship.damaged(&mut b.motion, laser.e_val(), t);
            trace!(laser = a.id, ship = ship.id(), t, "ship hit");
        }
        _ => {}
    }
}
