//! Light-delay observation.
//!
//! A player sees a remote body as it was when the light now arriving left
//! it. That emission time `t'` satisfies `t' = t - |observer - pos(t')| / c`,
//! which is solved here by fixed-point iteration. For bodies slower than
//! light the map is a contraction and converges quickly; the iterate is
//! clamped to `t' <= t` so a body closing at `c` simply stays in the past.

use glam::DVec2;

use lightspeed_core::constants::{OBSERVATION_MAX_ITERATIONS, OBSERVATION_TOLERANCE};
use lightspeed_core::enums::Team;
use lightspeed_core::units::C;

use crate::body::Body;

/// Anything with a position history that a player can look at.
pub trait Observable {
    fn position_at(&self, t: f64) -> DVec2;

    /// The team that sees this thing without delay, if any.
    fn home_team(&self) -> Option<Team>;
}

impl Observable for Body {
    fn position_at(&self, t: f64) -> DVec2 {
        Body::position_at(self, t)
    }

    fn home_team(&self) -> Option<Team> {
        self.team()
    }
}

/// Result of one fixed-point solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub time: f64,
    pub iterations: u32,
    pub converged: bool,
}

/// Emission time of the light reaching `observer` at `t` from a target
/// whose position is given by `position_at`.
pub fn solve(observer: DVec2, t: f64, position_at: impl Fn(f64) -> DVec2) -> Observation {
    let mut current = t;
    for iteration in 1..=OBSERVATION_MAX_ITERATIONS {
        let next = (t - observer.distance(position_at(current)) / C).min(t);
        if (next - current).abs() <= OBSERVATION_TOLERANCE {
            return Observation {
                time: next,
                iterations: iteration,
                converged: true,
            };
        }
        current = next;
    }
    Observation {
        time: current,
        iterations: OBSERVATION_MAX_ITERATIONS,
        converged: false,
    }
}

/// Euclidean distance between `a` at `ta` and `b` at `tb`.
pub fn dist(a: &impl Observable, b: &impl Observable, ta: f64, tb: f64) -> f64 {
    a.position_at(ta).distance(b.position_at(tb))
}
