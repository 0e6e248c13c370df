//! The battlefield: owner of every body and order, and the simulation clock.
//!
//! Both peers run one `Battlefield` each and feed it the same ordered stream
//! of orders through `receive`. Time advances in ticks on a fixed grid of
//! `BattlefieldConfig::step`, so interactions happen at the same instants on
//! both sides no matter how often each peer calls `update`. Bodies are kept
//! sorted by creation time and ID rather than by arrival, so the two peers
//! walk them in the same order even when orders reach them in a different
//! order.

use glam::DVec2;
use tracing::{debug, info, warn};

use lightspeed_core::constants::*;
use lightspeed_core::enums::{MatchPhase, Outcome, ShipClass, Team};
use lightspeed_core::error::{OrderRejected, OrderResult};
use lightspeed_core::orders::{Order, OrderKind};

use crate::body::{Body, BodyId};
use crate::interaction::interact;
use crate::observation::{self, Observable};
use crate::order_log::LoggedOrder;
use crate::region::Region;
use crate::ship::Ship;
use crate::spawner::Spawner;

/// Configuration for a new battlefield.
#[derive(Debug, Clone)]
pub struct BattlefieldConfig {
    /// RNG seed. Both peers must use the same one.
    pub seed: u64,
    /// The team this peer commands; its ships are the observers.
    pub local_team: Team,
    /// Interaction tick spacing.
    pub step: f64,
    /// How long a body is kept after it stops existing.
    pub retention: f64,
}

impl Default for BattlefieldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            local_team: Team::Blue,
            step: DEFAULT_STEP,
            retention: DEFAULT_RETENTION,
        }
    }
}

/// Readiness of both teams during placement.
#[derive(Debug, Clone, Copy, Default)]
struct ReadyState {
    blue: Option<f64>,
    red: Option<f64>,
}

impl ReadyState {
    fn get(&self, team: Team) -> Option<f64> {
        match team {
            Team::Blue => self.blue,
            Team::Red => self.red,
        }
    }

    fn set(&mut self, team: Team, t: f64) {
        let slot = match team {
            Team::Blue => &mut self.blue,
            Team::Red => &mut self.red,
        };
        slot.get_or_insert(t);
    }

    /// Start time once both teams are ready: the later of the two.
    fn start_time(&self) -> Option<f64> {
        Some(self.blue?.max(self.red?))
    }
}

pub struct Battlefield {
    config: BattlefieldConfig,
    time: f64,
    phase: MatchPhase,
    bodies: Vec<Body>,
    orders: Vec<LoggedOrder>,
    spawner: Spawner,
    ready: ReadyState,
    started_at: Option<f64>,
    ended_at: Option<f64>,
    outcome: Option<Outcome>,
    message: String,
}

impl Battlefield {
    /// Create a battlefield in the placement phase with both regions open.
    pub fn new(config: BattlefieldConfig, start_time: f64) -> Self {
        info!(
            seed = config.seed,
            local_team = ?config.local_team,
            step = config.step,
            "battlefield created"
        );

        let mut battlefield = Self {
            spawner: Spawner::new(config.seed),
            config,
            time: start_time,
            phase: MatchPhase::Placement,
            bodies: Vec::new(),
            orders: Vec::new(),
            ready: ReadyState::default(),
            started_at: None,
            ended_at: None,
            outcome: None,
            message: String::new(),
        };
        for team in [Team::Blue, Team::Red] {
            battlefield.insert(Body::region(team, start_time));
        }
        battlefield
    }

    // ---- Clock ----

    /// Advance the simulation to `now`. Calls with `now` at or before the
    /// current time do nothing.
    pub fn update(&mut self, now: f64) {
        if now.is_nan() || now <= self.time {
            return;
        }
        let step = self.config.step;
        let mut first = (self.time / step).floor() as i64 + 1;
        let last = (now / step).floor() as i64;

        let pending = last - first + 1;
        if pending > MAX_TICKS_PER_UPDATE as i64 {
            warn!(
                pending,
                from = self.time,
                to = now,
                "too far behind, skipping interaction ticks"
            );
            first = last - MAX_TICKS_PER_UPDATE as i64 + 1;
        }

        for k in first..=last {
            self.tick(k as f64 * step);
        }
        self.flush();
        self.time = now;
    }

    fn tick(&mut self, t: f64) {
        self.retire(t);
        self.flush();

        for body in &mut self.bodies {
            body.update(t, &mut self.spawner);
        }
        self.interact_all(t);
        self.flush();

        for body in &mut self.bodies {
            if body.gone_since.is_none() && t >= body.created() && !body.exists_at(t) {
                body.gone_since = Some(t);
            }
        }

        self.time = t;
        self.check_for_end(t);
    }

    /// Every pair of bodies existing at `t` interacts once in each direction.
    fn interact_all(&mut self, t: f64) {
        let since = t - self.config.step;
        let live: Vec<usize> = self
            .bodies
            .iter()
            .enumerate()
            .filter(|(_, body)| body.exists_at(t))
            .map(|(i, _)| i)
            .collect();

        for (n, &i) in live.iter().enumerate() {
            for &j in &live[n + 1..] {
                let (left, right) = self.bodies.split_at_mut(j);
                let a = &mut left[i];
                let b = &mut right[0];
                interact(a, b, since, t);
                interact(b, a, since, t);
            }
        }
    }

    fn flush(&mut self) {
        let spawned: Vec<Body> = self.spawner.drain().collect();
        for body in spawned {
            self.insert(body);
        }
    }

    /// Add a body at its place in (creation time, ID) order.
    fn insert(&mut self, body: Body) {
        let key = (body.created(), body.id);
        let at = self
            .bodies
            .partition_point(|other| (other.created(), other.id) <= key);
        self.bodies.insert(at, body);
    }

    /// Drop bodies gone for longer than the retention window. Ships stay.
    fn retire(&mut self, t: f64) {
        let retention = self.config.retention;
        self.bodies.retain(|body| match body.gone_since {
            Some(gone) => body.as_ship().is_some() || t - gone < retention,
            None => true,
        });
    }

    fn check_for_end(&mut self, t: f64) {
        if self.phase != MatchPhase::Active {
            return;
        }
        let alive = |team: Team| {
            self.ships()
                .any(|body| body.team() == Some(team) && body.exists_at(t))
        };
        let local = self.config.local_team;
        let outcome = match (alive(local), alive(local.opponent())) {
            (true, true) => return,
            (true, false) => Outcome::Victory,
            (false, true) => Outcome::Defeat,
            (false, false) => Outcome::Draw,
        };
        self.end(outcome, t);
    }

    fn end(&mut self, outcome: Outcome, t: f64) {
        self.phase = MatchPhase::Ended;
        self.outcome = Some(outcome);
        self.ended_at = Some(t);
        self.message = outcome.message().to_string();
        info!(?outcome, t, "match ended");
    }

    /// End the match because the peer link failed. The state stays
    /// renderable; no further orders are applied.
    pub fn abandon(&mut self, reason: &str) {
        if self.phase == MatchPhase::Ended {
            return;
        }
        warn!(reason, t = self.time, "match abandoned");
        self.end(Outcome::Abandoned, self.time);
    }

    // ---- Orders ----

    /// Apply an order, local or remote. The order is logged either way; a
    /// rejected order changes nothing else.
    pub fn receive(&mut self, order: Order) -> OrderResult {
        let team = match order.kind {
            OrderKind::Place { team, .. } | OrderKind::Ready { team } => Some(team),
            _ => self.ship(order.ship).and_then(Body::team),
        };

        let result = self.dispatch(&order);
        let shown_until = match result {
            Ok(until) => until,
            Err(reason) => {
                debug!(ship = order.ship, kind = ?order.kind, t = order.time, %reason, "order dropped");
                None
            }
        };
        self.orders.push(LoggedOrder::new(order, team, shown_until));
        result.map(|_| ())
    }

    /// Dispatch an order; on success returns the end of its marker window.
    fn dispatch(&mut self, order: &Order) -> Result<Option<f64>, OrderRejected> {
        match order.kind {
            OrderKind::Place { class, team } => {
                self.place(order.ship, team, class, order.target(), order.time)?;
                Ok(None)
            }
            OrderKind::Ready { team } => {
                self.mark_ready(team, order.time)?;
                Ok(None)
            }
            OrderKind::Move | OrderKind::Shoot | OrderKind::Special => {
                match self.phase {
                    MatchPhase::Placement => return Err(OrderRejected::NotStarted),
                    MatchPhase::Ended => return Err(OrderRejected::MatchEnded),
                    MatchPhase::Active => {}
                }
                self.act(order).map(Some)
            }
        }
    }

    fn act(&mut self, order: &Order) -> Result<f64, OrderRejected> {
        let index = self
            .ship_index(order.ship)
            .ok_or(OrderRejected::UnknownShip(order.ship))?;
        let body = &mut self.bodies[index];
        let (t, target) = (order.time, order.target());

        match order.kind {
            OrderKind::Move => body.move_to(target, t),
            OrderKind::Shoot => {
                body.shoot(target, t, &mut self.spawner)?;
                Ok(t + body.position_at(t).distance(target) / LASER_SPEED)
            }
            OrderKind::Special => {
                body.special(target, t, &mut self.spawner)?;
                Ok(t + ORDER_MARKER_LIFETIME)
            }
            OrderKind::Place { .. } | OrderKind::Ready { .. } => Err(OrderRejected::AlreadyStarted),
        }
    }

    fn place(&mut self, id: u8, team: Team, class: ShipClass, pos: DVec2, t: f64) -> OrderResult {
        if self.phase != MatchPhase::Placement || self.ready.get(team).is_some() {
            return Err(OrderRejected::AlreadyStarted);
        }
        let inside = self
            .region_of(team)
            .map_or(false, |region| region.contains(pos));
        if !inside {
            return Err(OrderRejected::OutsideRegion {
                team,
                x: pos.x,
                y: pos.y,
            });
        }
        if self.ship_index(id).is_some() {
            return Err(OrderRejected::DuplicateShip(id));
        }

        self.insert(Body::ship(id, team, class, pos, t));
        debug!(ship = id, ?team, ?class, x = pos.x, y = pos.y, "ship placed");
        Ok(())
    }

    fn mark_ready(&mut self, team: Team, t: f64) -> OrderResult {
        if self.phase != MatchPhase::Placement {
            return Err(OrderRejected::AlreadyStarted);
        }
        if !self.ships().any(|body| body.team() == Some(team)) {
            return Err(OrderRejected::EmptyFleet(team));
        }
        self.ready.set(team, t);
        info!(?team, t, "team ready");

        match self.ready.start_time() {
            Some(start) => self.start(start),
            None if team == self.config.local_team => {
                self.message = "Waiting for players...".to_string();
            }
            None => {}
        }
        Ok(())
    }

    fn start(&mut self, t: f64) {
        self.phase = MatchPhase::Active;
        self.started_at = Some(t);
        for body in &mut self.bodies {
            if let Some(region) = body.as_region_mut() {
                region.close(t);
            }
        }
        self.message.clear();
        info!(t, "match started");
    }

    // ---- Observation ----

    /// The time at which `target` is seen by the local fleet at `t`.
    ///
    /// Local bodies are seen without delay. Otherwise every local ship that
    /// exists at `t` is a vantage point and the freshest view wins; with no
    /// local ship left there is no delay.
    pub fn observed_time(&self, target: &impl Observable, t: f64) -> f64 {
        let local = self.config.local_team;
        if target.home_team() == Some(local) {
            return t;
        }
        self.ships()
            .filter(|body| body.team() == Some(local) && body.exists_at(t))
            .map(|body| {
                observation::solve(body.position_at(t), t, |s| target.position_at(s)).time
            })
            .reduce(f64::max)
            .unwrap_or(t)
    }

    /// Distance between `a` at `ta` and `b` at `tb`.
    pub fn dist(&self, a: &impl Observable, b: &impl Observable, ta: f64, tb: f64) -> f64 {
        observation::dist(a, b, ta, tb)
    }

    /// Distance between `a` and `b` as the local fleet sees them at `t`.
    pub fn observed_dist(&self, a: &impl Observable, b: &impl Observable, t: f64) -> f64 {
        let ta = self.observed_time(a, t);
        let tb = self.observed_time(b, t);
        self.dist(a, b, ta, tb)
    }

    // ---- Queries ----

    pub fn config(&self) -> &BattlefieldConfig {
        &self.config
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn local_team(&self) -> Team {
        self.config.local_team
    }

    /// Every body, ordered by creation time and then ID.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|body| body.id() == id)
    }

    /// Every ship ever placed, destroyed ones included.
    pub fn ships(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter().filter(|body| body.as_ship().is_some())
    }

    /// The ship with match ID `id`.
    pub fn ship(&self, id: u8) -> Option<&Body> {
        self.ship_index(id).map(|index| &self.bodies[index])
    }

    fn ship_index(&self, id: u8) -> Option<usize> {
        self.bodies
            .iter()
            .position(|body| body.as_ship().map(Ship::id) == Some(id))
    }

    /// Every order received, in arrival order.
    pub fn orders(&self) -> &[LoggedOrder] {
        &self.orders
    }

    /// The local team's placement region body, while it is kept.
    pub fn region(&self) -> Option<&Body> {
        let local = self.config.local_team;
        self.bodies
            .iter()
            .find(|body| body.as_region().map(Region::team) == Some(local))
    }

    fn region_of(&self, team: Team) -> Option<&Region> {
        self.bodies
            .iter()
            .filter_map(Body::as_region)
            .find(|region| region.team() == team)
    }

    /// Free text for the presentation layer; empty when there is none.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Clear the message once the presentation layer has shown it.
    pub fn dismiss_message(&mut self) {
        self.message.clear();
    }

    pub fn started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn started_at(&self) -> Option<f64> {
        self.started_at
    }

    /// True until `END_LINGER` after the match ends.
    pub fn active(&self) -> bool {
        self.ended_at
            .map_or(true, |ended| self.time < ended + END_LINGER)
    }

    // ---- Test helpers ----

    /// Put a ship on the field directly, bypassing placement.
    #[cfg(test)]
    pub(crate) fn spawn_test_ship(&mut self, id: u8, team: Team, class: ShipClass, pos: DVec2) {
        self.insert(Body::ship(id, team, class, pos, self.time));
    }

    #[cfg(test)]
    pub(crate) fn spawner_mut(&mut self) -> &mut Spawner {
        &mut self.spawner
    }
}
