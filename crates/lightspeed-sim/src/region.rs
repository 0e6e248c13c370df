//! Placement regions: the area each team may place ships in before the
//! match starts.

use glam::DVec2;
use serde::Serialize;

use lightspeed_core::constants::*;
use lightspeed_core::enums::Team;

use crate::body::{Body, BodyKind, Motion};
use crate::spawner::{derive_id, REGION_LINEAGE};

#[derive(Debug, Clone, Serialize)]
pub struct Region {
    team: Team,
    center: DVec2,
    half_extents: DVec2,
    /// Match start; the region is gone from then on.
    closes_at: Option<f64>,
}

impl Region {
    pub fn new(team: Team) -> Self {
        let offset = match team {
            Team::Blue => PLACEMENT_OFFSET,
            Team::Red => -PLACEMENT_OFFSET,
        };
        Self {
            team,
            center: DVec2::new(0.0, offset),
            half_extents: DVec2::new(PLACEMENT_HALF_WIDTH, PLACEMENT_HALF_HEIGHT),
            closes_at: None,
        }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn half_extents(&self) -> DVec2 {
        self.half_extents
    }

    pub fn closes_at(&self) -> Option<f64> {
        self.closes_at
    }

    pub(crate) fn close(&mut self, t: f64) {
        self.closes_at.get_or_insert(t);
    }

    pub(crate) fn open_at(&self, t: f64) -> bool {
        self.closes_at.map_or(true, |closed| t < closed)
    }

    /// Whether `point` lies inside the region, edges included.
    pub fn contains(&self, point: DVec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y
    }

    pub fn sprite_name(&self) -> String {
        format!("region{}", self.team.sprite_suffix())
    }
}

impl Body {
    /// A team's placement region, open from `t` until the match starts.
    pub fn region(team: Team, t: f64) -> Self {
        let region = Region::new(team);
        let mut body = Body::new(
            Motion::new(region.center, DVec2::ZERO, t),
            BodyKind::Region(region),
        );
        body.id = derive_id(REGION_LINEAGE, team as u64);
        body
    }
}
