//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Which side of the match a ship fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The hosting peer.
    Blue,
    /// The joining peer.
    Red,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }

    /// Sprite suffix for this team's ships.
    pub fn sprite_suffix(self) -> &'static str {
        match self {
            Team::Blue => "_b",
            Team::Red => "_r",
        }
    }

    /// Offset applied to ship IDs so the two fleets never collide.
    pub fn id_base(self) -> u8 {
        match self {
            Team::Blue => 0,
            Team::Red => 16,
        }
    }
}

/// Ship class, selecting speed and the behavior of `special`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    /// Ordinary ship with no special ability.
    #[default]
    Fighter,
    /// Releases gas clouds that absorb visible lasers.
    Steamship,
    /// Fires ultraviolet lasers that pass through gas.
    Lamplighter,
}

impl ShipClass {
    /// Every class, in placement-menu order.
    pub const ALL: [ShipClass; 3] = [
        ShipClass::Fighter,
        ShipClass::Steamship,
        ShipClass::Lamplighter,
    ];

    pub fn speed(self) -> f64 {
        match self {
            ShipClass::Fighter => FIGHTER_SPEED,
            ShipClass::Steamship => STEAMSHIP_SPEED,
            ShipClass::Lamplighter => LAMPLIGHTER_SPEED,
        }
    }

    /// Energy cost of the special ability, if the class has one.
    pub fn special_cost(self) -> Option<f64> {
        match self {
            ShipClass::Fighter => None,
            ShipClass::Steamship => Some(STEAMSHIP_SPECIAL_COST),
            ShipClass::Lamplighter => Some(LAMPLIGHTER_SPECIAL_COST),
        }
    }

    pub fn sprite(self) -> &'static str {
        match self {
            ShipClass::Fighter => "ship_fighter",
            ShipClass::Steamship => "ship_steamship",
            ShipClass::Lamplighter => "ship_lamplighter",
        }
    }

    /// The ship ID a team's placement of this class receives.
    pub fn placement_id(self, team: Team) -> u8 {
        let index = ShipClass::ALL
            .iter()
            .position(|c| *c == self)
            .unwrap_or_default() as u8;
        team.id_base() + index
    }
}

/// Laser wavelength.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaserKind {
    /// Ordinary laser, absorbed by gas clouds.
    #[default]
    Visible,
    /// Passes through gas clouds.
    Ultraviolet,
}

/// Match lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Teams are placing ships inside their regions.
    #[default]
    Placement,
    /// Both teams are ready; orders are being applied.
    Active,
    /// One team has no ships left, or the link dropped.
    Ended,
}

/// Final result of a match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
    Draw,
    /// The peer link closed before the match was decided.
    Abandoned,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Victory => "Victory!",
            Outcome::Defeat => "Defeat",
            Outcome::Draw => "Mutual destruction",
            Outcome::Abandoned => "Connection lost",
        }
    }
}

/// Sound effects a body can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    /// A laser leaves its ship.
    Pew,
    /// Engines fire at the start and end of a move.
    Blast,
    /// A ship is destroyed.
    Boom,
    /// A gas cloud is released.
    Woosh,
}

impl Sound {
    pub fn name(self) -> &'static str {
        match self {
            Sound::Pew => "pew",
            Sound::Blast => "blast",
            Sound::Boom => "boom",
            Sound::Woosh => "woosh",
        }
    }
}
