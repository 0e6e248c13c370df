//! Simulation constants and tuning parameters.

use crate::units::*;

// --- Ships ---

/// Health a ship is placed with.
pub const SHIP_INITIAL_HEALTH: f64 = 1.5 * MJ;

/// Energy a ship is placed with.
pub const SHIP_INITIAL_ENERGY: f64 = 5.0 * MJ;

/// Cruising speed of an ordinary fighter.
pub const FIGHTER_SPEED: f64 = C / 8.0;

/// Cruising speed of a steamship.
pub const STEAMSHIP_SPEED: f64 = C / 10.0;

/// Cruising speed of a lamplighter.
pub const LAMPLIGHTER_SPEED: f64 = C / 12.0;

/// Energy a steamship spends to release a gas cloud.
pub const STEAMSHIP_SPECIAL_COST: f64 = 1.5 * MJ;

/// Energy a lamplighter spends on an ultraviolet shot.
pub const LAMPLIGHTER_SPECIAL_COST: f64 = 1.0 * MJ;

/// Payload of an ultraviolet laser.
pub const UV_LASER_ENERGY: f64 = 0.5 * MJ;

/// Payload of an ordinary shot.
pub const SHOT_ENERGY: f64 = 1.0 * MJ;

/// Collision radius of a ship. Ships are hit as points.
pub const SHIP_RADIUS: f64 = 0.0 * M;

/// Extra gap between a laser's blast radius and the ship that fired it.
pub const SHOT_SPAWN_CLEARANCE: f64 = 1.0 * M;

// --- Lasers ---

/// Lasers travel at the speed of light.
pub const LASER_SPEED: f64 = C;

/// Distance a laser covers before it dissipates.
pub const LASER_RANGE: f64 = 2000.0 * M;

/// Blast radius of a one-megajoule laser; scales with the square root of energy.
pub const LASER_RADIUS_PER_ROOT_MJ: f64 = 12.0 * M;

// --- Gas clouds ---

/// A speed related to the initial rate of expansion.
pub const GAS_CLOUD_SPEED: f64 = C / 30.0;

/// A time related to the total lifetime of a cloud.
pub const GAS_CLOUD_LIFETIME: f64 = 30.0 * S;

/// Charging time constant of the energy held in a cloud.
pub const GAS_CLOUD_HALF_LIFE: f64 = 5.0 * S;

/// Energy a cloud needs to build up before it re-emits a laser.
pub const GAS_CLOUD_LASER_ENERGY: f64 = 0.1 * MJ;

/// Upper bound on lasers one cloud may emit in a single update.
pub const MAX_EMISSIONS_PER_UPDATE: u32 = 32;

// --- Placement ---

/// Half-width of a team's placement region.
pub const PLACEMENT_HALF_WIDTH: f64 = 400.0 * M;

/// Half-height of a team's placement region.
pub const PLACEMENT_HALF_HEIGHT: f64 = 150.0 * M;

/// Distance from the origin to the center of each placement region.
pub const PLACEMENT_OFFSET: f64 = 450.0 * M;

// --- Orders ---

/// How long a special-order marker stays on screen.
pub const ORDER_MARKER_LIFETIME: f64 = 1.0 * S;

// --- Light delay ---

/// Iteration cap for the observed-time fixed point.
pub const OBSERVATION_MAX_ITERATIONS: u32 = 24;

/// Convergence tolerance for the observed-time fixed point.
pub const OBSERVATION_TOLERANCE: f64 = 1.0e-9 * MS;

// --- Battlefield ---

/// Default spacing of the interaction tick grid.
pub const DEFAULT_STEP: f64 = 10.0 * MS;

/// Default time a gone body is kept so distant observers can still see it.
pub const DEFAULT_RETENTION: f64 = 10.0 * S;

/// Most interaction ticks one `update` call will run before skipping ahead.
pub const MAX_TICKS_PER_UPDATE: u64 = 2_000;

/// How long a finished match stays active for the result message.
pub const END_LINGER: f64 = 3.0 * S;

// --- Presentation ---

/// Sprite drawn when a sprite lookup misses.
pub const DEFAULT_SPRITE: &str = "null";

/// Radius a gas cloud sprite is drawn at when unscaled.
pub const GAS_SPRITE_RADIUS: f64 = 100.0 * M;

/// Radius a laser sprite is drawn at when unscaled.
pub const LASER_SPRITE_RADIUS: f64 = 12.0 * M;
