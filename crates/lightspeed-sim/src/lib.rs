//! Simulation for LIGHTSPEED.
//!
//! Owns every body on the battlefield, applies orders, resolves
//! interactions on a fixed tick grid, and answers light-delayed queries for
//! the presentation layer. Headless and transport-agnostic.

pub mod battlefield;
pub mod body;
pub mod gas_cloud;
mod interaction;
pub mod laser;
pub mod observation;
pub mod order_log;
pub mod presentation;
pub mod region;
pub mod ship;
pub mod spawner;

pub use battlefield::{Battlefield, BattlefieldConfig};
pub use body::{Body, BodyId, BodyKind};
pub use lightspeed_core as core;

#[cfg(test)]
mod tests;
