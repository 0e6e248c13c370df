//! Core types and definitions for the LIGHTSPEED simulation.
//!
//! This crate defines the vocabulary shared across the other crates: units,
//! tuning constants, timeline attributes, orders, and rejection errors.
//! It has no dependency on the simulation driver or any transport.

pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod orders;
pub mod timeline;
pub mod types;
pub mod units;
