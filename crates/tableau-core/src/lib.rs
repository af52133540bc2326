//! # tableau-core
//!
//! Core types and primitives for the Tableau scene composer.
//! This crate contains foundational types shared across all Tableau crates:
//! colors, scene-space geometry, durations, configuration and error types.

pub mod color;
pub mod config;
pub mod error;
pub mod hash;
pub mod math;
pub mod time;

pub use color::Color;
pub use config::TableauConfig;
pub use error::{TableauError, TableauResult};
pub use hash::ContentHash;
pub use math::{Bounds, Corner, Direction, Point3D, Size2D};
pub use time::{Duration, Timestamp};
