//! Shared types for the spincube workspace.
//!
//! # Invariants
//! - Euler angles are stored in degrees and kept in `[0, 360)`.

pub mod types;

pub use types::{Transformable, wrap_degrees, wrap_euler};
