//! Shared primitives: geometry, errors, randomness and timers.

/// Geometry re-exports and frame sizes.
pub mod core;
/// Crate error type.
pub mod error;
pub mod rng;
/// Periodic timer driven by explicit instants.
pub mod ticker;
