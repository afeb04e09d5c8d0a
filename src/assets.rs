//! Sprite discovery, decoding and the shared animation cache.

/// Immutable decoded frame sequences.
pub mod animation;
/// Single-flight, never-evicted animation cache.
pub mod cache;
/// Per-state candidate lists and asset-root discovery.
pub mod catalog;
pub mod codec;
