//! Headless shell: the window seam and the driver wiring the engine to it.

/// Event-driven pet driver.
pub mod pet;
/// Window placement trait and an in-memory implementation.
pub mod window;
