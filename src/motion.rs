//! Waypoint-chasing wander motion.

/// The motion controller and its bounds helper.
pub mod controller;
