//! Behavioral states, the notification hub and the autonomous scheduling policy.

/// Transition notifications.
pub mod machine;
/// Timed, weighted state selection and pointer-driven overrides.
pub mod scheduler;
/// The behavioral state enum.
pub mod state;
