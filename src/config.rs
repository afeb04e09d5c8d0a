//! Tunables for the behavior engine, loadable from JSON.
//!
//! Every field has a default, so an empty object (`{}`) is a valid config and a partial file only
//! overrides what it names.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use crate::behavior::state::PetState;
use crate::foundation::error::{PetError, PetResult};

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PetConfig {
    /// Asset discovery and catalog.
    pub assets: AssetConfig,
    /// Autonomous state scheduling.
    pub schedule: ScheduleConfig,
    /// Wander motion.
    pub motion: MotionConfig,
    /// Display scaling.
    pub display: DisplayConfig,
}

impl PetConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> PetResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate JSON text.
    pub fn from_json_str(text: &str) -> PetResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| PetError::config(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> PetResult<()> {
        self.schedule.validate()?;
        self.motion.validate()?;
        self.display.validate()?;
        if self.assets.subdir.trim().is_empty() {
            return Err(PetError::config("assets.subdir must be non-empty"));
        }
        Ok(())
    }
}

/// Where sprites live and which sprites each state may show.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Name of the sprite directory searched for by asset-root resolution.
    pub subdir: String,
    /// Candidate identifiers per state, in preference order.
    pub catalog: BTreeMap<PetState, Vec<String>>,
    /// Baseline idle identifiers; the first one that decodes fixes the reference size.
    pub reference: Vec<String>,
    /// Identifiers whose frames are resized to the reference size.
    pub normalize: Vec<String>,
    /// Identifiers decoded in the background at startup.
    pub preload: Vec<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let mut catalog = BTreeMap::new();
        catalog.insert(PetState::Idle, names(&["idle", "idle-alt", "cool", "cute"]));
        catalog.insert(PetState::Wander, names(&["fly"]));
        catalog.insert(PetState::Interact, names(&["jump", "jump-alt"]));
        catalog.insert(PetState::Drag, names(&["happy", "happy-alt"]));
        catalog.insert(PetState::Sleep, names(&["cool", "cute"]));

        Self {
            subdir: "sprites".to_string(),
            catalog,
            reference: names(&["idle", "idle-alt"]),
            normalize: names(&["cool", "cute"]),
            preload: names(&["cool", "cute"]),
        }
    }
}

/// Whole-second duration range, `min` inclusive and `max` exclusive. `min == max` is a fixed
/// duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SecondsRange {
    /// Inclusive lower bound.
    pub min: u64,
    /// Exclusive upper bound (or equal to `min` for a fixed value).
    pub max: u64,
}

impl SecondsRange {
    /// Uniform range `[min, max)`.
    pub const fn between(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Always `secs`.
    pub const fn fixed(secs: u64) -> Self {
        Self {
            min: secs,
            max: secs,
        }
    }

    /// `true` when the range always yields the same value.
    pub fn is_fixed(self) -> bool {
        self.min == self.max
    }
}

/// Per-state hold durations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StateDurations {
    /// Idle hold.
    pub idle: SecondsRange,
    /// Wander hold.
    pub wander: SecondsRange,
    /// Interact hold.
    pub interact: SecondsRange,
    /// Drag hold.
    pub drag: SecondsRange,
    /// Sleep hold.
    pub sleep: SecondsRange,
}

impl Default for StateDurations {
    fn default() -> Self {
        Self {
            idle: SecondsRange::between(3, 6),
            wander: SecondsRange::between(4, 8),
            interact: SecondsRange::fixed(2),
            drag: SecondsRange::fixed(1),
            sleep: SecondsRange::between(6, 12),
        }
    }
}

impl StateDurations {
    /// Range configured for `state`.
    pub fn for_state(&self, state: PetState) -> SecondsRange {
        match state {
            PetState::Idle => self.idle,
            PetState::Wander => self.wander,
            PetState::Interact => self.interact,
            PetState::Drag => self.drag,
            PetState::Sleep => self.sleep,
        }
    }
}

/// Autonomous scheduling policy.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Behavior tick period in milliseconds.
    pub tick_ms: u64,
    /// Probability of drawing Idle.
    pub idle_weight: f64,
    /// Probability of drawing Wander; leftover mass goes to Idle.
    pub wander_weight: f64,
    /// Hold durations.
    pub durations: StateDurations,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tick_ms: 500,
            idle_weight: 0.5,
            wander_weight: 0.35,
            durations: StateDurations::default(),
        }
    }
}

impl ScheduleConfig {
    /// Behavior tick period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn validate(&self) -> PetResult<()> {
        if self.tick_ms == 0 {
            return Err(PetError::config("schedule.tick_ms must be > 0"));
        }
        for (name, w) in [
            ("idle_weight", self.idle_weight),
            ("wander_weight", self.wander_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(PetError::config(format!(
                    "schedule.{name} must be finite and >= 0"
                )));
            }
        }
        if self.idle_weight + self.wander_weight > 1.0 {
            return Err(PetError::config("schedule weights must sum to at most 1"));
        }
        for state in PetState::ALL {
            let r = self.durations.for_state(state);
            if r.max < r.min {
                return Err(PetError::config(format!(
                    "schedule.durations.{state}: max must be >= min"
                )));
            }
            if r.max == 0 {
                return Err(PetError::config(format!(
                    "schedule.durations.{state} must be > 0 seconds"
                )));
            }
        }
        Ok(())
    }
}

/// Wander motion parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Motion tick period in milliseconds.
    pub tick_ms: u64,
    /// Distance advanced per tick, in pixels.
    pub step_px: f64,
    /// Distance under which the current waypoint counts as reached.
    pub arrive_px: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            step_px: 2.5,
            arrive_px: 2.0,
        }
    }
}

impl MotionConfig {
    /// Motion tick period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn validate(&self) -> PetResult<()> {
        if self.tick_ms == 0 {
            return Err(PetError::config("motion.tick_ms must be > 0"));
        }
        if !self.step_px.is_finite() || self.step_px <= 0.0 {
            return Err(PetError::config("motion.step_px must be finite and > 0"));
        }
        if !self.arrive_px.is_finite() || self.arrive_px < 0.0 {
            return Err(PetError::config("motion.arrive_px must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Display scale bounds for resize mode.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Smallest scale factor.
    pub min_scale: f64,
    /// Largest scale factor.
    pub max_scale: f64,
    /// Scale change per wheel notch.
    pub wheel_step: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 3.0,
            wheel_step: 0.1,
        }
    }
}

impl DisplayConfig {
    fn validate(&self) -> PetResult<()> {
        let finite = self.min_scale.is_finite()
            && self.max_scale.is_finite()
            && self.wheel_step.is_finite();
        if !finite || self.min_scale <= 0.0 || self.max_scale < self.min_scale {
            return Err(PetError::config(
                "display scale bounds must satisfy 0 < min_scale <= max_scale",
            ));
        }
        if self.wheel_step <= 0.0 {
            return Err(PetError::config("display.wheel_step must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
