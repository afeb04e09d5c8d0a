use std::time::Instant;

use crate::config::MotionConfig;
use crate::foundation::core::{FrameSize, Point, Rect, Vec2};
use crate::foundation::rng::PetRng;
use crate::foundation::ticker::Ticker;
use crate::shell::window::PetWindow;

/// Result of one motion step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// Not wandering; nothing happened.
    Stopped,
    /// The waypoint was reached; a new one was picked and the window did not move.
    Retargeted(Point),
    /// The window moved to this position.
    Moved(Point),
}

/// Drives the window toward random waypoints while the pet wanders.
pub struct MotionController {
    cfg: MotionConfig,
    rng: PetRng,
    ticker: Ticker,
    target: Point,
    moving: bool,
    facing_left: bool,
    facing_listeners: Vec<Box<dyn FnMut(bool)>>,
}

impl MotionController {
    /// Create a stopped controller facing right.
    pub fn new(cfg: MotionConfig, rng: PetRng) -> Self {
        Self {
            ticker: Ticker::new(cfg.tick_interval()),
            cfg,
            rng,
            target: Point::ZERO,
            moving: false,
            facing_left: false,
            facing_listeners: Vec::new(),
        }
    }

    /// Register a listener for facing flips; receives the new "facing left" flag.
    pub fn on_facing_changed(&mut self, listener: impl FnMut(bool) + 'static) {
        self.facing_listeners.push(Box::new(listener));
    }

    /// `true` while wandering.
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// `true` when the sprite should be mirrored.
    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    /// Waypoint currently being chased.
    pub fn target(&self) -> Point {
        self.target
    }

    /// Pick a first waypoint and start ticking.
    pub fn start_wander(&mut self, window: &dyn PetWindow) {
        self.moving = true;
        self.target = self.random_target(window);
        self.ticker.arm();
        tracing::debug!(x = self.target.x, y = self.target.y, "wander started");
    }

    /// Halt immediately.
    pub fn stop(&mut self) {
        self.moving = false;
        self.ticker.disarm();
    }

    /// Step if the motion timer is due.
    pub fn poll(&mut self, window: &mut dyn PetWindow, now: Instant) -> StepOutcome {
        if !self.ticker.poll(now) {
            return StepOutcome::Stopped;
        }
        self.step(window)
    }

    /// Advance one step toward the waypoint.
    ///
    /// A facing flip is announced before the window moves.
    pub fn step(&mut self, window: &mut dyn PetWindow) -> StepOutcome {
        if !self.moving {
            return StepOutcome::Stopped;
        }

        let current = window.position();
        let delta: Vec2 = self.target - current;
        let distance = delta.hypot();

        if distance < self.cfg.arrive_px {
            self.target = self.random_target(window);
            return StepOutcome::Retargeted(self.target);
        }

        let facing_left = delta.x < 0.0;
        if facing_left != self.facing_left {
            self.facing_left = facing_left;
            for listener in &mut self.facing_listeners {
                listener(facing_left);
            }
        }

        // Whole-pixel steps truncated toward zero; the final step lands on the waypoint.
        let next = if distance <= self.cfg.step_px {
            self.target
        } else {
            let advance = delta / distance * self.cfg.step_px;
            Point::new(current.x + advance.x.trunc(), current.y + advance.y.trunc())
        };
        window.set_position(next);
        StepOutcome::Moved(next)
    }

    fn random_target(&mut self, window: &dyn PetWindow) -> Point {
        let bounds = wander_bounds(window.work_area(), window.size());
        let x = self.rng.gen_range(bounds.x0 as i64..=bounds.x1 as i64);
        let y = self.rng.gen_range(bounds.y0 as i64..=bounds.y1 as i64);
        Point::new(x as f64, y as f64)
    }
}

/// Range of top-left positions that keep a window of `size` fully inside `area`.
///
/// Degenerates to the area's top-left corner on an axis where the window is larger than the area.
pub fn wander_bounds(area: Rect, size: FrameSize) -> Rect {
    let left = area.x0.round();
    let top = area.y0.round();
    let max_x = (area.x1.round() - f64::from(size.width)).max(left);
    let max_y = (area.y1.round() - f64::from(size.height)).max(top);
    Rect::new(left, top, max_x, max_y)
}

impl std::fmt::Debug for MotionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionController")
            .field("target", &self.target)
            .field("moving", &self.moving)
            .field("facing_left", &self.facing_left)
            .field("facing_listeners", &self.facing_listeners.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/controller.rs"]
mod tests;
