use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use image::RgbaImage;

use crate::assets::cache::AnimationCache;
use crate::behavior::machine::StateMachine;
use crate::behavior::scheduler::BehaviorScheduler;
use crate::behavior::state::PetState;
use crate::config::{DisplayConfig, PetConfig};
use crate::foundation::core::{FrameSize, Point, Vec2};
use crate::foundation::rng::PetRng;
use crate::motion::controller::{MotionController, StepOutcome};
use crate::playback::player::FramePlayer;
use crate::shell::window::PetWindow;

/// What one [`DesktopPet::pump`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PumpReport {
    /// The behavior tick ran.
    pub behavior_ticked: bool,
    /// Outcome of the motion timer, if it fired.
    pub motion: Option<StepOutcome>,
    /// The frame player advanced.
    pub frame_advanced: bool,
}

/// Single-threaded driver tying the engine to a window.
///
/// Owns the state machine and scheduler; the motion controller, frame player and window are shared
/// with the machine's observers. Pointer events arrive through [`DesktopPet::press`] and friends
/// and timers advance only inside [`DesktopPet::pump`].
pub struct DesktopPet<W: PetWindow + 'static> {
    cache: Arc<AnimationCache>,
    machine: StateMachine,
    scheduler: BehaviorScheduler,
    motion: Rc<RefCell<MotionController>>,
    player: Rc<RefCell<FramePlayer>>,
    window: Rc<RefCell<W>>,
    scale: Rc<Cell<f64>>,
    display: DisplayConfig,
    pinned: bool,
    resize_mode: bool,
    drag_offset: Option<Vec2>,
    preload: Option<JoinHandle<usize>>,
}

impl<W: PetWindow + 'static> DesktopPet<W> {
    /// Wire the engine, enter Idle, start the scheduler and kick off the background preload.
    pub fn new(
        cfg: &PetConfig,
        cache: Arc<AnimationCache>,
        window: W,
        mut rng: PetRng,
        now: Instant,
    ) -> Self {
        let preload = match cache.spawn_preload(cfg.assets.preload.clone()) {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!(%err, "background preload not started");
                None
            }
        };

        let scale = 1.0_f64.clamp(cfg.display.min_scale, cfg.display.max_scale);
        let mut pet = Self {
            scheduler: BehaviorScheduler::new(cfg.schedule, rng.child()),
            motion: Rc::new(RefCell::new(MotionController::new(cfg.motion, rng.child()))),
            player: Rc::new(RefCell::new(FramePlayer::new())),
            window: Rc::new(RefCell::new(window)),
            scale: Rc::new(Cell::new(scale)),
            display: cfg.display,
            machine: StateMachine::new(),
            cache,
            pinned: false,
            resize_mode: false,
            drag_offset: None,
            preload,
        };
        pet.wire();
        pet.machine.initialize(PetState::Idle);
        pet.scheduler.start(&pet.machine, now);
        pet
    }

    fn wire(&mut self) {
        let cache = Arc::clone(&self.cache);
        let player = Rc::clone(&self.player);
        let motion = Rc::clone(&self.motion);
        let window = Rc::clone(&self.window);
        let scale = Rc::clone(&self.scale);
        self.machine.on_entered(move |state| {
            match cache.get_random_animation(state) {
                Some(animation) => {
                    let mut player = player.borrow_mut();
                    player.start(animation);
                    if let Some(size) = player.display_size(scale.get()) {
                        window.borrow_mut().set_size(size);
                    }
                }
                None => tracing::debug!(state = %state, "keeping previous animation"),
            }

            let mut motion = motion.borrow_mut();
            if state == PetState::Wander {
                motion.start_wander(&*window.borrow());
            } else {
                motion.stop();
            }
        });

        let motion = Rc::clone(&self.motion);
        self.machine.on_exited(move |state| {
            if state == PetState::Wander {
                motion.borrow_mut().stop();
            }
        });

        let player = Rc::clone(&self.player);
        self.motion
            .borrow_mut()
            .on_facing_changed(move |facing_left| player.borrow_mut().set_facing_left(facing_left));
    }

    /// Subscribe to state-entered notifications after the built-in wiring.
    pub fn on_state_entered(&mut self, listener: impl FnMut(PetState) + 'static) {
        self.machine.on_entered(listener);
    }

    /// Subscribe to state-exited notifications after the built-in wiring.
    pub fn on_state_exited(&mut self, listener: impl FnMut(PetState) + 'static) {
        self.machine.on_exited(listener);
    }

    /// Subscribe to facing flips after the built-in wiring.
    pub fn on_facing_changed(&mut self, listener: impl FnMut(bool) + 'static) {
        self.motion.borrow_mut().on_facing_changed(listener);
    }

    /// Current behavioral state.
    pub fn state(&self) -> PetState {
        self.machine.current()
    }

    /// Shared animation cache.
    pub fn cache(&self) -> &Arc<AnimationCache> {
        &self.cache
    }

    /// Scheduler state, for inspection.
    pub fn scheduler(&self) -> &BehaviorScheduler {
        &self.scheduler
    }

    /// Motion controller, for inspection.
    pub fn motion(&self) -> Ref<'_, MotionController> {
        self.motion.borrow()
    }

    /// Frame player, for inspection.
    pub fn player(&self) -> Ref<'_, FramePlayer> {
        self.player.borrow()
    }

    /// The driven window.
    pub fn window(&self) -> Ref<'_, W> {
        self.window.borrow()
    }

    /// Frame to paint right now, mirrored when facing left.
    pub fn current_frame(&self) -> Option<Arc<RgbaImage>> {
        self.player.borrow_mut().current_frame()
    }

    /// Display scale factor.
    pub fn scale(&self) -> f64 {
        self.scale.get()
    }

    /// `true` while pinned in place.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// `true` while the wheel resizes the pet.
    pub fn is_resize_mode(&self) -> bool {
        self.resize_mode
    }

    /// `true` between [`DesktopPet::press`] and [`DesktopPet::release`].
    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// Primary-button click.
    pub fn click(&mut self, now: Instant) {
        if self.pinned {
            return;
        }
        self.scheduler.trigger_interact(&mut self.machine, now);
    }

    /// Primary-button press at `offset` inside the window; starts a drag.
    pub fn press(&mut self, offset: Vec2, now: Instant) {
        if self.pinned {
            return;
        }
        self.drag_offset = Some(offset);
        self.scheduler.begin_drag(&mut self.machine, now);
    }

    /// Pointer moved to `screen`. While dragging, the window follows with the press offset kept.
    pub fn pointer_moved(&mut self, screen: Point) {
        if let Some(offset) = self.drag_offset {
            self.window.borrow_mut().set_position(screen - offset);
        }
    }

    /// Primary-button release; ends a drag in progress.
    pub fn release(&mut self, now: Instant) {
        if self.drag_offset.take().is_some() {
            self.scheduler.end_drag(&mut self.machine, now);
        }
    }

    /// Mouse wheel in resize mode: one step up or down per call, clamped to the display bounds.
    /// Returns `true` when the scale changed.
    pub fn wheel(&mut self, delta: f64) -> bool {
        if !self.resize_mode || delta == 0.0 || !delta.is_finite() {
            return false;
        }
        let step = if delta > 0.0 {
            self.display.wheel_step
        } else {
            -self.display.wheel_step
        };
        let old = self.scale.get();
        let new = (old + step).clamp(self.display.min_scale, self.display.max_scale);
        if new == old {
            return false;
        }
        self.scale.set(new);
        if let Some(size) = self.player.borrow().display_size(new) {
            self.window.borrow_mut().set_size(size);
        }
        tracing::debug!(scale = new, "display scale changed");
        true
    }

    /// Pin: stop autonomous behavior and sleep. Unpin: back to Idle with the scheduler running.
    pub fn toggle_pinned(&mut self, now: Instant) -> bool {
        self.pinned = !self.pinned;
        if self.pinned {
            self.scheduler.stop();
            self.motion.borrow_mut().stop();
            self.machine.change_state(PetState::Sleep);
        } else {
            self.machine.change_state(PetState::Idle);
            self.scheduler.start(&self.machine, now);
        }
        tracing::info!(pinned = self.pinned, "pin toggled");
        self.pinned
    }

    /// Flip whether the wheel resizes the pet.
    pub fn toggle_resize_mode(&mut self) -> bool {
        self.resize_mode = !self.resize_mode;
        self.resize_mode
    }

    /// On-screen size of the current animation at the current scale.
    pub fn display_size(&self) -> Option<FrameSize> {
        self.player.borrow().display_size(self.scale.get())
    }

    /// Fire whichever timers are due: behavior, then motion, then frame advance.
    pub fn pump(&mut self, now: Instant) -> PumpReport {
        let behavior_ticked = self.scheduler.poll(&mut self.machine, now);

        let outcome = {
            let mut window = self.window.borrow_mut();
            self.motion.borrow_mut().poll(&mut *window, now)
        };
        let motion = (outcome != StepOutcome::Stopped).then_some(outcome);

        let frame_advanced = self.player.borrow_mut().poll(now);
        PumpReport {
            behavior_ticked,
            motion,
            frame_advanced,
        }
    }

    /// Wait for the background preload; `None` if it was not started or already joined.
    pub fn join_preload(&mut self) -> Option<usize> {
        let handle = self.preload.take()?;
        match handle.join() {
            Ok(loaded) => Some(loaded),
            Err(_) => {
                tracing::warn!("background preload panicked");
                None
            }
        }
    }
}

impl<W: PetWindow + 'static> std::fmt::Debug for DesktopPet<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopPet")
            .field("state", &self.state())
            .field("pinned", &self.pinned)
            .field("resize_mode", &self.resize_mode)
            .field("dragging", &self.is_dragging())
            .field("scale", &self.scale.get())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shell/pet.rs"]
mod tests;
