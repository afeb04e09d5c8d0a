use std::time::{Duration, Instant};

use crate::behavior::machine::StateMachine;
use crate::behavior::state::PetState;
use crate::config::ScheduleConfig;
use crate::foundation::rng::PetRng;
use crate::foundation::ticker::Ticker;

/// Map a uniform roll in `[0, 1)` to the next autonomous state.
///
/// Only Idle and Wander are ever drawn; Sleep and Interact are reached through explicit triggers.
pub fn pick_next_state(roll: f64, cfg: &ScheduleConfig) -> PetState {
    if roll < cfg.idle_weight {
        return PetState::Idle;
    }
    if roll < cfg.idle_weight + cfg.wander_weight {
        return PetState::Wander;
    }
    PetState::Idle
}

/// Autonomous policy layer that decides when and where the [`StateMachine`] moves.
///
/// The scheduler never owns the machine; every operation borrows it so pointer handling and
/// pinning can drive the same machine directly.
#[derive(Debug)]
pub struct BehaviorScheduler {
    cfg: ScheduleConfig,
    rng: PetRng,
    ticker: Ticker,
    last_interaction: Option<Instant>,
    state_end: Option<Instant>,
    override_active: bool,
}

impl BehaviorScheduler {
    /// Create a stopped scheduler.
    pub fn new(cfg: ScheduleConfig, rng: PetRng) -> Self {
        Self {
            ticker: Ticker::new(cfg.tick_interval()),
            cfg,
            rng,
            last_interaction: None,
            state_end: None,
            override_active: false,
        }
    }

    /// Arm the periodic tick and give the current state a fresh hold time.
    pub fn start(&mut self, machine: &StateMachine, now: Instant) {
        self.state_end = Some(now + self.sample_duration(machine.current()));
        self.ticker.arm();
    }

    /// Disarm the periodic tick.
    pub fn stop(&mut self) {
        self.ticker.disarm();
    }

    /// `true` while the periodic tick is armed.
    pub fn is_running(&self) -> bool {
        self.ticker.is_armed()
    }

    /// `true` while a drag suspends autonomous transitions.
    pub fn is_override_active(&self) -> bool {
        self.override_active
    }

    /// When the current state's hold time runs out.
    pub fn state_end(&self) -> Option<Instant> {
        self.state_end
    }

    /// Last pointer interaction seen by the scheduler.
    pub fn last_interaction(&self) -> Option<Instant> {
        self.last_interaction
    }

    /// Record a pointer interaction.
    pub fn register_interaction(&mut self, now: Instant) {
        self.last_interaction = Some(now);
    }

    /// Run the tick handler if the periodic timer is due. Returns `true` when it ran.
    pub fn poll(&mut self, machine: &mut StateMachine, now: Instant) -> bool {
        if !self.ticker.poll(now) {
            return false;
        }
        self.tick(machine, now);
        true
    }

    /// Tick handler: once the hold time has elapsed, draw the next state and a new hold time.
    pub fn tick(&mut self, machine: &mut StateMachine, now: Instant) {
        if self.override_active {
            return;
        }
        if machine.current() == PetState::Interact && !self.elapsed(now) {
            return;
        }
        if !self.elapsed(now) {
            return;
        }

        let next = pick_next_state(self.rng.roll(), &self.cfg);
        machine.change_state(next);
        let hold = self.sample_duration(next);
        self.state_end = Some(now + hold);
        tracing::debug!(state = %next, hold_ms = hold.as_millis() as u64, "scheduled next state");
    }

    /// Click reaction: force Interact for its fixed hold time.
    pub fn trigger_interact(&mut self, machine: &mut StateMachine, now: Instant) {
        self.register_interaction(now);
        machine.change_state(PetState::Interact);
        self.state_end = Some(now + self.sample_duration(PetState::Interact));
    }

    /// Pointer pressed: suspend autonomous ticks and force Drag.
    pub fn begin_drag(&mut self, machine: &mut StateMachine, now: Instant) {
        self.register_interaction(now);
        self.override_active = true;
        machine.change_state(PetState::Drag);
    }

    /// Pointer released: resume autonomous ticks from a fresh Idle hold.
    pub fn end_drag(&mut self, machine: &mut StateMachine, now: Instant) {
        self.override_active = false;
        machine.change_state(PetState::Idle);
        self.state_end = Some(now + self.sample_duration(PetState::Idle));
    }

    fn elapsed(&self, now: Instant) -> bool {
        self.state_end.is_none_or(|end| now >= end)
    }

    fn sample_duration(&mut self, state: PetState) -> Duration {
        let range = self.cfg.durations.for_state(state);
        let secs = if range.is_fixed() {
            range.min
        } else {
            self.rng.gen_range(range.min..range.max)
        };
        Duration::from_secs(secs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/scheduler.rs"]
mod tests;
