use crate::behavior::state::PetState;

type Listener = Box<dyn FnMut(PetState)>;

/// Holds the current [`PetState`] and notifies subscribers of transitions.
///
/// The machine imposes no transition rules; which state may follow which is decided by callers
/// (the behavior scheduler, pointer handling). Listeners run synchronously on the calling thread
/// in registration order.
#[derive(Default)]
pub struct StateMachine {
    current: PetState,
    entered: Vec<Listener>,
    exited: Vec<Listener>,
}

impl StateMachine {
    /// Create a machine in [`PetState::Idle`] with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn current(&self) -> PetState {
        self.current
    }

    /// Register a listener for "entered" notifications.
    pub fn on_entered(&mut self, listener: impl FnMut(PetState) + 'static) {
        self.entered.push(Box::new(listener));
    }

    /// Register a listener for "exited" notifications.
    pub fn on_exited(&mut self, listener: impl FnMut(PetState) + 'static) {
        self.exited.push(Box::new(listener));
    }

    /// Set the starting state and fire only "entered".
    pub fn initialize(&mut self, state: PetState) {
        self.current = state;
        tracing::debug!(state = %state, "state initialized");
        self.notify_entered(state);
    }

    /// Transition to `target`.
    ///
    /// No-op when `target` is already current. Otherwise fires `exited(previous)`, switches, then
    /// fires `entered(target)`. Returns `true` when a transition happened.
    pub fn change_state(&mut self, target: PetState) -> bool {
        if target == self.current {
            return false;
        }

        let previous = self.current;
        for listener in &mut self.exited {
            listener(previous);
        }
        self.current = target;
        tracing::debug!(from = %previous, to = %target, "state changed");
        self.notify_entered(target);
        true
    }

    fn notify_entered(&mut self, state: PetState) {
        for listener in &mut self.entered {
            listener(state);
        }
    }
}

impl std::fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("entered_listeners", &self.entered.len())
            .field("exited_listeners", &self.exited.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/machine.rs"]
mod tests;
