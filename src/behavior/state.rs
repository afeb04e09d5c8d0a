/// Activity mode the pet is in.
///
/// Every value is valid at all times; a state whose catalog entry is empty simply keeps showing
/// whatever animation was on screen before.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PetState {
    /// Standing around.
    #[default]
    Idle,
    /// Walking between random waypoints.
    Wander,
    /// Reacting to a click.
    Interact,
    /// Held by the pointer.
    Drag,
    /// Pinned in place.
    Sleep,
}

impl PetState {
    /// All states in declaration order.
    pub const ALL: [PetState; 5] = [
        PetState::Idle,
        PetState::Wander,
        PetState::Interact,
        PetState::Drag,
        PetState::Sleep,
    ];

    /// Lowercase name used in logs and config keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Wander => "wander",
            Self::Interact => "interact",
            Self::Drag => "drag",
            Self::Sleep => "sleep",
        }
    }
}

impl std::fmt::Display for PetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/state.rs"]
mod tests;
