//! State machine trait for lifecycle enums.

use super::ValidationError;

/// Lifecycle enum with a closed set of legal transitions.
///
/// Implementors list their legal edges; callers move between states with
/// [`StateMachine::transition_to`], which refuses anything not listed.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if moving from self to target is legal.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all legal target states from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs a checked transition.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// True when no outgoing transitions exist.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Off,
        On,
        Broken,
    }

    impl StateMachine for Light {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Light::Off => vec![Light::On],
                Light::On => vec![Light::Off, Light::Broken],
                Light::Broken => vec![],
            }
        }
    }

    #[test]
    fn legal_transition_returns_target() {
        assert_eq!(Light::Off.transition_to(Light::On), Ok(Light::On));
    }

    #[test]
    fn illegal_transition_is_rejected() {
        let err = Light::Off.transition_to(Light::Broken).unwrap_err();
        assert_eq!(err.field(), "state_transition");
    }

    #[test]
    fn terminal_state_has_no_exits() {
        assert!(Light::Broken.is_terminal());
        assert!(!Light::On.is_terminal());
    }
}
