//! Siren lifecycle state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle of one siren activation.
///
/// ```text
/// Active ──cancel──▶ Cancelling ──▶ Expired
///    └──────────timer fires──────────▲
/// ```
///
/// Only an `Active` siren may be cancelled or expire. Whichever of the two
/// moves it first wins; the other finds a non-`Active` state and does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SirenState {
    Active,
    Cancelling,
    Expired,
}

impl SirenState {
    pub fn is_active(&self) -> bool {
        matches!(self, SirenState::Active)
    }
}

impl StateMachine for SirenState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SirenState::*;
        matches!(
            (self, target),
            (Active, Cancelling) | (Active, Expired) | (Cancelling, Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SirenState::*;
        match self {
            Active => vec![Cancelling, Expired],
            Cancelling => vec![Expired],
            Expired => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_can_be_cancelled_or_expire() {
        assert!(SirenState::Active.can_transition_to(&SirenState::Cancelling));
        assert!(SirenState::Active.can_transition_to(&SirenState::Expired));
    }

    #[test]
    fn cancelling_only_completes() {
        assert_eq!(SirenState::Cancelling.valid_transitions(), vec![SirenState::Expired]);
        assert!(SirenState::Cancelling.transition_to(SirenState::Active).is_err());
    }

    #[test]
    fn expired_is_terminal() {
        assert!(SirenState::Expired.is_terminal());
        assert!(SirenState::Expired.transition_to(SirenState::Cancelling).is_err());
    }

    #[test]
    fn valid_transitions_agree_with_can_transition_to() {
        for state in [SirenState::Active, SirenState::Cancelling, SirenState::Expired] {
            for target in state.valid_transitions() {
                assert!(state.can_transition_to(&target), "{:?} -> {:?}", state, target);
            }
        }
    }
}
