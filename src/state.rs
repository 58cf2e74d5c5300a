//! Future settlement state machine

/// Lifecycle state of a future.
///
/// A future starts `Running` and settles exactly once into one of the two
/// terminal states. No transition ever leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FutureState {
    /// The computation has not settled yet
    #[default]
    Running,
    /// Settled with a value
    Resolved,
    /// Settled with an error: computation error, panic, cancel, or timeout
    Failed,
}

impl FutureState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Failed)
    }

    /// Valid state transitions
    pub fn can_transition_to(&self, next: FutureState) -> bool {
        matches!(
            (self, next),
            (Self::Running, Self::Resolved) | (Self::Running, Self::Failed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_running() {
        assert_eq!(FutureState::default(), FutureState::Running);
        assert!(!FutureState::Running.is_terminal());
    }

    #[test]
    fn test_terminal_states() {
        assert!(FutureState::Resolved.is_terminal());
        assert!(FutureState::Failed.is_terminal());
    }

    #[test]
    fn test_transitions() {
        assert!(FutureState::Running.can_transition_to(FutureState::Resolved));
        assert!(FutureState::Running.can_transition_to(FutureState::Failed));

        // nothing leaves a terminal state
        assert!(!FutureState::Resolved.can_transition_to(FutureState::Running));
        assert!(!FutureState::Resolved.can_transition_to(FutureState::Failed));
        assert!(!FutureState::Failed.can_transition_to(FutureState::Running));
        assert!(!FutureState::Failed.can_transition_to(FutureState::Resolved));
        assert!(!FutureState::Running.can_transition_to(FutureState::Running));
    }
}
