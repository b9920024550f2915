use common::types::cluster::ClusterMode;
use common::types::transition_state::TransitionState;

/// Remembers the mode of the last published result and reports when a new
/// result crosses the pin/cluster boundary. The coordinator owns the settle
/// timer that brings the state back to `Stable`.
#[derive(Debug, Default)]
pub struct TransitionTracker {
    last_mode: Option<ClusterMode>,
    state: TransitionState,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn last_mode(&self) -> Option<ClusterMode> {
        self.last_mode
    }

    /// Records the mode of a result about to be published and returns the
    /// resulting state. Without a mode change the current state is kept, so an
    /// unsettled transition is not cut short by a same-mode result.
    pub fn observe(&mut self, mode: ClusterMode) -> TransitionState {
        let previous = self.last_mode.replace(mode);
        self.state = match (previous, mode) {
            (Some(ClusterMode::Grid), ClusterMode::IndividualPins) => {
                TransitionState::SplittingToIndividual
            }
            (Some(ClusterMode::IndividualPins), ClusterMode::Grid) => {
                TransitionState::MergingToClusters
            }
            _ => self.state,
        };
        self.state
    }

    pub fn settle(&mut self) -> TransitionState {
        self.state = TransitionState::Stable;
        self.state
    }
}
