use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the map is switching between pins and clusters. Only used to time
/// animations; it never affects clustering results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionState {
    #[default]
    Stable,
    /// Grid clusters are breaking up into individual pins.
    SplittingToIndividual,
    /// Individual pins are folding into grid clusters.
    MergingToClusters,
}

impl TransitionState {
    pub fn is_transitioning(&self) -> bool {
        !matches!(self, TransitionState::Stable)
    }
}

impl fmt::Display for TransitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionState::Stable => write!(f, "Stable"),
            TransitionState::SplittingToIndividual => write!(f, "Splitting to individual pins"),
            TransitionState::MergingToClusters => write!(f, "Merging to clusters"),
        }
    }
}
