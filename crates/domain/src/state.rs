//! Probe execution state for UI binding.
//!
//! The inspector's response area is driven by this state machine:
//! - `Idle`: nothing sent yet, or reset on close
//! - `Loading`: probe in flight, show the spinner
//! - `Settled`: probe finished, show the response panel

use crate::probe::ProbeOutcome;

/// Current state of the inspector's probe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProbeState {
    /// No probe has been sent yet.
    #[default]
    Idle,

    /// Probe in progress.
    Loading,

    /// Probe finished.
    Settled {
        /// What came back.
        outcome: ProbeOutcome,
    },
}

impl ProbeState {
    /// Creates a Settled state.
    #[must_use]
    pub const fn settled(outcome: ProbeOutcome) -> Self {
        Self::Settled { outcome }
    }

    /// Returns true if the state is Idle.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if a probe is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The settled outcome, if any.
    #[must_use]
    pub const fn outcome(&self) -> Option<&ProbeOutcome> {
        match self {
            Self::Settled { outcome } => Some(outcome),
            _ => None,
        }
    }
}
