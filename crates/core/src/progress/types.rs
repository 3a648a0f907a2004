//! Types for the progress module.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::TitleId;

/// Status of one phase of one title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    InProgress,
    Complete,
    Failed,
}

impl PhaseStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Complete | Self::Failed => 2,
        }
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Whether moving from `self` to `next` keeps the phase monotonic.
    pub fn can_transition_to(self, next: PhaseStatus) -> bool {
        self == next || (!self.is_terminal() && next.rank() > self.rank())
    }

    /// Label shown in the progress table.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two independently tracked lifecycles of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Extraction,
    Encoding,
}

/// One row of the progress table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleProgress {
    /// Title identity.
    pub id: TitleId,
    /// Display name (the raw file name).
    pub title: String,
    /// Extraction phase status.
    pub extraction: PhaseStatus,
    /// Encoding phase status.
    pub encoding: PhaseStatus,
}

impl TitleProgress {
    /// Creates a row with both phases pending.
    pub fn new(id: TitleId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            extraction: PhaseStatus::Pending,
            encoding: PhaseStatus::Pending,
        }
    }

    /// Status of the given phase.
    pub fn phase(&self, phase: Phase) -> PhaseStatus {
        match phase {
            Phase::Extraction => self.extraction,
            Phase::Encoding => self.encoding,
        }
    }

    pub(crate) fn phase_mut(&mut self, phase: Phase) -> &mut PhaseStatus {
        match phase {
            Phase::Extraction => &mut self.extraction,
            Phase::Encoding => &mut self.encoding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        use PhaseStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Complete));
        assert!(InProgress.can_transition_to(Failed));
        assert!(Pending.can_transition_to(Complete));
        assert!(Complete.can_transition_to(Complete));
    }

    #[test]
    fn test_regressions_rejected() {
        use PhaseStatus::*;
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Complete.can_transition_to(InProgress));
        assert!(!Complete.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Complete));
        assert!(!Failed.can_transition_to(Pending));
    }

    #[test]
    fn test_new_row_is_pending() {
        let row = TitleProgress::new(TitleId::new(0, 1), "a.mkv");
        assert_eq!(row.phase(Phase::Extraction), PhaseStatus::Pending);
        assert_eq!(row.phase(Phase::Encoding), PhaseStatus::Pending);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(PhaseStatus::InProgress.to_string(), "In Progress");
        assert_eq!(
            serde_json::to_string(&PhaseStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
