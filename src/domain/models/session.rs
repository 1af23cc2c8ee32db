//! Run session state and the extraction state machine vocabulary.

use serde::{Deserialize, Serialize};

use super::ui::{Bounds, NodeId};

/// States of one extraction run.
///
/// `Idle`, `Complete` and `Error` are terminal: `start` is only accepted
/// from one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    OpeningHost,
    NavigatingToMenu,
    NavigatingToTargets,
    ScanningTargets,
    OpeningTarget,
    ExtractingMembers,
    Returning,
    Reconciling,
    Complete,
    Error,
}

impl RunState {
    /// Whether a new run may be started from this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Idle | Self::Complete | Self::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::OpeningHost => "opening_host",
            Self::NavigatingToMenu => "navigating_to_menu",
            Self::NavigatingToTargets => "navigating_to_targets",
            Self::ScanningTargets => "scanning_targets",
            Self::OpeningTarget => "opening_target",
            Self::ExtractingMembers => "extracting_members",
            Self::Returning => "returning",
            Self::Reconciling => "reconciling",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to an enumerated target row, with enough context to re-find it
/// on a fresh snapshot: label text first, recorded bounds center as the
/// one-shot coordinate fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetHandle {
    pub node: NodeId,
    pub label: Option<String>,
    pub bounds: Bounds,
}

impl TargetHandle {
    /// Display name for the list this target opens.
    pub fn list_name(&self, index: usize) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("List {}", index + 1))
    }
}

/// Mutable state of one run, owned by the engine behind its coarse lock.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: RunState,
    pub progress: String,
    /// Monotonic step counter, reset only by a new `start`.
    pub step: u32,
    pub targets: Vec<TargetHandle>,
    pub current_target: usize,
    pub current_list_name: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
            progress: String::new(),
            step: 0,
            targets: Vec::new(),
            current_target: 0,
            current_list_name: None,
        }
    }

    /// Applies a transition and returns the observer-facing update.
    pub fn advance(&mut self, state: RunState, progress: impl Into<String>) -> ProgressUpdate {
        self.state = state;
        self.progress = progress.into();
        self.step += 1;
        ProgressUpdate {
            state,
            progress: self.progress.clone(),
            step: self.step,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of one state change, delivered synchronously to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub state: RunState,
    pub progress: String,
    pub step: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(RunState::Idle.is_terminal());
        assert!(RunState::Complete.is_terminal());
        assert!(RunState::Error.is_terminal());
        assert!(!RunState::ExtractingMembers.is_terminal());
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut session = Session::new();
        let first = session.advance(RunState::OpeningHost, "launching");
        let second = session.advance(RunState::NavigatingToMenu, "menu");
        assert_eq!(first.step, 1);
        assert_eq!(second.step, 2);
        assert_eq!(session.state, RunState::NavigatingToMenu);
    }

    #[test]
    fn test_target_list_name_fallback() {
        let target = TargetHandle {
            node: NodeId(4),
            label: None,
            bounds: Bounds::default(),
        };
        assert_eq!(target.list_name(2), "List 3");
    }
}
