//! Story status derivation.
//!
//! A story's status is never authored directly while it sits in a
//! sprint; it is derived from the statuses of its unarchived subtasks.

/// Status names the state machine reasons about.
pub mod names {
    /// Not started
    pub const BACKLOG: &str = "Backlog";
    /// At least one subtask is moving
    pub const IN_PROGRESS: &str = "In Progress";
    /// All subtasks done, awaiting product-owner review
    pub const PO_REVIEW: &str = "PO Review";
    /// Accepted
    pub const DONE: &str = "Done";
}

/// Status a story should transition to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedStatus {
    /// No subtask has started
    Backlog,
    /// Subtasks are in mixed or active states
    InProgress,
    /// Every subtask is done
    PoReview,
}

impl DerivedStatus {
    /// The Jira transition name for this status.
    pub fn transition_name(self) -> &'static str {
        match self {
            Self::Backlog => names::BACKLOG,
            Self::InProgress => names::IN_PROGRESS,
            Self::PoReview => names::PO_REVIEW,
        }
    }
}

/// Derive the status a story should hold from the statuses of its
/// unarchived subtasks. Returns `None` when the story is already in the
/// derived status (no transition should be issued), or when the story is
/// terminally "Done" and the subtasks all stayed "Done".
pub fn derive_status(current: &str, subtask_statuses: &[&str]) -> Option<DerivedStatus> {
    let all = |status: &str| subtask_statuses.iter().all(|s| *s == status);

    let derived = if subtask_statuses.is_empty() || all(names::BACKLOG) {
        DerivedStatus::Backlog
    } else if all(names::DONE) {
        // A story marked fully Done stays Done; a subtask remaining Done
        // must not re-trigger PO Review.
        if current == names::DONE {
            return None;
        }
        DerivedStatus::PoReview
    } else {
        DerivedStatus::InProgress
    };

    if derived.transition_name() == current {
        None
    } else {
        Some(derived)
    }
}
