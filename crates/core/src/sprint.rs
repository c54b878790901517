//! Sprint projection.

use serde::{Deserialize, Serialize};

/// Projection of a Jira sprint. Sprints are created and started
/// externally; the engine only reads membership and reacts to the
/// start transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    /// Sprint id
    pub id: u64,

    /// Sprint name
    pub name: String,

    /// Board the sprint was created on
    pub origin_board_id: u64,

    /// True while the sprint is open for work
    pub active: bool,
}
