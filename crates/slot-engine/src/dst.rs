//! DST transition policies for wall-clock window boundaries.

use serde::{Deserialize, Serialize};

/// Policy for window boundaries that fall inside a DST gap
/// (e.g., 02:30 on a spring-forward night, which never happens on the wall clock).
///
/// Ambiguous times (the repeated hour on fall-back nights) always resolve to the
/// earlier of the two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop the occurrence when a boundary falls in the gap.
    Skip,
    /// Move the boundary to the first valid instant after the gap.
    #[default]
    ShiftForward,
}
