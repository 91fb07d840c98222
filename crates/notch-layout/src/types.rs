use serde::{Deserialize, Serialize};

/// Whether the draft has unapplied edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutState {
    Clean,
    Dirty,
}

/// A notch that violates `0 <= start < end <= bar length`.
///
/// Reported for display only; the store never rejects such values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoundsIssue {
    NegativeStart { index: usize, start: f64 },
    EndNotAfterStart { index: usize, start: f64, end: f64 },
    PastBarEnd { index: usize, end: f64, bar_length: f64 },
}

impl BoundsIssue {
    pub fn index(&self) -> usize {
        match self {
            BoundsIssue::NegativeStart { index, .. }
            | BoundsIssue::EndNotAfterStart { index, .. }
            | BoundsIssue::PastBarEnd { index, .. } => *index,
        }
    }
}

/// Errors from the layout store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("notch index {index} out of range (layout has {count} notches)")]
    IndexOutOfRange { index: usize, count: usize },
}
