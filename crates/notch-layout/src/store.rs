use notch_types::{Bar, Notch};
use serde::{Deserialize, Serialize};

use crate::input::parse_end_input;
use crate::types::{BoundsIssue, LayoutError, LayoutState};

/// The committed notch list and the draft being edited against it.
///
/// `committed` is what the displayed and exported solid is built from.
/// Edits only touch `draft` until [`NotchLayout::apply_changes`]. Both lists
/// always have the same length and the same `name`/`start` per index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotchLayout {
    committed: Vec<Notch>,
    draft: Vec<Notch>,
    dirty: bool,
}

impl NotchLayout {
    /// Start a clean layout with both lists set to `defaults`.
    pub fn initialize(defaults: &[Notch]) -> Self {
        Self {
            committed: defaults.to_vec(),
            draft: defaults.to_vec(),
            dirty: false,
        }
    }

    pub fn committed(&self) -> &[Notch] {
        &self.committed
    }

    pub fn draft(&self) -> &[Notch] {
        &self.draft
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn state(&self) -> LayoutState {
        if self.dirty {
            LayoutState::Dirty
        } else {
            LayoutState::Clean
        }
    }

    /// Set a draft notch's end from raw field input.
    ///
    /// Unparsable input becomes `0.0`. Returns the stored value.
    pub fn update_draft_end(&mut self, index: usize, input: &str) -> Result<f64, LayoutError> {
        let value = parse_end_input(input);
        self.set_draft_end(index, value)?;
        Ok(value)
    }

    /// Set a draft notch's end. Non-finite values are stored as `0.0`.
    ///
    /// Any edit marks the layout dirty, even one that restores the committed value.
    pub fn set_draft_end(&mut self, index: usize, value: f64) -> Result<(), LayoutError> {
        let count = self.draft.len();
        let notch = self
            .draft
            .get_mut(index)
            .ok_or(LayoutError::IndexOutOfRange { index, count })?;
        notch.end = if value.is_finite() { value } else { 0.0 };
        self.dirty = true;
        tracing::debug!(index, end = notch.end, "draft notch end updated");
        Ok(())
    }

    /// Commit the draft. Returns the new committed list when something was
    /// applied, `None` when the layout was already clean.
    pub fn apply_changes(&mut self) -> Option<&[Notch]> {
        if !self.dirty {
            return None;
        }
        self.committed = self.draft.clone();
        self.dirty = false;
        tracing::debug!(notches = self.committed.len(), "draft applied");
        Some(&self.committed)
    }

    /// Discard the draft. Returns `false` when there was nothing to discard.
    pub fn cancel_changes(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.draft = self.committed.clone();
        self.dirty = false;
        tracing::debug!("draft discarded");
        true
    }

    /// Replace both lists wholesale, leaving the layout clean.
    pub fn replace_all(&mut self, notches: Vec<Notch>) {
        self.draft = notches.clone();
        self.committed = notches;
        self.dirty = false;
    }

    /// Notches in the draft that fall outside the bar or have `end <= start`.
    pub fn check_bounds(&self, bar: &Bar) -> Vec<BoundsIssue> {
        let mut issues = Vec::new();
        for (index, notch) in self.draft.iter().enumerate() {
            if notch.start < 0.0 {
                issues.push(BoundsIssue::NegativeStart {
                    index,
                    start: notch.start,
                });
            }
            if notch.end <= notch.start {
                issues.push(BoundsIssue::EndNotAfterStart {
                    index,
                    start: notch.start,
                    end: notch.end,
                });
            }
            if notch.end > bar.length {
                issues.push(BoundsIssue::PastBarEnd {
                    index,
                    end: notch.end,
                    bar_length: bar.length,
                });
            }
        }
        issues
    }
}

impl Default for NotchLayout {
    fn default() -> Self {
        Self::initialize(&notch_types::default_notches())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_notches() -> Vec<Notch> {
        vec![Notch::new("A", 0.73, 0.86), Notch::new("B", 1.8, 1.93)]
    }

    #[test]
    fn test_initialize_is_clean() {
        let layout = NotchLayout::initialize(&two_notches());
        assert_eq!(layout.committed(), layout.draft());
        assert_eq!(layout.state(), LayoutState::Clean);
    }

    #[test]
    fn test_default_uses_seed_layout() {
        let layout = NotchLayout::default();
        assert_eq!(layout.len(), 10);
        assert!(!layout.is_dirty());
    }

    #[test]
    fn test_out_of_range_edit_leaves_layout_untouched() {
        let mut layout = NotchLayout::initialize(&two_notches());
        let err = layout.update_draft_end(2, "1.0").unwrap_err();
        assert_eq!(err, LayoutError::IndexOutOfRange { index: 2, count: 2 });
        assert!(!layout.is_dirty());
        assert_eq!(layout.draft(), two_notches().as_slice());
    }

    #[test]
    fn test_non_finite_value_stored_as_zero() {
        let mut layout = NotchLayout::initialize(&two_notches());
        layout.set_draft_end(0, f64::NAN).unwrap();
        assert_eq!(layout.draft()[0].end, 0.0);
    }

    #[test]
    fn test_replace_all_is_clean() {
        let mut layout = NotchLayout::initialize(&two_notches());
        layout.update_draft_end(0, "5").unwrap();
        layout.replace_all(vec![Notch::new("Only", 1.0, 2.0)]);
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.committed(), layout.draft());
        assert!(!layout.is_dirty());
    }

    #[test]
    fn test_check_bounds_reports_each_violation() {
        let mut layout = NotchLayout::initialize(&two_notches());
        layout.update_draft_end(0, "0.5").unwrap();
        layout.update_draft_end(1, "9").unwrap();

        let issues = layout.check_bounds(&Bar::default());
        assert_eq!(issues.len(), 2);
        assert!(matches!(
            issues[0],
            BoundsIssue::EndNotAfterStart { index: 0, .. }
        ));
        assert!(matches!(issues[1], BoundsIssue::PastBarEnd { index: 1, .. }));
    }
}
