use serde::{Deserialize, Serialize};

use construction::BuildReport;
use kernel_adapter::RenderMesh;
use notch_layout::{BoundsIssue, NotchLayout};
use notch_types::{display_mm, Bar, Notch};

use crate::session::SessionStatus;

/// Messages from the UI to the engine.
/// Serialized as JSON for postMessage transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToEngine {
    /// Edit a draft notch's end. `value` is the raw text from the input field.
    UpdateNotchEnd { index: usize, value: String },
    /// Commit the draft and rebuild the model.
    ApplyChanges,
    /// Discard draft edits.
    CancelChanges,
    ExportStep,
    GetLayout,
}

/// Messages from the engine to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineToUi {
    /// The kernel has not finished loading.
    Loading,

    /// The draft or committed layout changed, without a rebuild.
    LayoutChanged { layout: LayoutView },

    /// The model has been rebuilt. `mesh` is `None` with a `mesh_warning`
    /// when the new solid could not be tessellated.
    ModelUpdated {
        layout: LayoutView,
        mesh: Option<RenderMesh>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mesh_warning: Option<String>,
        report: BuildReport,
        generation: u64,
    },

    /// STEP export is ready. `step_data` is base64.
    ExportReady {
        filename: String,
        mime_type: String,
        step_data: String,
    },

    ExportFailed { message: String },

    Error { message: String },
}

/// One notch as shown in the configuration panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotchView {
    pub index: usize,
    pub name: String,
    pub start: f64,
    pub end: f64,
    /// Cut position along the bar in mm, rounded to 0.1.
    pub position_mm: f64,
}

impl NotchView {
    pub fn new(index: usize, notch: &Notch) -> Self {
        Self {
            index,
            name: notch.name.clone(),
            start: notch.start,
            end: notch.end,
            position_mm: display_mm(notch.position_mm()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutView {
    /// Draft values, which is what the edit fields show.
    pub notches: Vec<NotchView>,
    pub dirty: bool,
    pub issues: Vec<BoundsIssue>,
    pub status: SessionStatus,
}

impl LayoutView {
    pub fn new(layout: &NotchLayout, bar: &Bar, status: &SessionStatus) -> Self {
        Self {
            notches: layout
                .draft()
                .iter()
                .enumerate()
                .map(|(i, n)| NotchView::new(i, n))
                .collect(),
            dirty: layout.is_dirty(),
            issues: layout.check_bounds(bar),
            status: status.clone(),
        }
    }
}
