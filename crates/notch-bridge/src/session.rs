use construction::{BuildError, Pipeline, Published};
use file_format::{ExportError, StepFile};
use kernel_adapter::{Kernel, RenderMesh};
use notch_layout::{LayoutError, NotchLayout};
use notch_types::{default_notches, BuildConfig, Notch};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Chord tolerance for display meshes, in millimetres.
pub const DISPLAY_TOLERANCE: f64 = 0.05;

/// Lifecycle of a session with respect to its kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum SessionStatus {
    /// Waiting for the kernel to finish initializing.
    Loading,
    Ready,
    /// Kernel initialization failed. Terminal.
    Failed { message: String },
}

/// The kernel could not be brought up.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("kernel initialization failed: {reason}")]
pub struct KernelInitError {
    pub reason: String,
}

/// Errors from the bridge layer.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("kernel is still loading")]
    Loading,

    #[error("{0}")]
    KernelInit(#[from] KernelInitError),

    #[error("session is not waiting for a kernel")]
    AlreadyInitialized,

    #[error("no model has been built yet")]
    NoModel,

    #[error("an export is already running")]
    ExportInProgress,

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// State of one notched-bar editing session.
///
/// The kernel is not owned here; callers pass it in for every operation that
/// touches geometry. Only one solid is ever published at a time.
pub struct Session {
    status: SessionStatus,
    layout: NotchLayout,
    pipeline: Pipeline,
    mesh: Option<RenderMesh>,
    mesh_warning: Option<String>,
    exporting: bool,
}

impl Session {
    pub fn new(config: BuildConfig) -> Self {
        Self::with_notches(config, &default_notches())
    }

    pub fn with_notches(config: BuildConfig, notches: &[Notch]) -> Self {
        Self {
            status: SessionStatus::Loading,
            layout: NotchLayout::initialize(notches),
            pipeline: Pipeline::new(config),
            mesh: None,
            mesh_warning: None,
            exporting: false,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == SessionStatus::Ready
    }

    pub fn layout(&self) -> &NotchLayout {
        &self.layout
    }

    pub fn config(&self) -> &BuildConfig {
        self.pipeline.config()
    }

    pub fn published(&self) -> Option<&Published> {
        self.pipeline.published()
    }

    /// Display mesh of the published solid.
    pub fn mesh(&self) -> Option<&RenderMesh> {
        self.mesh.as_ref()
    }

    /// Why the published solid has no display mesh, if tessellating it
    /// failed after a successful build.
    pub fn mesh_warning(&self) -> Option<&str> {
        self.mesh_warning.as_deref()
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// The kernel came up: build the model from the committed layout.
    ///
    /// The session is `Ready` afterwards even if that first build fails; the
    /// build error is returned and the user can still edit and apply.
    pub fn kernel_ready(&mut self, kernel: &mut dyn Kernel) -> Result<(), BridgeError> {
        if self.status != SessionStatus::Loading {
            return Err(BridgeError::AlreadyInitialized);
        }
        self.status = SessionStatus::Ready;
        info!("kernel ready, building initial model");
        self.rebuild_committed(kernel)
    }

    /// The kernel failed to initialize. The session stays failed.
    pub fn kernel_failed(&mut self, err: KernelInitError) {
        error!(error = %err, "kernel initialization failed");
        self.status = SessionStatus::Failed {
            message: err.reason,
        };
    }

    fn ensure_ready(&self) -> Result<(), BridgeError> {
        match &self.status {
            SessionStatus::Ready => Ok(()),
            SessionStatus::Loading => Err(BridgeError::Loading),
            SessionStatus::Failed { message } => Err(BridgeError::KernelInit(KernelInitError {
                reason: message.clone(),
            })),
        }
    }

    /// Edit a draft notch's end from raw user text. Returns the parsed value.
    pub fn update_notch_end(&mut self, index: usize, input: &str) -> Result<f64, BridgeError> {
        Ok(self.layout.update_draft_end(index, input)?)
    }

    /// Commit the draft and rebuild. Returns `false` when there was nothing
    /// to apply.
    pub fn apply_changes(&mut self, kernel: &mut dyn Kernel) -> Result<bool, BridgeError> {
        self.ensure_ready()?;
        if self.layout.apply_changes().is_none() {
            debug!("apply with clean layout, nothing to rebuild");
            return Ok(false);
        }
        self.rebuild_committed(kernel)?;
        Ok(true)
    }

    /// Discard draft edits. Returns `false` when there was nothing to discard.
    pub fn cancel_changes(&mut self) -> bool {
        self.layout.cancel_changes()
    }

    fn rebuild_committed(&mut self, kernel: &mut dyn Kernel) -> Result<(), BridgeError> {
        let published = self.pipeline.rebuild(kernel, self.layout.committed())?;
        // The build succeeded; a mesh failure only costs the display.
        match kernel.tessellate(&published.solid, DISPLAY_TOLERANCE) {
            Ok(mesh) => {
                self.mesh = Some(mesh);
                self.mesh_warning = None;
            }
            Err(err) => {
                warn!(generation = published.generation, error = %err, "display mesh unavailable");
                self.mesh = None;
                self.mesh_warning = Some(err.to_string());
            }
        }
        Ok(())
    }

    /// Export the published solid as STEP.
    ///
    /// A failure affects only this export; layout and model are untouched.
    pub fn export_step(&mut self, kernel: &mut dyn Kernel) -> Result<StepFile, BridgeError> {
        self.ensure_ready()?;
        if self.exporting {
            return Err(BridgeError::ExportInProgress);
        }
        let solid = self.pipeline.solid().ok_or(BridgeError::NoModel)?;

        self.exporting = true;
        let result = file_format::export_step(kernel, solid);
        self.exporting = false;
        Ok(result?)
    }

    /// Release the published solid. Call before dropping the kernel.
    pub fn teardown(&mut self, kernel: &mut dyn Kernel) {
        self.pipeline.release(kernel);
        self.mesh = None;
        self.mesh_warning = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(BuildConfig::default())
    }
}
