use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use kernel_adapter::Kernel;
use tracing::{info, warn};

use crate::messages::{EngineToUi, LayoutView, UiToEngine};
use crate::session::{BridgeError, Session};

/// Dispatch a UI message to the session and return a response.
///
/// Export failures become `ExportFailed`; every other error becomes `Error`.
/// While the kernel is loading, only `GetLayout` and draft edits are served.
pub fn dispatch(session: &mut Session, msg: UiToEngine, kernel: &mut dyn Kernel) -> EngineToUi {
    let is_export = matches!(msg, UiToEngine::ExportStep);
    match handle_message(session, msg, kernel) {
        Ok(response) => response,
        Err(BridgeError::Loading) => EngineToUi::Loading,
        Err(e) if is_export => {
            warn!(error = %e, "STEP export failed");
            EngineToUi::ExportFailed {
                message: e.to_string(),
            }
        }
        Err(e) => EngineToUi::Error {
            message: e.to_string(),
        },
    }
}

fn handle_message(
    session: &mut Session,
    msg: UiToEngine,
    kernel: &mut dyn Kernel,
) -> Result<EngineToUi, BridgeError> {
    match msg {
        UiToEngine::UpdateNotchEnd { index, value } => {
            session.update_notch_end(index, &value)?;
            Ok(layout_response(session))
        }

        UiToEngine::ApplyChanges => {
            if session.apply_changes(kernel)? {
                model_updated_response(session)
            } else {
                Ok(layout_response(session))
            }
        }

        UiToEngine::CancelChanges => {
            session.cancel_changes();
            Ok(layout_response(session))
        }

        UiToEngine::GetLayout => Ok(layout_response(session)),

        UiToEngine::ExportStep => export_response(session, kernel),
    }
}

fn export_response(
    session: &mut Session,
    kernel: &mut dyn Kernel,
) -> Result<EngineToUi, BridgeError> {
    let file = session.export_step(kernel)?;
    info!(filename = %file.filename, bytes = file.contents.len(), "STEP export ready");
    Ok(EngineToUi::ExportReady {
        mime_type: file.mime_type().to_string(),
        step_data: STANDARD.encode(&file.contents),
        filename: file.filename,
    })
}

fn layout_view(session: &Session) -> LayoutView {
    LayoutView::new(session.layout(), &session.config().bar, session.status())
}

fn layout_response(session: &Session) -> EngineToUi {
    EngineToUi::LayoutChanged {
        layout: layout_view(session),
    }
}

/// Build a ModelUpdated response from the published solid.
pub fn model_updated_response(session: &Session) -> Result<EngineToUi, BridgeError> {
    let published = session.published().ok_or(BridgeError::NoModel)?;
    Ok(EngineToUi::ModelUpdated {
        layout: layout_view(session),
        mesh: session.mesh().cloned(),
        mesh_warning: session.mesh_warning().map(str::to_owned),
        report: published.report.clone(),
        generation: published.generation,
    })
}
