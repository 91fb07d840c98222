use kernel_adapter::{Kernel, MockCall, MockKernel};
use notch_bridge::*;
use notch_types::{BuildConfig, Notch};

// ── Helper functions ─────────────────────────────────────────────────────

fn ready_session(kernel: &mut MockKernel) -> Session {
    let mut session = Session::default();
    session.kernel_ready(kernel).unwrap();
    session
}

fn single_notch_session(kernel: &mut MockKernel) -> Session {
    let mut session =
        Session::with_notches(BuildConfig::default(), &[Notch::new("Notch 1", 0.73, 0.86)]);
    session.kernel_ready(kernel).unwrap();
    session
}

// ── Lifecycle ────────────────────────────────────────────────────────────

#[test]
fn new_session_is_loading() {
    let session = Session::default();
    assert_eq!(session.status(), &SessionStatus::Loading);
    assert!(session.published().is_none());
    assert_eq!(session.layout().len(), 10);
}

#[test]
fn kernel_ready_builds_initial_model() {
    let mut kernel = MockKernel::new();
    let session = ready_session(&mut kernel);

    assert!(session.is_ready());
    let published = session.published().unwrap();
    assert_eq!(published.generation, 1);
    assert!(published.report.is_complete());
    assert_eq!(session.mesh().unwrap().triangle_count(), 12);
    assert_eq!(kernel.live_handles(), 1);
}

#[test]
fn kernel_ready_twice_is_rejected() {
    let mut kernel = MockKernel::new();
    let mut session = ready_session(&mut kernel);
    assert!(matches!(
        session.kernel_ready(&mut kernel),
        Err(BridgeError::AlreadyInitialized)
    ));
    assert_eq!(kernel.live_handles(), 1);
}

#[test]
fn kernel_failure_is_terminal() {
    let mut kernel = MockKernel::new();
    let mut session = Session::default();
    session.kernel_failed(KernelInitError {
        reason: "wasm load failed".to_string(),
    });

    assert!(matches!(session.status(), SessionStatus::Failed { message } if message.contains("wasm load failed")));
    assert!(matches!(
        session.kernel_ready(&mut kernel),
        Err(BridgeError::AlreadyInitialized)
    ));
    assert!(matches!(
        session.apply_changes(&mut kernel),
        Err(BridgeError::KernelInit(_))
    ));
    assert!(kernel.calls().is_empty());
}

#[test]
fn apply_while_loading_is_refused() {
    let mut kernel = MockKernel::new();
    let mut session = Session::default();
    session.update_notch_end(0, "1.0").unwrap();
    assert!(matches!(
        session.apply_changes(&mut kernel),
        Err(BridgeError::Loading)
    ));
    // The draft survives for when the kernel arrives
    assert!(session.layout().is_dirty());
}

// ── Apply / cancel ───────────────────────────────────────────────────────

#[test]
fn apply_rebuilds_with_new_end() {
    let mut kernel = MockKernel::new();
    let mut session = single_notch_session(&mut kernel);
    let first = kernel.calls().len();

    assert_eq!(session.update_notch_end(0, "0.90").unwrap(), 0.90);
    assert!(session.apply_changes(&mut kernel).unwrap());

    let published = session.published().unwrap();
    assert_eq!(published.generation, 2);
    let cut = &kernel.solid(&published.solid).unwrap().cuts[0];
    assert!((cut.offset[1] - 22.86).abs() < 1e-9);
    assert!(kernel.calls()[first..]
        .iter()
        .any(|c| matches!(c, MockCall::Release { .. })));
    assert_eq!(kernel.live_handles(), 1);
}

#[test]
fn apply_with_clean_layout_does_not_rebuild() {
    let mut kernel = MockKernel::new();
    let mut session = ready_session(&mut kernel);
    kernel.clear_calls();

    assert!(!session.apply_changes(&mut kernel).unwrap());
    assert!(kernel.calls().is_empty());
    assert_eq!(session.published().unwrap().generation, 1);
}

#[test]
fn cancel_restores_committed_without_rebuild() {
    let mut kernel = MockKernel::new();
    let mut session = ready_session(&mut kernel);
    kernel.clear_calls();

    session.update_notch_end(3, "5.5").unwrap();
    assert!(session.cancel_changes());
    assert_eq!(session.layout().draft(), session.layout().committed());
    assert!(!session.layout().is_dirty());
    assert!(kernel.calls().is_empty());
}

#[test]
fn failed_rebuild_keeps_previous_model_and_commits_layout() {
    let mut kernel = MockKernel::new();
    let mut session = single_notch_session(&mut kernel);
    let good = session.published().unwrap().solid.id();

    // Bar of the next build
    let next = kernel.count_calls(|c| matches!(c, MockCall::CreateBox { .. }));
    kernel.fail_primitive_call(next);
    session.update_notch_end(0, "2.0").unwrap();
    assert!(matches!(
        session.apply_changes(&mut kernel),
        Err(BridgeError::Build(_))
    ));

    assert_eq!(session.published().unwrap().solid.id(), good);
    assert_eq!(session.layout().committed()[0].end, 2.0);
    assert!(!session.layout().is_dirty());
    assert_eq!(kernel.live_handles(), 1);
}

#[test]
fn tessellation_failure_still_publishes_rebuild() {
    let mut kernel = MockKernel::new();
    let mut session = single_notch_session(&mut kernel);
    assert!(session.mesh_warning().is_none());

    kernel.fail_tessellate();
    session.update_notch_end(0, "0.90").unwrap();
    assert!(session.apply_changes(&mut kernel).unwrap());

    let published = session.published().unwrap();
    assert_eq!(published.generation, 2);
    assert!(published.report.is_complete());
    assert!(session.mesh().is_none());
    assert!(session.mesh_warning().unwrap().contains("injected"));
    assert!(!session.layout().is_dirty());
    assert_eq!(kernel.live_handles(), 1);

    // The unmeshed solid is still exportable
    assert!(session.export_step(&mut kernel).is_ok());
}

#[test]
fn out_of_range_edit_is_an_error() {
    let mut kernel = MockKernel::new();
    let mut session = single_notch_session(&mut kernel);
    assert!(matches!(
        session.update_notch_end(4, "1.0"),
        Err(BridgeError::Layout(_))
    ));
    assert!(!session.layout().is_dirty());
}

// ── Export ───────────────────────────────────────────────────────────────

#[test]
fn export_returns_step_of_published_solid() {
    let mut kernel = MockKernel::new();
    let mut session = single_notch_session(&mut kernel);

    let file = session.export_step(&mut kernel).unwrap();
    assert_eq!(file.filename, "token_model.step");
    let text = file.as_text().unwrap();
    assert!(text.starts_with("ISO-10303-21"));
    assert!(text.contains("BLOCK('cut'"));
    assert!(!session.is_exporting());
    assert_eq!(kernel.live_handles(), 1);
}

#[test]
fn export_failure_leaves_session_untouched() {
    let mut kernel = MockKernel::new();
    let mut session = single_notch_session(&mut kernel);
    session.update_notch_end(0, "1.5").unwrap();
    kernel.fail_export();

    assert!(matches!(
        session.export_step(&mut kernel),
        Err(BridgeError::Export(_))
    ));
    assert!(!session.is_exporting());
    assert!(session.layout().is_dirty());
    assert_eq!(session.published().unwrap().generation, 1);
}

#[test]
fn export_without_model_fails() {
    let mut kernel = MockKernel::new();
    let mut session = Session::default();
    // The first build fails, so nothing is published
    kernel.fail_primitive_call(0);
    assert!(session.kernel_ready(&mut kernel).is_err());
    assert!(session.is_ready());

    assert!(matches!(
        session.export_step(&mut kernel),
        Err(BridgeError::NoModel)
    ));
}

#[test]
fn teardown_releases_everything() {
    let mut kernel = MockKernel::new();
    let mut session = ready_session(&mut kernel);
    session.teardown(&mut kernel);
    assert!(session.published().is_none());
    assert!(session.mesh().is_none());
    assert_eq!(kernel.live_handles(), 0);
}
