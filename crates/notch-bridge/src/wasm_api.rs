//! WASM entry points for the web worker.
//!
//! This module is only compiled for the `wasm32` target. It provides the
//! `#[wasm_bindgen]` functions that JavaScript calls from the web worker.

use std::cell::RefCell;

use kernel_adapter::{RenderMesh, TruckKernel};
use wasm_bindgen::prelude::*;

use crate::dispatch::{dispatch, model_updated_response};
use crate::loader::{finish_kernel_init, InitOutcome, Liveness};
use crate::messages::{EngineToUi, UiToEngine};
use crate::session::Session;

// Global state, single-threaded in the web worker.
thread_local! {
    static ENGINE: RefCell<Option<WasmEngine>> = const { RefCell::new(None) };
}

struct WasmEngine {
    session: Session,
    liveness: Liveness,
    kernel: Option<TruckKernel>,
}

fn to_json(response: &EngineToUi) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            r#"{{"type":"Error","message":"Serialization failed: {}"}}"#,
            e
        )
    })
}

fn not_initialized() -> String {
    to_json(&EngineToUi::Error {
        message: "engine not initialized, call init() first".to_string(),
    })
}

/// Initialize the engine and bring up the kernel.
///
/// Returns the first response for the UI: `ModelUpdated` on success,
/// otherwise `Error`.
#[wasm_bindgen]
pub fn init() -> String {
    console_error_panic_hook::set_once();

    let liveness = Liveness::new();
    let token = liveness.token();
    ENGINE.with(|cell| {
        *cell.borrow_mut() = Some(WasmEngine {
            session: Session::default(),
            liveness,
            kernel: None,
        });
    });

    // The truck kernel comes up synchronously; the liveness check still applies.
    let kernel = TruckKernel::new();
    ENGINE.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(engine) = guard.as_mut() else {
            return not_initialized();
        };
        let response = match finish_kernel_init(&token, Ok(kernel), &mut engine.session) {
            InitOutcome::Ready {
                kernel,
                initial_build,
            } => {
                engine.kernel = Some(kernel);
                match initial_build.and_then(|()| model_updated_response(&engine.session)) {
                    Ok(response) => response,
                    Err(e) => EngineToUi::Error {
                        message: e.to_string(),
                    },
                }
            }
            InitOutcome::Failed => EngineToUi::Error {
                message: "kernel initialization failed".to_string(),
            },
            InitOutcome::Discarded => EngineToUi::Loading,
        };
        to_json(&response)
    })
}

/// Tear down the engine and release every kernel solid.
#[wasm_bindgen]
pub fn unmount() {
    ENGINE.with(|cell| {
        if let Some(mut engine) = cell.borrow_mut().take() {
            engine.liveness.unmount();
            if let Some(kernel) = engine.kernel.as_mut() {
                engine.session.teardown(kernel);
            }
        }
    });
}

/// Process a JSON `UiToEngine` message and return a JSON `EngineToUi`.
#[wasm_bindgen]
pub fn process_message(json_input: &str) -> String {
    ENGINE.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(engine) = guard.as_mut() else {
            return not_initialized();
        };

        let msg: UiToEngine = match serde_json::from_str(json_input) {
            Ok(msg) => msg,
            Err(e) => {
                return to_json(&EngineToUi::Error {
                    message: format!("Failed to parse message: {}", e),
                })
            }
        };

        let response = match engine.kernel.as_mut() {
            Some(kernel) => dispatch(&mut engine.session, msg, kernel),
            None => EngineToUi::Loading,
        };
        to_json(&response)
    })
}

/// Get mesh vertex positions of the published model as a Float32Array view
/// into WASM memory.
///
/// IMPORTANT: The returned view is invalidated by any WASM memory growth.
/// Copy or transfer the data immediately after calling this function.
#[wasm_bindgen]
pub fn get_mesh_vertices() -> js_sys::Float32Array {
    with_mesh(|mesh| unsafe { js_sys::Float32Array::view(&mesh.vertices) })
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

#[wasm_bindgen]
pub fn get_mesh_normals() -> js_sys::Float32Array {
    with_mesh(|mesh| unsafe { js_sys::Float32Array::view(&mesh.normals) })
        .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

#[wasm_bindgen]
pub fn get_mesh_indices() -> js_sys::Uint32Array {
    with_mesh(|mesh| unsafe { js_sys::Uint32Array::view(&mesh.indices) })
        .unwrap_or_else(|| js_sys::Uint32Array::new_with_length(0))
}

fn with_mesh<T>(f: impl FnOnce(&RenderMesh) -> T) -> Option<T> {
    ENGINE.with(|cell| {
        let guard = cell.borrow();
        let mesh = guard.as_ref()?.session.mesh()?;
        Some(f(mesh))
    })
}
