pub mod dispatch;
pub mod loader;
pub mod messages;
pub mod session;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use dispatch::{dispatch, model_updated_response};
pub use loader::{finish_kernel_init, InitOutcome, Liveness, LivenessToken};
pub use messages::{EngineToUi, LayoutView, NotchView, UiToEngine};
pub use session::{BridgeError, KernelInitError, Session, SessionStatus, DISPLAY_TOLERANCE};
