//! One-time kernel initialization guarded against unmount.
//!
//! The host hands a [`LivenessToken`] to whatever brings the kernel up. If the
//! host is torn down before initialization finishes, the result is dropped
//! without touching the session.

use std::cell::Cell;
use std::rc::Rc;

use kernel_adapter::Kernel;
use tracing::{debug, warn};

use crate::session::{BridgeError, KernelInitError, Session};

/// Owned by the host for as long as it is mounted.
#[derive(Debug)]
pub struct Liveness {
    alive: Rc<Cell<bool>>,
}

/// Cheap handle that observes whether the host is still mounted.
#[derive(Debug, Clone)]
pub struct LivenessToken {
    alive: Rc<Cell<bool>>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Rc::new(Cell::new(true)),
        }
    }

    pub fn token(&self) -> LivenessToken {
        LivenessToken {
            alive: Rc::clone(&self.alive),
        }
    }

    pub fn unmount(&self) {
        self.alive.set(false);
    }

    pub fn is_mounted(&self) -> bool {
        self.alive.get()
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Liveness {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

impl LivenessToken {
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }
}

/// What happened to a finished kernel initialization.
#[derive(Debug)]
pub enum InitOutcome<K> {
    /// The session is ready and the caller now owns the kernel. Carries the
    /// result of the first build.
    Ready {
        kernel: K,
        initial_build: Result<(), BridgeError>,
    },
    /// Initialization failed; the session is in its failed state.
    Failed,
    /// The host was unmounted first; nothing was applied.
    Discarded,
}

/// Apply the result of kernel initialization to `session`, unless the host
/// went away in the meantime.
pub fn finish_kernel_init<K: Kernel>(
    token: &LivenessToken,
    result: Result<K, KernelInitError>,
    session: &mut Session,
) -> InitOutcome<K> {
    if !token.is_alive() {
        debug!("host unmounted before kernel init finished, discarding");
        return InitOutcome::Discarded;
    }

    match result {
        Ok(mut kernel) => {
            let initial_build = session.kernel_ready(&mut kernel);
            if let Err(e) = &initial_build {
                warn!(error = %e, "initial build failed");
            }
            InitOutcome::Ready {
                kernel,
                initial_build,
            }
        }
        Err(e) => {
            session.kernel_failed(e);
            InitOutcome::Failed
        }
    }
}
