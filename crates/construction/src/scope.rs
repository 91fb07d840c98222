//! Scoped ownership of intermediate kernel solids.
//!
//! A [`StepScope`] wraps the kernel for the duration of one plan step. Solids
//! created through it are temporaries and are released when the scope drops,
//! whether the step succeeded or bailed out early with `?`. Only the result of
//! [`StepScope::subtract_from`] escapes the scope.

use kernel_adapter::{Kernel, KernelError, KernelSolidHandle};

/// Index of a temporary solid held by a [`StepScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Temp(usize);

pub struct StepScope<'k> {
    kernel: &'k mut dyn Kernel,
    temps: Vec<KernelSolidHandle>,
}

/// A temp from another scope is out of range here, not a panic.
fn lookup<'a>(
    temps: &'a [KernelSolidHandle],
    operation: &'static str,
    temp: Temp,
) -> Result<&'a KernelSolidHandle, KernelError> {
    temps.get(temp.0).ok_or(KernelError::SolidNotFound {
        operation,
        handle: temp.0 as u64,
    })
}

impl<'k> StepScope<'k> {
    pub fn new(kernel: &'k mut dyn Kernel) -> Self {
        Self {
            kernel,
            temps: Vec::new(),
        }
    }

    fn hold(&mut self, handle: KernelSolidHandle) -> Temp {
        self.temps.push(handle);
        Temp(self.temps.len() - 1)
    }

    /// Create a temporary box.
    pub fn create_box(&mut self, dims: [f64; 3]) -> Result<Temp, KernelError> {
        let handle = self.kernel.create_box(dims)?;
        Ok(self.hold(handle))
    }

    /// Create a temporary translated copy of another temporary.
    pub fn translate(&mut self, temp: Temp, offset: [f64; 3]) -> Result<Temp, KernelError> {
        let solid = lookup(&self.temps, "translate", temp)?;
        let handle = self.kernel.translate(solid, offset)?;
        Ok(self.hold(handle))
    }

    /// Subtract a temporary from `base`. The result is owned by the caller.
    pub fn subtract_from(
        &mut self,
        base: &KernelSolidHandle,
        tool: Temp,
    ) -> Result<KernelSolidHandle, KernelError> {
        let tool = lookup(&self.temps, "boolean_subtract", tool)?;
        self.kernel.boolean_subtract(base, tool)
    }

    /// Move a temporary out of the scope so it survives the drop.
    pub fn keep(mut self, temp: Temp) -> Result<KernelSolidHandle, KernelError> {
        lookup(&self.temps, "keep", temp)?;
        Ok(self.temps.swap_remove(temp.0))
    }
}

impl Drop for StepScope<'_> {
    fn drop(&mut self) {
        for handle in self.temps.drain(..) {
            self.kernel.release(handle);
        }
    }
}
