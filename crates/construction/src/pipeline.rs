use kernel_adapter::{Kernel, KernelSolidHandle};
use notch_types::{BuildConfig, Notch};
use tracing::{error, info, instrument};

use crate::execute::execute_plan;
use crate::plan::{plan_construction, ConstructionPlan};
use crate::types::{BuildError, BuildReport};

/// The solid currently shown and exported, with how it was built.
#[derive(Debug)]
pub struct Published {
    pub solid: KernelSolidHandle,
    pub plan: ConstructionPlan,
    pub report: BuildReport,
    /// Increments with every successful rebuild.
    pub generation: u64,
}

/// Owns the published solid and rebuilds it from committed layouts.
///
/// Rebuilds take `&mut self`, so two builds can never race to publish.
/// Every rebuild starts from scratch; nothing is diffed against the
/// previous layout.
pub struct Pipeline {
    config: BuildConfig,
    published: Option<Published>,
    generation: u64,
}

impl Pipeline {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            published: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn published(&self) -> Option<&Published> {
        self.published.as_ref()
    }

    /// Handle of the published solid, if any build has succeeded.
    pub fn solid(&self) -> Option<&KernelSolidHandle> {
        self.published.as_ref().map(|p| &p.solid)
    }

    /// Build a new solid from `notches` and publish it.
    ///
    /// On success the previous solid is released. On failure the previous
    /// solid stays published and the error is returned.
    #[instrument(skip_all, fields(notches = notches.len()))]
    pub fn rebuild(
        &mut self,
        kernel: &mut dyn Kernel,
        notches: &[Notch],
    ) -> Result<&Published, BuildError> {
        let plan = plan_construction(&self.config, notches);
        let output = match execute_plan(kernel, &plan) {
            Ok(output) => output,
            Err(e) => {
                error!(error = %e, "rebuild failed, keeping last good solid");
                return Err(e);
            }
        };

        if let Some(previous) = self.published.take() {
            kernel.release(previous.solid);
        }

        self.generation += 1;
        info!(
            generation = self.generation,
            skipped = output.report.skipped.len(),
            "published rebuilt solid"
        );
        Ok(&*self.published.insert(Published {
            solid: output.solid,
            plan,
            report: output.report,
            generation: self.generation,
        }))
    }

    /// Release the published solid, e.g. when the session is torn down.
    pub fn release(&mut self, kernel: &mut dyn Kernel) {
        if let Some(published) = self.published.take() {
            kernel.release(published.solid);
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(BuildConfig::default())
    }
}
