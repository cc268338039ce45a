//! Registration driver
//!
//! Executes a fixed, caller-supplied sequence of registration steps exactly
//! once at runtime initialization. Ordering is enforced only implicitly: each
//! step resolves its own namespace prefix synchronously before attaching
//! members, so a step whose parent namespace is declared by a later step
//! fails instead of being deferred. Callers order steps so every namespace is
//! created before anything nested under it.

use crate::error::RegisterError;
use crate::logger;
use crate::registrar::Registrar;

type StepFn = Box<dyn FnOnce(&mut Registrar) -> Result<(), RegisterError>>;

struct Step {
    label: String,
    run: StepFn,
}

/// Ordered, run-once sequence of registration steps
#[must_use = "a driver does nothing until run against a registrar"]
pub struct RegistrationDriver {
    steps: Vec<Step>,
}

impl RegistrationDriver {
    /// Create an empty driver
    pub fn new() -> Self {
        RegistrationDriver { steps: Vec::new() }
    }

    /// Append a labeled step. The label appears in diagnostics when the step
    /// fails.
    pub fn step(
        mut self,
        label: &str,
        run: impl FnOnce(&mut Registrar) -> Result<(), RegisterError> + 'static,
    ) -> Self {
        self.steps.push(Step {
            label: label.to_string(),
            run: Box::new(run),
        });
        self
    }

    /// Number of queued steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when no step is queued
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run all steps in order against `registrar`.
    ///
    /// Consumes the driver: the sequence executes exactly once. The first
    /// failing step aborts the remainder - there is no partial-success mode,
    /// because scripts assume a fully formed object model.
    pub fn run(self, registrar: &mut Registrar) -> Result<(), RegisterError> {
        let total = self.steps.len();
        for (index, step) in self.steps.into_iter().enumerate() {
            logger::debug(&format!(
                "registration step {}/{}: {}",
                index + 1,
                total,
                step.label
            ));
            if let Err(err) = (step.run)(registrar) {
                logger::error(&format!(
                    "registration halted at step `{}`: {}",
                    step.label, err
                ));
                return Err(err);
            }
        }
        Ok(())
    }
}

impl Default for RegistrationDriver {
    fn default() -> Self {
        Self::new()
    }
}
