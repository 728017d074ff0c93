//! Pipeline orchestrator.

use std::sync::Arc;

use eyre::Result;

use super::{
    CompilationContext, Phase, Plugin,
    phases::{TransformPhase, ValidatePhase},
};
use crate::{CodegenContext, customize::CombinedDecorator};

/// The compilation pipeline orchestrator.
///
/// Runs the built-in phases (transform, validate) followed by any target
/// phases, calling plugin hooks before and after each phase.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new(decorators)
///     .plugin(DenyWarnings)
///     .phase(ResolvePhase::new(decorators.clone()));
///
/// let ctx = pipeline.run(codegen)?;
/// ```
pub struct Pipeline {
    decorators: Arc<CombinedDecorator>,
    validate: ValidatePhase,
    phases: Vec<Box<dyn Phase>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    pub fn new(decorators: Arc<CombinedDecorator>) -> Self {
        Self {
            decorators,
            validate: ValidatePhase::new(),
            phases: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Replace the built-in validate phase (e.g. to add lints).
    pub fn validate(mut self, validate: ValidatePhase) -> Self {
        self.validate = validate;
        self
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Names of every phase in execution order.
    pub fn phase_names(&self) -> Vec<&'static str> {
        let mut names = vec!["transform", self.validate.name()];
        names.extend(self.phases.iter().map(|p| p.name()));
        names
    }

    /// Run the pipeline.
    ///
    /// Executes all phases in order:
    /// 1. TransformPhase - decorator model transforms, then operation normalization
    /// 2. ValidatePhase - lints, fails on any error diagnostic
    /// 3. Added phases (if any)
    ///
    /// # Errors
    ///
    /// Returns an error if any phase or plugin hook fails. Nothing is
    /// written by the pipeline itself.
    pub fn run(&self, codegen: CodegenContext) -> Result<CompilationContext> {
        let mut ctx = CompilationContext::new(codegen);
        let transform = TransformPhase::new(self.decorators.clone());

        let builtin: [&dyn Phase; 2] = [&transform, &self.validate];
        for phase in builtin
            .into_iter()
            .chain(self.phases.iter().map(|p| p.as_ref()))
        {
            self.run_phase(phase, &mut ctx)?;
        }

        Ok(ctx)
    }

    fn run_phase(&self, phase: &dyn Phase, ctx: &mut CompilationContext) -> Result<()> {
        let phase_name = phase.name();

        for plugin in &self.plugins {
            plugin.on_before_phase(phase_name, ctx)?;
        }

        tracing::info!(phase = phase_name, "running phase");
        phase.run(ctx)?;

        for plugin in &self.plugins {
            plugin.on_after_phase(phase_name, ctx)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use kiln_manifest::Mode;
    use kiln_model::TraitKind;

    use super::*;
    use crate::testing;

    struct CountingPlugin {
        before_count: Arc<AtomicUsize>,
        after_count: Arc<AtomicUsize>,
    }

    impl CountingPlugin {
        fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let before = Arc::new(AtomicUsize::new(0));
            let after = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    before_count: before.clone(),
                    after_count: after.clone(),
                },
                before,
                after,
            )
        }
    }

    impl Plugin for CountingPlugin {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn on_before_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.before_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_after_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.after_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(Arc::new(CombinedDecorator::empty()))
    }

    #[test]
    fn test_pipeline_normalizes_operations() {
        let codegen = testing::weather_context(Mode::Server).unwrap();
        let ctx = pipeline().run(codegen).expect("pipeline should succeed");

        let synthetic = "example.weather.synthetic#GetCityInput".parse().unwrap();
        let shape = ctx.codegen.model().get(&synthetic).expect("synthetic input");
        assert!(shape.traits.has(TraitKind::SyntheticInput));
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_pipeline_plugin_hooks() {
        let codegen = testing::weather_context(Mode::Server).unwrap();
        let (plugin, before_count, after_count) = CountingPlugin::new();

        let pipeline = pipeline().plugin(plugin);
        pipeline.run(codegen).expect("pipeline should succeed");

        // 2 built-in phases = 2 before + 2 after hooks
        assert_eq!(before_count.load(Ordering::SeqCst), 2);
        assert_eq!(after_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(pipeline().phase_names(), vec!["transform", "validate"]);
    }
}
