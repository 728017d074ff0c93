//! Pipeline phase trait.

use eyre::Result;

use super::CompilationContext;

/// One step of a run over the [`CompilationContext`].
///
/// The pipeline always starts with `TransformPhase` and `ValidatePhase`;
/// targets append their own (the Rust target resolves symbols).
pub trait Phase: Send + Sync {
    /// Used in diagnostics, plugin hooks and `kiln info`.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Errors abort the run. Problems the user can fix in the model belong
    /// in `ctx.diagnostics` instead.
    fn run(&self, ctx: &mut CompilationContext) -> Result<()>;
}
