//! Hooks around pipeline phases.

use eyre::{Result, bail};

use super::CompilationContext;

/// Receives callbacks around every phase, in registration order.
///
/// Returning an error from either hook aborts the run.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    #[allow(unused_variables)]
    fn on_before_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        Ok(())
    }

    #[allow(unused_variables)]
    fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        Ok(())
    }
}

/// Turns validation warnings into a failed run.
pub struct DenyWarnings;

impl Plugin for DenyWarnings {
    fn name(&self) -> &'static str {
        "deny-warnings"
    }

    fn on_after_phase(&self, phase: &str, ctx: &mut CompilationContext) -> Result<()> {
        if phase != "validate" || !ctx.has_warnings() {
            return Ok(());
        }
        for warning in ctx.warnings() {
            tracing::warn!("{}", warning);
        }
        bail!(
            "{} warning(s) denied by `{}`",
            ctx.warning_count(),
            self.name()
        )
    }
}
