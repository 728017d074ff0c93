//! Lint for services without operations.

use super::super::Lint;
use crate::{CodegenContext, pipeline::Diagnostic};

/// Lint that warns when the service has no operations.
pub struct EmptyServiceLint;

impl Lint for EmptyServiceLint {
    fn name(&self) -> &'static str {
        "empty-service"
    }

    fn description(&self) -> &'static str {
        "Warn about services without operations"
    }

    fn check(&self, ctx: &CodegenContext, diagnostics: &mut Vec<Diagnostic>) {
        if ctx.operations().is_ok_and(|ops| ops.is_empty()) {
            diagnostics.push(
                Diagnostic::warning("validate", "service has no operations").at(ctx.service()),
            );
        }
    }
}
