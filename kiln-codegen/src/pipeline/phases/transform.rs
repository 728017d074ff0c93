//! Transform phase: rewrite the model before anything inspects it.

use std::sync::Arc;

use eyre::Result;
use kiln_model::{ShapeType, normalize_operations};

use crate::{
    customize::CombinedDecorator,
    pipeline::{CompilationContext, Phase},
};

/// Applies decorator model transforms, then gives every operation its own
/// synthetic input and output structures.
///
/// Decorators run first so traits they add to an operation's input or output
/// are copied onto the synthetic structures.
pub struct TransformPhase {
    decorators: Arc<CombinedDecorator>,
}

impl TransformPhase {
    pub fn new(decorators: Arc<CombinedDecorator>) -> Self {
        Self { decorators }
    }
}

impl Phase for TransformPhase {
    fn name(&self) -> &'static str {
        "transform"
    }

    fn description(&self) -> &'static str {
        "Apply decorator model transforms and normalize operations"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let service = ctx.codegen.service().clone();
        let model = (**ctx.codegen.model()).clone();

        let model = self.decorators.transform_model(&service, model)?;
        let model = normalize_operations(&model)?;
        model.expect_kind(&service, ShapeType::Service)?;

        tracing::debug!(shapes = model.len(), "model transformed");
        ctx.codegen.replace_model(model);
        Ok(())
    }
}
