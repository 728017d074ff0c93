//! Resolve phase: map every shape in the service closure to a Rust symbol.

use std::sync::Arc;

use eyre::Result;
use kiln_codegen::{
    customize::CombinedDecorator,
    pipeline::{CompilationContext, Phase},
    symbol::{MemoizingSymbolProvider, SymbolProvider, SymbolTable},
};

use crate::symbol::rust_symbol_provider;

/// Builds the run's symbol provider chain (Rust defaults, then decorator
/// stages, then memoization) and resolves the service closure with it.
pub struct ResolvePhase {
    decorators: Arc<CombinedDecorator>,
}

impl ResolvePhase {
    pub fn new(decorators: Arc<CombinedDecorator>) -> Self {
        Self { decorators }
    }
}

impl Phase for ResolvePhase {
    fn name(&self) -> &'static str {
        "resolve"
    }

    fn description(&self) -> &'static str {
        "Resolve Rust symbols for the service closure"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let chain = self
            .decorators
            .symbol_provider(&ctx.codegen, rust_symbol_provider(&ctx.codegen));
        let mut stages = chain.stage_names().to_vec();

        let provider = MemoizingSymbolProvider::new(chain.build());
        stages.push(provider.name());

        let table = SymbolTable::resolve(&provider, ctx.codegen.model(), ctx.codegen.service())?;
        tracing::debug!(
            symbols = table.iter().count(),
            cached = provider.cached(),
            stages = ?stages,
            "symbols resolved"
        );

        ctx.resolver_stages = stages;
        ctx.symbols = Some(table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kiln_codegen::{pipeline::Pipeline, testing};
    use kiln_manifest::Mode;
    use kiln_model::ShapeId;

    use super::*;
    use crate::decorators::builtin_decorators;

    fn compile(mode: Mode) -> CompilationContext {
        let decorators = Arc::new(CombinedDecorator::new(builtin_decorators()).unwrap());
        Pipeline::new(Arc::clone(&decorators))
            .phase(ResolvePhase::new(decorators))
            .run(testing::weather_context(mode).unwrap())
            .unwrap()
    }

    #[test]
    fn test_records_stages_with_memoization_last() {
        let ctx = compile(Mode::Server);
        assert_eq!(ctx.resolver_stages.first(), Some(&"symbol-visitor"));
        assert_eq!(ctx.resolver_stages.last(), Some(&"memoize"));
    }

    #[test]
    fn test_resolves_service_closure() {
        let ctx = compile(Mode::Client);
        let symbols = ctx.symbols().unwrap();
        let summary: ShapeId = "example.weather#CitySummary".parse().unwrap();
        assert_eq!(symbols.expect(&summary).unwrap().full_name(), "crate::model::CitySummary");
        let op: ShapeId = "example.weather#GetCity".parse().unwrap();
        assert_eq!(symbols.expect(&op).unwrap().full_name(), "crate::operation::GetCity");
    }

    #[test]
    fn test_symbols_missing_before_resolve() {
        let decorators = Arc::new(CombinedDecorator::empty());
        let ctx = Pipeline::new(decorators)
            .run(testing::weather_context(Mode::Server).unwrap())
            .unwrap();
        assert!(ctx.symbols().is_err());
        assert!(ctx.resolver_stages.is_empty());
    }
}
