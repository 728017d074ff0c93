//! Decorators and their composition.

use std::sync::Arc;

use eyre::Result;
use kiln_model::{Model, ShapeId};

use super::{RenderFn, Section, SectionName, SectionRegistry};
use crate::{
    CodegenContext, CodegenError, builder::CodeFragment, protocol::ProtocolMap,
    symbol::SymbolProviderChain,
};

/// A unit of customization.
///
/// Every hook has a pass-through default, so a decorator only implements
/// what it customizes. Section hooks should `match` on [`Section`] and
/// return `Ok(None)` for sections they leave alone.
pub trait Decorator: Send + Sync {
    /// Registry name, as listed in `[decorators].enabled`.
    fn name(&self) -> &'static str;

    /// Lower orders run and render first.
    fn order(&self) -> i8 {
        0
    }

    /// Contribute to a built-in section.
    #[allow(unused_variables)]
    fn section(&self, ctx: &CodegenContext, section: &Section<'_>) -> Result<Option<CodeFragment>> {
        Ok(None)
    }

    /// Ad-hoc contributions for single sections, registered after the
    /// decorator's [`section`](Decorator::section) hook.
    #[allow(unused_variables)]
    fn extra_sections<'a>(&'a self, ctx: &'a CodegenContext) -> Vec<ExtraSection<'a>> {
        Vec::new()
    }

    /// Rewrite the model before normalization and validation.
    #[allow(unused_variables)]
    fn transform_model(&self, service: &ShapeId, model: Model) -> Result<Model> {
        Ok(model)
    }

    /// Adjust the protocol generators available to the service.
    #[allow(unused_variables)]
    fn protocols(&self, service: &ShapeId, protocols: ProtocolMap) -> ProtocolMap {
        protocols
    }

    /// Append stages to the symbol provider chain.
    #[allow(unused_variables)]
    fn symbol_provider(
        &self,
        ctx: &CodegenContext,
        chain: SymbolProviderChain,
    ) -> SymbolProviderChain {
        chain
    }
}

/// A contribution to one section outside the [`Decorator::section`] hook.
pub struct ExtraSection<'a> {
    pub section: SectionName,
    pub render: RenderFn<'a>,
}

impl<'a> ExtraSection<'a> {
    pub fn new<F>(section: SectionName, render: F) -> Self
    where
        F: Fn(&Section<'_>) -> Result<Option<CodeFragment>> + 'a,
    {
        Self {
            section,
            render: Box::new(render),
        }
    }
}

/// The decorators taking part in a run, in effective order.
///
/// Registration is an explicit static list; effective order is
/// `(order, registration position)`.
#[derive(Clone)]
pub struct CombinedDecorator {
    decorators: Vec<Arc<dyn Decorator>>,
}

impl CombinedDecorator {
    pub fn new(decorators: Vec<Arc<dyn Decorator>>) -> Result<Self, CodegenError> {
        for (second, decorator) in decorators.iter().enumerate() {
            if let Some(first) = decorators[..second]
                .iter()
                .position(|d| d.name() == decorator.name())
            {
                return Err(CodegenError::DuplicateDecorator {
                    name: decorator.name().to_string(),
                    first,
                    second,
                });
            }
        }

        let mut indexed: Vec<_> = decorators.into_iter().enumerate().collect();
        indexed.sort_by_key(|(position, d)| (d.order(), *position));
        Ok(Self {
            decorators: indexed.into_iter().map(|(_, d)| d).collect(),
        })
    }

    pub fn empty() -> Self {
        Self {
            decorators: Vec::new(),
        }
    }

    pub fn decorators(&self) -> &[Arc<dyn Decorator>] {
        &self.decorators
    }

    /// Names in effective order.
    pub fn names(&self) -> Vec<&'static str> {
        self.decorators.iter().map(|d| d.name()).collect()
    }

    pub fn transform_model(&self, service: &ShapeId, model: Model) -> Result<Model> {
        self.decorators.iter().try_fold(model, |model, decorator| {
            tracing::debug!(decorator = decorator.name(), "transforming model");
            decorator.transform_model(service, model)
        })
    }

    pub fn protocols(&self, service: &ShapeId, protocols: ProtocolMap) -> ProtocolMap {
        self.decorators
            .iter()
            .fold(protocols, |protocols, decorator| {
                decorator.protocols(service, protocols)
            })
    }

    pub fn symbol_provider(
        &self,
        ctx: &CodegenContext,
        chain: SymbolProviderChain,
    ) -> SymbolProviderChain {
        self.decorators
            .iter()
            .fold(chain, |chain, decorator| decorator.symbol_provider(ctx, chain))
    }

    /// Build the section registry for a run.
    ///
    /// Every decorator is registered against every catalog section, followed
    /// by its extra sections.
    pub fn section_registry<'a>(
        &'a self,
        ctx: &'a CodegenContext,
    ) -> Result<SectionRegistry<'a>, CodegenError> {
        let mut registry = SectionRegistry::with_catalog();
        for decorator in &self.decorators {
            let decorator: &'a dyn Decorator = decorator.as_ref();
            for name in SectionName::ALL {
                registry.contribute(name, decorator.name(), decorator.order(), move |section| {
                    decorator.section(ctx, section)
                })?;
            }
            for extra in decorator.extra_sections(ctx) {
                registry.contribute(
                    extra.section,
                    decorator.name(),
                    decorator.order(),
                    extra.render,
                )?;
            }
        }
        Ok(registry)
    }
}

impl std::fmt::Debug for CombinedDecorator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedDecorator")
            .field("decorators", &self.names())
            .finish()
    }
}
