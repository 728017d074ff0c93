//! Symbol providers and their explicit composition.

use std::{cell::RefCell, collections::HashMap};

use kiln_core::to_snake_case;
use kiln_model::{Shape, ShapeId};

use super::Symbol;
use crate::CodegenError;

/// Maps shapes to target-language symbols.
///
/// A resolver is a chain of providers: one base provider doing the
/// structural mapping, wrapped by stages that override or annotate what the
/// inner provider returns.
pub trait SymbolProvider {
    /// Stage name, shown by `kiln info`.
    fn name(&self) -> &'static str;

    fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError>;

    /// Field name for a member shape.
    fn to_member_name(&self, member: &Shape) -> String {
        to_snake_case(member.member_name().unwrap_or(member.id.name()))
    }
}

impl<P: SymbolProvider + ?Sized> SymbolProvider for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
        (**self).to_symbol(shape)
    }

    fn to_member_name(&self, member: &Shape) -> String {
        (**self).to_member_name(member)
    }
}

/// Ordered composition of symbol provider stages.
///
/// # Example
///
/// ```ignore
/// let provider = SymbolProviderChain::new(SymbolVisitor::new(model.clone(), settings))
///     .wrap(|inner| StreamingShapeSymbolProvider::new(inner, model.clone()))
///     .wrap(RustReservedWordSymbolProvider::new)
///     .build();
/// ```
pub struct SymbolProviderChain {
    provider: Box<dyn SymbolProvider>,
    stages: Vec<&'static str>,
}

impl SymbolProviderChain {
    pub fn new(base: impl SymbolProvider + 'static) -> Self {
        let stages = vec![base.name()];
        Self {
            provider: Box::new(base),
            stages,
        }
    }

    /// Wrap the chain built so far in another stage.
    pub fn wrap<P, F>(self, stage: F) -> Self
    where
        P: SymbolProvider + 'static,
        F: FnOnce(Box<dyn SymbolProvider>) -> P,
    {
        let Self {
            provider,
            mut stages,
        } = self;
        let wrapped = stage(provider);
        stages.push(wrapped.name());
        Self {
            provider: Box::new(wrapped),
            stages,
        }
    }

    /// Stage names from the base outwards.
    pub fn stage_names(&self) -> &[&'static str] {
        &self.stages
    }

    pub fn build(self) -> Box<dyn SymbolProvider> {
        self.provider
    }
}

/// Caches resolved symbols by shape id.
///
/// Resolution is deterministic, so caching never changes results.
pub struct MemoizingSymbolProvider {
    inner: Box<dyn SymbolProvider>,
    cache: RefCell<HashMap<ShapeId, Symbol>>,
}

impl MemoizingSymbolProvider {
    pub fn new(inner: Box<dyn SymbolProvider>) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl SymbolProvider for MemoizingSymbolProvider {
    fn name(&self) -> &'static str {
        "memoize"
    }

    fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
        if let Some(symbol) = self.cache.borrow().get(&shape.id) {
            return Ok(symbol.clone());
        }
        let symbol = self.inner.to_symbol(shape)?;
        self.cache
            .borrow_mut()
            .insert(shape.id.clone(), symbol.clone());
        Ok(symbol)
    }

    fn to_member_name(&self, member: &Shape) -> String {
        self.inner.to_member_name(member)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use kiln_model::ShapeBody;

    use super::*;

    struct Base {
        calls: Rc<Cell<usize>>,
    }

    impl SymbolProvider for Base {
        fn name(&self) -> &'static str {
            "base"
        }

        fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Symbol::generated(shape.id.name(), "model"))
        }
    }

    struct Optional {
        inner: Box<dyn SymbolProvider>,
    }

    impl SymbolProvider for Optional {
        fn name(&self) -> &'static str {
            "optional"
        }

        fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
            Ok(self.inner.to_symbol(shape)?.make_optional())
        }
    }

    fn base() -> (Base, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Base {
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn forecast() -> Shape {
        Shape::new(
            "example.weather#Forecast".parse().unwrap(),
            ShapeBody::Structure {
                members: Vec::new(),
            },
        )
    }

    #[test]
    fn test_chain_applies_stages_in_order() {
        let (base, _) = base();
        let chain = SymbolProviderChain::new(base).wrap(|inner| Optional { inner });
        assert_eq!(chain.stage_names(), &["base", "optional"]);

        let provider = chain.build();
        let symbol = provider.to_symbol(&forecast()).unwrap();
        assert_eq!(symbol.full_name(), "Option<crate::model::Forecast>");
        assert_eq!(provider.name(), "optional");
    }

    #[test]
    fn test_memoizing_calls_inner_once() {
        let (base, calls) = base();
        let provider = MemoizingSymbolProvider::new(Box::new(base));
        let shape = forecast();

        let first = provider.to_symbol(&shape).unwrap();
        let second = provider.to_symbol(&shape).unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
        assert_eq!(provider.cached(), 1);
    }

    #[test]
    fn test_default_member_name_is_snake_case() {
        let (base, _) = base();
        let member = Shape::member(
            "example.weather#Forecast$chanceOfRain".parse().unwrap(),
            "smithy.api#Float".parse().unwrap(),
        );
        assert_eq!(base.to_member_name(&member), "chance_of_rain");
    }
}
