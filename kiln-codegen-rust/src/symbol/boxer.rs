use std::sync::Arc;

use kiln_codegen::{
    CodegenError,
    symbol::{Symbol, SymbolProvider},
};
use kiln_model::{Model, Shape, Walker};

/// Boxes members that would otherwise make a structure infinitely sized.
///
/// A member is recursive when its target can reach the member's container
/// without passing through a list or map. Collections already live on the
/// heap, so those paths need no indirection.
pub struct RecursiveShapeBoxer {
    inner: Box<dyn SymbolProvider>,
    model: Arc<Model>,
}

impl RecursiveShapeBoxer {
    pub fn new(inner: Box<dyn SymbolProvider>, model: Arc<Model>) -> Self {
        Self { inner, model }
    }

    fn is_recursive(&self, member: &Shape) -> bool {
        let (container, target) = match member.as_member() {
            Some(ids) => ids,
            None => return false,
        };
        let aggregate = self
            .model
            .get(container)
            .is_some_and(|c| c.is_structure() || c.is_union());
        aggregate
            && Walker::new(&self.model)
                .skip_collections()
                .can_reach(target, container)
    }
}

impl SymbolProvider for RecursiveShapeBoxer {
    fn name(&self) -> &'static str {
        "recursive-shape-boxer"
    }

    fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
        let symbol = self.inner.to_symbol(shape)?;
        if self.is_recursive(shape) {
            tracing::trace!(member = %shape.id, "boxing recursive member");
            return Ok(symbol.make_boxed());
        }
        Ok(symbol)
    }

    fn to_member_name(&self, member: &Shape) -> String {
        self.inner.to_member_name(member)
    }
}

#[cfg(test)]
mod tests {
    use kiln_codegen::testing;
    use kiln_manifest::Mode;
    use kiln_model::ShapeId;

    use super::*;
    use crate::symbol::{SymbolVisitor, SymbolVisitorConfig};

    fn resolve(id: &str) -> Symbol {
        let ctx = testing::weather_context(Mode::Client).unwrap();
        let model = Arc::clone(ctx.model());
        let base = SymbolVisitor::new(Arc::clone(&model), SymbolVisitorConfig::from_context(&ctx));
        let boxer = RecursiveShapeBoxer::new(Box::new(base), Arc::clone(&model));
        let id: ShapeId = id.parse().unwrap();
        boxer.to_symbol(model.expect_shape(&id).unwrap()).unwrap()
    }

    #[test]
    fn test_self_reference_is_boxed_inside_option() {
        let symbol = resolve("example.weather#Region$parent");
        assert_eq!(symbol.full_name(), "Option<Box<crate::model::Region>>");
        assert!(symbol.metadata.boxed);
    }

    #[test]
    fn test_non_recursive_member_is_not_boxed() {
        let symbol = resolve("example.weather#CitySummary$region");
        assert_eq!(symbol.full_name(), "Option<crate::model::Region>");
        assert!(!symbol.metadata.boxed);
    }

    #[test]
    fn test_paths_through_lists_are_not_boxed() {
        let symbol = resolve("example.weather#ListCitiesOutput$items");
        assert_eq!(symbol.full_name(), "Vec<crate::model::CitySummary>");
    }
}
