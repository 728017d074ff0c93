use std::sync::Arc;

use kiln_codegen::{
    CodegenError,
    symbol::{Derive, Symbol, SymbolProvider},
};
use kiln_model::{Model, Shape};

/// Drops `PartialEq` and `Eq` from structures and unions holding a
/// streaming member, since a stream cannot be compared without consuming
/// it.
pub struct StreamingShapeMetadataProvider {
    inner: Box<dyn SymbolProvider>,
    model: Arc<Model>,
}

impl StreamingShapeMetadataProvider {
    pub fn new(inner: Box<dyn SymbolProvider>, model: Arc<Model>) -> Self {
        Self { inner, model }
    }
}

impl SymbolProvider for StreamingShapeMetadataProvider {
    fn name(&self) -> &'static str {
        "streaming-shape-metadata"
    }

    fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
        let mut symbol = self.inner.to_symbol(shape)?;
        if (shape.is_structure() || shape.is_union()) && self.model.has_streaming_member(shape) {
            symbol.metadata.derives.remove(&Derive::PartialEq);
            symbol.metadata.derives.remove(&Derive::Eq);
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
    use kiln_model::{ShapeId, normalize_operations};

    use super::*;
    use crate::symbol::{SymbolVisitor, SymbolVisitorConfig};

    fn derives(id: &str) -> Vec<&'static str> {
        let ctx = testing::weather_context(Mode::Server).unwrap();
        let model = Arc::new(normalize_operations(ctx.model()).unwrap());
        let base = SymbolVisitor::new(Arc::clone(&model), SymbolVisitorConfig::from_context(&ctx));
        let provider = StreamingShapeMetadataProvider::new(Box::new(base), Arc::clone(&model));
        let id: ShapeId = id.parse().unwrap();
        provider
            .to_symbol(model.expect_shape(&id).unwrap())
            .unwrap()
            .metadata
            .derive_names()
    }

    #[test]
    fn test_streaming_output_loses_equality() {
        assert_eq!(
            derives("example.weather.synthetic#GetCityImageOutput"),
            ["Debug", "Clone"]
        );
    }

    #[test]
    fn test_plain_structures_keep_derives() {
        assert_eq!(
            derives("example.weather.synthetic#GetCityOutput"),
            ["Debug", "Clone", "PartialEq"]
        );
    }
}
