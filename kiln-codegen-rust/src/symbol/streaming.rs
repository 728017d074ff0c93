use std::sync::Arc;

use kiln_codegen::{
    CodegenError,
    symbol::{Symbol, SymbolMetadata, SymbolProvider},
};
use kiln_model::{Model, Shape};

/// Maps streaming blob members of operation inputs and outputs to the
/// runtime `ByteStream`.
///
/// Only members of synthetic envelopes are affected; a streaming blob
/// nested deeper in the model keeps its plain blob type.
pub struct StreamingShapeSymbolProvider {
    inner: Box<dyn SymbolProvider>,
    model: Arc<Model>,
    server: String,
}

impl StreamingShapeSymbolProvider {
    pub fn new(inner: Box<dyn SymbolProvider>, model: Arc<Model>, server: String) -> Self {
        Self {
            inner,
            model,
            server,
        }
    }

    fn is_envelope_stream(&self, shape: &Shape) -> Result<bool, CodegenError> {
        let container = match shape.as_member() {
            Some((container, _)) => container,
            None => return Ok(false),
        };
        if !self.model.is_streaming(shape) {
            return Ok(false);
        }
        Ok(self.model.expect_shape(container)?.traits.is_synthetic())
    }
}

impl SymbolProvider for StreamingShapeSymbolProvider {
    fn name(&self) -> &'static str {
        "streaming-shape"
    }

    fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
        if !self.is_envelope_stream(shape)? {
            return self.inner.to_symbol(shape);
        }
        let types = format!("{}::types", self.server);
        // A stream is always present; an empty body is an empty stream.
        Ok(
            Symbol::external("ByteStream", Some(&types)).with_metadata(SymbolMetadata {
                wrapped: true,
                ..SymbolMetadata::default()
            }),
        )
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

    fn provider() -> (StreamingShapeSymbolProvider, Arc<Model>) {
        let ctx = testing::weather_context(Mode::Server).unwrap();
        let model = Arc::new(normalize_operations(ctx.model()).unwrap());
        let base = SymbolVisitor::new(Arc::clone(&model), SymbolVisitorConfig::from_context(&ctx));
        (
            StreamingShapeSymbolProvider::new(
                Box::new(base),
                Arc::clone(&model),
                ctx.runtime_crate("server"),
            ),
            model,
        )
    }

    fn resolve(provider: &StreamingShapeSymbolProvider, model: &Model, id: &str) -> Symbol {
        let id: ShapeId = id.parse().unwrap();
        provider.to_symbol(model.expect_shape(&id).unwrap()).unwrap()
    }

    #[test]
    fn test_envelope_member_becomes_byte_stream() {
        let (provider, model) = provider();
        let symbol = resolve(
            &provider,
            &model,
            "example.weather.synthetic#GetCityImageOutput$image",
        );
        assert_eq!(symbol.full_name(), "kiln_server::types::ByteStream");
        assert!(symbol.metadata.wrapped);
        assert!(!symbol.is_optional());
    }

    #[test]
    fn test_original_structure_keeps_blob() {
        let (provider, model) = provider();
        let symbol = resolve(&provider, &model, "example.weather#GetCityImageOutput$image");
        assert_eq!(symbol.full_name(), "kiln_types::Blob");
    }

    #[test]
    fn test_other_members_pass_through() {
        let (provider, model) = provider();
        let symbol = resolve(
            &provider,
            &model,
            "example.weather.synthetic#GetCityOutput$name",
        );
        assert_eq!(symbol.full_name(), "String");
    }
}
