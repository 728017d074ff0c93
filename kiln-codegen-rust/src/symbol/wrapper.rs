use std::sync::Arc;

use kiln_codegen::{
    CodegenError,
    symbol::{Symbol, SymbolProvider, SymbolType},
};
use kiln_model::{Model, Shape, ShapeBody};

/// Substitutes the server runtime's `Blob` and `DateTime` wrappers for the
/// types crate's, wherever a blob or timestamp appears in a symbol.
///
/// Enabled by `wrapper-types = true` for bindings that cannot share the
/// native types. Byte streams are runtime types already and stay as they
/// are.
pub struct WrapperSymbolProvider {
    inner: Box<dyn SymbolProvider>,
    model: Arc<Model>,
    server: String,
}

impl WrapperSymbolProvider {
    pub fn new(inner: Box<dyn SymbolProvider>, model: Arc<Model>, server: String) -> Self {
        Self {
            inner,
            model,
            server,
        }
    }

    /// Name of the wrapper for the innermost type of `shape`, if any.
    fn wrapper(&self, shape: &Shape) -> Option<&'static str> {
        match &shape.body {
            ShapeBody::Blob if !shape.traits.is_streaming() => Some("Blob"),
            ShapeBody::Timestamp => Some("DateTime"),
            ShapeBody::Member { target, .. } => self.follow(target),
            ShapeBody::List { member } => self.follow(member),
            ShapeBody::Map { value, .. } => self.follow(value),
            _ => None,
        }
    }

    fn follow(&self, id: &kiln_model::ShapeId) -> Option<&'static str> {
        self.model.get(id).and_then(|shape| self.wrapper(shape))
    }
}

fn replace_base(ty: &mut SymbolType, replacement: SymbolType) {
    match ty {
        SymbolType::Opaque { .. } => *ty = replacement,
        SymbolType::Option(inner)
        | SymbolType::Vec(inner)
        | SymbolType::Box(inner)
        | SymbolType::Reference(inner) => replace_base(inner, replacement),
        SymbolType::Map { value, .. } => replace_base(value, replacement),
    }
}

impl SymbolProvider for WrapperSymbolProvider {
    fn name(&self) -> &'static str {
        "wrapper-types"
    }

    fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
        let mut symbol = self.inner.to_symbol(shape)?;
        // Streaming members were already replaced by the runtime stream.
        if symbol.metadata.wrapped {
            return Ok(symbol);
        }
        if let Some(name) = self.wrapper(shape) {
            let types = format!("{}::types", self.server);
            replace_base(&mut symbol.ty, SymbolType::opaque(name, Some(&types)));
            symbol.metadata.wrapped = true;
        }
        Ok(symbol)
    }

    fn to_member_name(&self, member: &Shape) -> String {
        self.inner.to_member_name(member)
    }
}

#[cfg(test)]
mod tests {
    use kiln_codegen::symbol::SymbolMetadata;
    use kiln_model::{ShapeId, Trait};

    use super::*;

    fn id(s: &str) -> ShapeId {
        s.parse().unwrap()
    }

    /// Resolves everything to the types crate's `Blob`.
    struct Types;

    impl SymbolProvider for Types {
        fn name(&self) -> &'static str {
            "types"
        }

        fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
            let blob = SymbolType::opaque("Blob", Some("kiln_types"));
            Ok(match &shape.body {
                ShapeBody::List { .. } => Symbol::with_type(SymbolType::Vec(Box::new(blob))),
                ShapeBody::Member { .. } if shape.id.member() == Some("stream") => {
                    Symbol::external("ByteStream", Some("kiln_server::types")).with_metadata(
                        SymbolMetadata {
                            wrapped: true,
                            ..SymbolMetadata::default()
                        },
                    )
                }
                ShapeBody::Member { .. } => Symbol::with_type(blob).make_optional(),
                _ => Symbol::with_type(blob),
            })
        }
    }

    fn model() -> Arc<Model> {
        Arc::new(
            Model::builder()
                .shape(Shape::new(id("ex#Photos"), ShapeBody::List {
                    member: id("ex#Photos$member"),
                }))
                .shape(Shape::member(id("ex#Photos$member"), id("smithy.api#Blob")))
                .shape(Shape::new(id("ex#Video"), ShapeBody::Blob).with_trait(Trait::Streaming))
                .shape(Shape::structure(
                    id("ex#Album"),
                    vec![id("ex#Album$cover"), id("ex#Album$stream")],
                ))
                .shape(Shape::member(id("ex#Album$cover"), id("smithy.api#Blob")))
                .shape(Shape::member(id("ex#Album$stream"), id("ex#Video")))
                .build()
                .unwrap(),
        )
    }

    fn resolve(shape: &str) -> Symbol {
        let model = model();
        let provider =
            WrapperSymbolProvider::new(Box::new(Types), Arc::clone(&model), "kiln_server".into());
        provider
            .to_symbol(model.expect_shape(&id(shape)).unwrap())
            .unwrap()
    }

    #[test]
    fn test_member_keeps_optionality() {
        let symbol = resolve("ex#Album$cover");
        assert_eq!(symbol.full_name(), "Option<kiln_server::types::Blob>");
        assert!(symbol.metadata.wrapped);
    }

    #[test]
    fn test_collections_are_rewritten() {
        assert_eq!(
            resolve("ex#Photos").full_name(),
            "Vec<kiln_server::types::Blob>"
        );
    }

    #[test]
    fn test_streams_are_untouched() {
        assert_eq!(
            resolve("ex#Album$stream").full_name(),
            "kiln_server::types::ByteStream"
        );
        assert_eq!(resolve("ex#Video").full_name(), "kiln_types::Blob");
    }
}
