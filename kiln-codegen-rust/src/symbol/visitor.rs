//! Structural mapping of shapes to Rust types.

use std::sync::Arc;

use kiln_codegen::{
    CodegenContext, CodegenError,
    symbol::{Derive, Symbol, SymbolMetadata, SymbolProvider, SymbolType},
};
use kiln_manifest::Mode;
use kiln_model::{Model, NumberType, PRELUDE_NAMESPACE, Shape, ShapeBody, ShapeId, TraitKind};

use crate::naming::RUST_NAMING;

/// Settings the base mapping depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolVisitorConfig {
    /// Rust path of the runtime types crate (`kiln_types`).
    pub types_crate: String,
    pub mode: Mode,
}

impl SymbolVisitorConfig {
    pub fn from_context(ctx: &CodegenContext) -> Self {
        Self {
            types_crate: ctx.runtime_crate("types"),
            mode: ctx.mode(),
        }
    }
}

/// Base stage: maps every shape kind to its Rust type.
pub struct SymbolVisitor {
    model: Arc<Model>,
    config: SymbolVisitorConfig,
}

impl SymbolVisitor {
    pub fn new(model: Arc<Model>, config: SymbolVisitorConfig) -> Self {
        Self { model, config }
    }

    fn runtime(&self, name: &str) -> Symbol {
        Symbol::external(name, Some(&self.config.types_crate))
    }

    fn type_name(shape: &Shape) -> String {
        RUST_NAMING.type_name(shape.id.name())
    }

    fn structure(&self, shape: &Shape) -> Symbol {
        let module = if shape.traits.has(TraitKind::SyntheticInput) {
            "input"
        } else if shape.traits.has(TraitKind::SyntheticOutput) {
            "output"
        } else if shape.traits.has(TraitKind::Error) {
            "error"
        } else {
            "model"
        };
        Symbol::generated(Self::type_name(shape), module).with_metadata(structure_metadata())
    }

    fn string(&self, shape: &Shape) -> Symbol {
        if shape.traits.has(TraitKind::Enum) {
            return Symbol::generated(Self::type_name(shape), "model").with_metadata(
                SymbolMetadata::with_derives([
                    Derive::Debug,
                    Derive::Clone,
                    Derive::PartialEq,
                    Derive::Eq,
                    Derive::Hash,
                    Derive::PartialOrd,
                    Derive::Ord,
                ]),
            );
        }
        // Servers validate patterns, so constrained strings get a newtype.
        let constrained = shape.traits.pattern().is_some()
            && shape.id.namespace() != PRELUDE_NAMESPACE
            && self.config.mode == Mode::Server;
        if constrained {
            return Symbol::generated(Self::type_name(shape), "model").with_metadata(
                SymbolMetadata::with_derives([
                    Derive::Debug,
                    Derive::Clone,
                    Derive::PartialEq,
                    Derive::Eq,
                    Derive::Hash,
                ]),
            );
        }
        Symbol::external("String", None)
    }

    fn number(&self, number: NumberType) -> Symbol {
        match number {
            NumberType::Byte => Symbol::external("i8", None),
            NumberType::Short => Symbol::external("i16", None),
            NumberType::Integer => Symbol::external("i32", None),
            NumberType::Long => Symbol::external("i64", None),
            NumberType::Float => Symbol::external("f32", None),
            NumberType::Double => Symbol::external("f64", None),
            NumberType::BigInteger => self.runtime("BigInteger"),
            NumberType::BigDecimal => self.runtime("BigDecimal"),
        }
    }

    /// Type of the values held by a list or map member.
    fn element(&self, member: &ShapeId) -> Result<SymbolType, CodegenError> {
        let member = self.model.expect_shape(member)?;
        let target = self.model.member_target(member)?;
        Ok(self.to_symbol(target)?.ty)
    }
}

fn structure_metadata() -> SymbolMetadata {
    SymbolMetadata::with_derives([Derive::Debug, Derive::Clone, Derive::PartialEq])
}

impl SymbolProvider for SymbolVisitor {
    fn name(&self) -> &'static str {
        "symbol-visitor"
    }

    fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
        let symbol = match &shape.body {
            ShapeBody::Member { .. } => {
                let target = self.model.member_target(shape)?;
                let symbol = self.to_symbol(target)?;
                if shape.traits.is_required() {
                    symbol
                } else {
                    symbol.make_optional()
                }
            }
            ShapeBody::Structure { .. } => self.structure(shape),
            ShapeBody::Union { .. } => Symbol::generated(Self::type_name(shape), "model")
                .with_metadata(structure_metadata()),
            ShapeBody::Operation { .. } => Symbol::generated(Self::type_name(shape), "operation")
                .with_metadata(SymbolMetadata::with_derives([Derive::Debug, Derive::Clone])),
            // Defined in `service.rs` and re-exported from the crate root.
            ShapeBody::Service { .. } => Symbol {
                ty: SymbolType::opaque(Self::type_name(shape), Some("crate")),
                module: Some("service".to_string()),
                metadata: SymbolMetadata::default(),
            },
            ShapeBody::String => self.string(shape),
            ShapeBody::Number(number) => self.number(*number),
            ShapeBody::Boolean => Symbol::external("bool", None),
            ShapeBody::Blob => self.runtime("Blob"),
            ShapeBody::Timestamp => self.runtime("DateTime"),
            ShapeBody::List { member } => Symbol::with_type(SymbolType::Vec(Box::new(
                self.element(member)?,
            ))),
            ShapeBody::Map { value, .. } => Symbol::with_type(SymbolType::Map {
                key: Box::new(SymbolType::opaque("String", None)),
                value: Box::new(self.element(value)?),
            }),
        };
        Ok(symbol)
    }
}

#[cfg(test)]
mod tests {
    use kiln_codegen::testing;

    use super::*;

    fn id(s: &str) -> ShapeId {
        s.parse().unwrap()
    }

    fn visitor(mode: Mode) -> (SymbolVisitor, Arc<Model>) {
        let ctx = testing::weather_context(mode).unwrap();
        let model = Arc::clone(ctx.model());
        (
            SymbolVisitor::new(Arc::clone(&model), SymbolVisitorConfig::from_context(&ctx)),
            model,
        )
    }

    fn resolve(visitor: &SymbolVisitor, model: &Model, shape: &str) -> String {
        let shape = model.expect_shape(&id(shape)).unwrap();
        visitor.to_symbol(shape).unwrap().full_name()
    }

    #[test]
    fn test_simple_shapes() {
        let (visitor, model) = visitor(Mode::Client);
        assert_eq!(resolve(&visitor, &model, "smithy.api#String"), "String");
        assert_eq!(resolve(&visitor, &model, "smithy.api#Integer"), "i32");
        assert_eq!(resolve(&visitor, &model, "smithy.api#Float"), "f32");
        assert_eq!(resolve(&visitor, &model, "smithy.api#Boolean"), "bool");
        assert_eq!(resolve(&visitor, &model, "smithy.api#Timestamp"), "kiln_types::DateTime");
        assert_eq!(resolve(&visitor, &model, "smithy.api#BigDecimal"), "kiln_types::BigDecimal");
        assert_eq!(
            resolve(&visitor, &model, "example.weather#CityImageData"),
            "kiln_types::Blob"
        );
    }

    #[test]
    fn test_members_are_optional_unless_required() {
        let (visitor, model) = visitor(Mode::Client);
        assert_eq!(
            resolve(&visitor, &model, "example.weather#ListCitiesInput$pageSize"),
            "Option<i32>"
        );
        assert_eq!(
            resolve(&visitor, &model, "example.weather#GetCityOutput$name"),
            "String"
        );
        assert_eq!(
            resolve(&visitor, &model, "example.weather#ListCitiesOutput$items"),
            "Vec<crate::model::CitySummary>"
        );
    }

    #[test]
    fn test_structure_modules() {
        let (visitor, model) = visitor(Mode::Client);
        assert_eq!(
            resolve(&visitor, &model, "example.weather#NoSuchResource"),
            "crate::error::NoSuchResource"
        );
        assert_eq!(
            resolve(&visitor, &model, "example.weather#CitySummary"),
            "crate::model::CitySummary"
        );
        assert_eq!(
            resolve(&visitor, &model, "example.weather#GetCity"),
            "crate::operation::GetCity"
        );
        assert_eq!(resolve(&visitor, &model, "example.weather#Weather"), "crate::Weather");
    }

    #[test]
    fn test_enum_derives() {
        let (visitor, model) = visitor(Mode::Client);
        let shape = model.expect_shape(&id("example.weather#TemperatureUnit")).unwrap();
        let symbol = visitor.to_symbol(shape).unwrap();
        assert_eq!(symbol.full_name(), "crate::model::TemperatureUnit");
        assert_eq!(
            symbol.metadata.derive_names(),
            ["Debug", "Clone", "PartialEq", "Eq", "Hash", "PartialOrd", "Ord"]
        );
    }

    #[test]
    fn test_pattern_strings_depend_on_mode() {
        let (server, model) = visitor(Mode::Server);
        assert_eq!(
            resolve(&server, &model, "example.weather#CityId"),
            "crate::model::CityId"
        );
        let (client, model) = visitor(Mode::Client);
        assert_eq!(resolve(&client, &model, "example.weather#CityId"), "String");
    }
}
