use kiln_codegen::{
    CodegenError,
    symbol::{Symbol, SymbolProvider},
};
use kiln_model::Shape;

use crate::naming::RUST_NAMING;

/// Renames generated types that would shadow prelude names and escapes
/// member names that are Rust keywords.
pub struct RustReservedWordSymbolProvider {
    inner: Box<dyn SymbolProvider>,
}

impl RustReservedWordSymbolProvider {
    pub fn new(inner: Box<dyn SymbolProvider>) -> Self {
        Self { inner }
    }
}

impl SymbolProvider for RustReservedWordSymbolProvider {
    fn name(&self) -> &'static str {
        "reserved-words"
    }

    fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
        let symbol = self.inner.to_symbol(shape)?;
        // Only generated types can be renamed; `String` from std stays.
        if !symbol.is_generated() || !RUST_NAMING.is_reserved_type(symbol.name()) {
            return Ok(symbol);
        }
        let renamed = (RUST_NAMING.escape_type)(symbol.name());
        Ok(symbol.renamed(renamed))
    }

    fn to_member_name(&self, member: &Shape) -> String {
        RUST_NAMING.field_name(member.member_name().unwrap_or(member.id.name()))
    }
}

#[cfg(test)]
mod tests {
    use kiln_codegen::symbol::SymbolType;
    use kiln_model::ShapeId;

    use super::*;

    struct Generated;

    impl SymbolProvider for Generated {
        fn name(&self) -> &'static str {
            "generated"
        }

        fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
            if shape.id.name() == "String" {
                return Ok(Symbol::with_type(SymbolType::opaque("String", None)));
            }
            Ok(Symbol::generated(shape.id.name(), "model"))
        }
    }

    fn resolve(id: &str) -> String {
        let provider = RustReservedWordSymbolProvider::new(Box::new(Generated));
        let id: ShapeId = id.parse().unwrap();
        let shape = Shape::structure(id, Vec::new());
        provider.to_symbol(&shape).unwrap().full_name()
    }

    #[test]
    fn test_reserved_type_names_are_renamed() {
        assert_eq!(resolve("example.weather#Result"), "crate::model::ResultValue");
        assert_eq!(resolve("example.weather#Forecast"), "crate::model::Forecast");
    }

    #[test]
    fn test_std_types_are_left_alone() {
        assert_eq!(resolve("smithy.api#String"), "String");
    }

    #[test]
    fn test_member_names_are_escaped() {
        let provider = RustReservedWordSymbolProvider::new(Box::new(Generated));
        let member = |name: &str| {
            Shape::member(
                format!("example.weather#Forecast${}", name).parse().unwrap(),
                "smithy.api#String".parse().unwrap(),
            )
        };
        assert_eq!(provider.to_member_name(&member("type")), "r#type");
        assert_eq!(provider.to_member_name(&member("self")), "self_");
        assert_eq!(provider.to_member_name(&member("chanceOfRain")), "chance_of_rain");
    }
}
