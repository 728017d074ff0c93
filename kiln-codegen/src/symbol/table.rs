//! Resolved symbols for one service.

use std::collections::{BTreeMap, btree_map::Entry};

use kiln_model::{Model, ModelError, Shape, ShapeBody, ShapeId, ShapeType, TraitKind, Walker};

use super::{Symbol, SymbolProvider};
use crate::CodegenError;

/// Every shape in a service closure mapped to its symbol.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: BTreeMap<ShapeId, Symbol>,
    /// Generated type name -> defining shape.
    definitions: BTreeMap<String, ShapeId>,
}

impl SymbolTable {
    /// Resolve every shape reachable from `service`.
    ///
    /// Fails on the first shape the provider cannot map, and when two shapes
    /// would define the same generated type.
    pub fn resolve(
        provider: &dyn SymbolProvider,
        model: &Model,
        service: &ShapeId,
    ) -> Result<Self, CodegenError> {
        model.expect_kind(service, ShapeType::Service)?;

        let mut table = Self::default();
        for shape in Walker::new(model).walk(service) {
            let symbol = provider.to_symbol(shape)?;

            if defines_type(shape) && symbol.is_generated() {
                match table.definitions.entry(symbol.full_name()) {
                    Entry::Occupied(existing) => {
                        return Err(CodegenError::SymbolCollision {
                            name: existing.key().clone(),
                            first: existing.get().clone(),
                            second: shape.id.clone(),
                        });
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(shape.id.clone());
                    }
                }
            }

            tracing::debug!(shape = %shape.id, symbol = %symbol, "resolved symbol");
            table.symbols.insert(shape.id.clone(), symbol);
        }
        Ok(table)
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Look up a symbol that must have been resolved.
    pub fn expect(&self, id: &ShapeId) -> Result<&Symbol, CodegenError> {
        self.symbols
            .get(id)
            .ok_or_else(|| ModelError::MissingShape { id: id.clone() }.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ShapeId, &Symbol)> {
        self.symbols.iter()
    }

    /// Generated type names with their defining shapes, sorted by name.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &ShapeId)> {
        self.definitions.iter().map(|(name, id)| (name.as_str(), id))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Does this shape produce its own generated type?
fn defines_type(shape: &Shape) -> bool {
    match &shape.body {
        ShapeBody::Structure { .. }
        | ShapeBody::Union { .. }
        | ShapeBody::Operation { .. }
        | ShapeBody::Service { .. } => true,
        ShapeBody::String => shape.traits.has(TraitKind::Enum),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use kiln_model::Shape;

    use super::*;

    /// Maps every structure to `crate::model::<name>`, ignoring namespaces.
    struct ByName;

    impl SymbolProvider for ByName {
        fn name(&self) -> &'static str {
            "by-name"
        }

        fn to_symbol(&self, shape: &Shape) -> Result<Symbol, CodegenError> {
            Ok(match &shape.body {
                ShapeBody::Structure { .. } => Symbol::generated(shape.id.name(), "model"),
                ShapeBody::Service { .. } => Symbol::generated(shape.id.name(), "service"),
                ShapeBody::Operation { .. } => Symbol::generated(shape.id.name(), "operation"),
                _ => Symbol::external(shape.id.name(), None),
            })
        }
    }

    fn id(s: &str) -> ShapeId {
        s.parse().unwrap()
    }

    fn service_with(inputs: &[&str]) -> Model {
        let mut builder = Model::builder();
        let mut ops = Vec::new();
        for (i, input) in inputs.iter().enumerate() {
            let op = id(&format!("example.weather#Op{}", i));
            builder = builder
                .shape(Shape::structure(id(input), Vec::new()))
                .shape(Shape::operation(op.clone(), Some(id(input)), None));
            ops.push(op);
        }
        builder
            .shape(Shape::service(id("example.weather#Weather"), "1.0", ops))
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolves_service_closure() {
        let model = service_with(&["example.weather#GetForecastInput"]);
        let table =
            SymbolTable::resolve(&ByName, &model, &id("example.weather#Weather")).unwrap();

        let symbol = table.get(&id("example.weather#GetForecastInput")).unwrap();
        assert_eq!(symbol.full_name(), "crate::model::GetForecastInput");
        let names: Vec<_> = table.definitions().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "crate::model::GetForecastInput",
                "crate::operation::Op0",
                "crate::service::Weather",
            ]
        );
    }

    #[test]
    fn test_collision_names_both_shapes() {
        let model = service_with(&["example.weather#Input", "example.other#Input"]);
        let err =
            SymbolTable::resolve(&ByName, &model, &id("example.weather#Weather")).unwrap_err();

        match err {
            CodegenError::SymbolCollision {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "crate::model::Input");
                let mut both = vec![first.to_string(), second.to_string()];
                both.sort();
                assert_eq!(both, vec!["example.other#Input", "example.weather#Input"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_not_a_service() {
        let model = service_with(&["example.weather#Input"]);
        let err = SymbolTable::resolve(&ByName, &model, &id("example.weather#Input")).unwrap_err();
        assert!(matches!(err, CodegenError::Model(ModelError::WrongKind { .. })));
    }

    #[test]
    fn test_expect_missing() {
        let table = SymbolTable::default();
        assert!(table.is_empty());
        assert!(matches!(
            table.expect(&id("example.weather#Nope")),
            Err(CodegenError::Model(ModelError::MissingShape { .. }))
        ));
    }
}
