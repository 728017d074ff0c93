//! The immutable shape graph and its builder.

use std::collections::{BTreeMap, BTreeSet};

use crate::{ModelError, NumberType, Shape, ShapeBody, ShapeId, ShapeType};

/// Namespace of the built-in simple shapes.
pub const PRELUDE_NAMESPACE: &str = "smithy.api";

fn prelude() -> Vec<Shape> {
    let simple = [
        ("String", ShapeBody::String),
        ("Blob", ShapeBody::Blob),
        ("Boolean", ShapeBody::Boolean),
        ("Timestamp", ShapeBody::Timestamp),
        ("Byte", ShapeBody::Number(NumberType::Byte)),
        ("Short", ShapeBody::Number(NumberType::Short)),
        ("Integer", ShapeBody::Number(NumberType::Integer)),
        ("Long", ShapeBody::Number(NumberType::Long)),
        ("Float", ShapeBody::Number(NumberType::Float)),
        ("Double", ShapeBody::Number(NumberType::Double)),
        ("BigInteger", ShapeBody::Number(NumberType::BigInteger)),
        ("BigDecimal", ShapeBody::Number(NumberType::BigDecimal)),
    ];
    simple
        .into_iter()
        .map(|(name, body)| Shape::new(ShapeId::new(PRELUDE_NAMESPACE, name), body))
        .collect()
}

/// A validated, immutable shape graph.
///
/// Every reference held by a shape in the model resolves to another shape
/// in the same model. Use [`Model::to_builder`] to derive a changed copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl Model {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    pub fn to_builder(&self) -> ModelBuilder {
        ModelBuilder {
            shapes: self.shapes.clone(),
        }
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// Look up a shape that must exist.
    pub fn expect_shape(&self, id: &ShapeId) -> Result<&Shape, ModelError> {
        self.shapes
            .get(id)
            .ok_or_else(|| ModelError::MissingShape { id: id.clone() })
    }

    /// Look up a shape that must exist and be of kind `expected`.
    pub fn expect_kind(&self, id: &ShapeId, expected: ShapeType) -> Result<&Shape, ModelError> {
        let shape = self.expect_shape(id)?;
        let actual = shape.shape_type();
        if actual != expected {
            return Err(ModelError::WrongKind {
                id: id.clone(),
                expected,
                actual,
            });
        }
        Ok(shape)
    }

    /// All shapes, ordered by id.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Operations contained in `service`, deduplicated and sorted by id.
    pub fn operations(&self, service: &ShapeId) -> Result<Vec<&Shape>, ModelError> {
        let shape = self.expect_kind(service, ShapeType::Service)?;
        let ids: BTreeSet<&ShapeId> = match &shape.body {
            ShapeBody::Service { operations, .. } => operations.iter().collect(),
            _ => BTreeSet::new(),
        };
        ids.into_iter()
            .map(|id| self.expect_kind(id, ShapeType::Operation))
            .collect()
    }

    /// The shape a member points at.
    pub fn member_target(&self, member: &Shape) -> Result<&Shape, ModelError> {
        match member.as_member() {
            Some((_, target)) => self.expect_shape(target),
            None => Err(ModelError::WrongKind {
                id: member.id.clone(),
                expected: ShapeType::Member,
                actual: member.shape_type(),
            }),
        }
    }

    /// A member streams if it or its target carries the streaming trait.
    pub fn is_streaming(&self, member: &Shape) -> bool {
        if member.traits.is_streaming() {
            return true;
        }
        member
            .as_member()
            .and_then(|(_, target)| self.get(target))
            .is_some_and(|target| target.traits.is_streaming())
    }

    /// Does this structure or union hold at least one streaming member?
    pub fn has_streaming_member(&self, shape: &Shape) -> bool {
        shape
            .members()
            .iter()
            .filter_map(|id| self.get(id))
            .any(|member| self.is_streaming(member))
    }
}

/// Mutable staging area for a [`Model`].
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl ModelBuilder {
    /// Add a shape, replacing any shape with the same id.
    pub fn shape(mut self, shape: Shape) -> Self {
        self.insert(shape);
        self
    }

    pub fn insert(&mut self, shape: Shape) -> Option<Shape> {
        self.shapes.insert(shape.id.clone(), shape)
    }

    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        self.shapes.remove(id)
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    /// Rewrite every shape in place.
    pub fn map_shapes(mut self, mut f: impl FnMut(Shape) -> Shape) -> Self {
        self.shapes = std::mem::take(&mut self.shapes)
            .into_values()
            .map(|shape| {
                let shape = f(shape);
                (shape.id.clone(), shape)
            })
            .collect();
        self
    }

    /// Add the prelude and check that every reference resolves.
    pub fn build(mut self) -> Result<Model, ModelError> {
        for shape in prelude() {
            self.shapes.entry(shape.id.clone()).or_insert(shape);
        }

        for shape in self.shapes.values() {
            let container = shape.as_member().map(|(container, _)| container);
            for target in shape.references().into_iter().chain(container) {
                if !self.shapes.contains_key(target) {
                    return Err(ModelError::UnresolvedReference {
                        shape: shape.id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        Ok(Model {
            shapes: self.shapes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Trait;

    fn id(s: &str) -> ShapeId {
        s.parse().unwrap()
    }

    fn streaming_model() -> Model {
        Model::builder()
            .shape(Shape::new(id("ex#Stream"), ShapeBody::Blob).with_trait(Trait::Streaming))
            .shape(Shape::structure(
                id("ex#Upload"),
                vec![id("ex#Upload$body"), id("ex#Upload$name")],
            ))
            .shape(Shape::member(id("ex#Upload$body"), id("ex#Stream")))
            .shape(Shape::member(id("ex#Upload$name"), id("smithy.api#String")))
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_adds_prelude() {
        let model = Model::builder().build().unwrap();
        assert!(model.contains(&id("smithy.api#String")));
        assert!(model.contains(&id("smithy.api#BigDecimal")));
    }

    #[test]
    fn test_build_rejects_dangling_reference() {
        let err = Model::builder()
            .shape(Shape::structure(id("ex#A"), vec![id("ex#A$b")]))
            .shape(Shape::member(id("ex#A$b"), id("ex#Missing")))
            .build()
            .unwrap_err();

        match err {
            ModelError::UnresolvedReference { shape, target } => {
                assert_eq!(shape, id("ex#A$b"));
                assert_eq!(target, id("ex#Missing"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_operations_sorted_and_deduplicated() {
        let model = Model::builder()
            .shape(Shape::operation(id("ex#B"), None, None))
            .shape(Shape::operation(id("ex#A"), None, None))
            .shape(Shape::service(
                id("ex#Svc"),
                "1",
                vec![id("ex#B"), id("ex#A"), id("ex#B")],
            ))
            .build()
            .unwrap();

        let names: Vec<&str> = model
            .operations(&id("ex#Svc"))
            .unwrap()
            .iter()
            .map(|op| op.id.name())
            .collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_expect_kind_reports_actual() {
        let model = Model::builder().build().unwrap();
        let err = model
            .expect_kind(&id("smithy.api#Blob"), ShapeType::Service)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "shape `smithy.api#Blob` is a blob, expected a service"
        );
    }

    #[test]
    fn test_expect_shape_missing() {
        let model = Model::builder().build().unwrap();
        assert!(matches!(
            model.expect_shape(&id("ex#Nope")),
            Err(ModelError::MissingShape { .. })
        ));
    }

    #[test]
    fn test_streaming_queries() {
        let model = streaming_model();
        let upload = model.expect_shape(&id("ex#Upload")).unwrap();
        let body = model.expect_shape(&id("ex#Upload$body")).unwrap();
        let name = model.expect_shape(&id("ex#Upload$name")).unwrap();

        assert!(model.is_streaming(body));
        assert!(!model.is_streaming(name));
        assert!(model.has_streaming_member(upload));
        assert_eq!(model.member_target(body).unwrap().id, id("ex#Stream"));
    }

    #[test]
    fn test_to_builder_leaves_original_untouched() {
        let model = streaming_model();
        let changed = model
            .to_builder()
            .map_shapes(|shape| shape.with_trait(Trait::Documentation("doc".into())))
            .build()
            .unwrap();

        assert!(model.shapes().all(|s| s.traits.documentation().is_none()));
        assert!(changed.shapes().all(|s| s.traits.documentation() == Some("doc")));
    }
}
