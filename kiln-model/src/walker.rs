//! Deterministic traversal of the shape graph.

use std::collections::HashSet;

use crate::{Model, Shape, ShapeId};

/// Walks everything reachable from a shape.
///
/// Traversal is depth-first pre-order following references in declaration
/// order, with a visited set so cyclic graphs terminate.
#[derive(Debug, Clone, Copy)]
pub struct Walker<'m> {
    model: &'m Model,
    through_collections: bool,
}

impl<'m> Walker<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            through_collections: true,
        }
    }

    /// Do not descend into list or map shapes.
    ///
    /// Collections are heap-allocated, so paths through them never need
    /// extra indirection when looking for recursive members.
    pub fn skip_collections(mut self) -> Self {
        self.through_collections = false;
        self
    }

    /// Every shape reachable from `start`, including `start` itself.
    pub fn walk(&self, start: &ShapeId) -> Vec<&'m Shape> {
        let mut out = Vec::new();
        self.visit(start, |shape| {
            out.push(shape);
            false
        });
        out
    }

    /// Is `to` reachable from `from` (or equal to it)?
    pub fn can_reach(&self, from: &ShapeId, to: &ShapeId) -> bool {
        self.visit(from, |shape| &shape.id == to)
    }

    /// Visit shapes until `f` returns true; returns whether it did.
    fn visit(&self, start: &ShapeId, mut f: impl FnMut(&'m Shape) -> bool) -> bool {
        let mut visited: HashSet<&'m ShapeId> = HashSet::new();
        let mut stack: Vec<&'m Shape> = self.model.get(start).into_iter().collect();

        while let Some(shape) = stack.pop() {
            if !visited.insert(&shape.id) {
                continue;
            }
            if f(shape) {
                return true;
            }
            if !self.through_collections && shape.is_collection() {
                continue;
            }
            let next = shape
                .references()
                .into_iter()
                .rev()
                .filter(|id| !visited.contains(id))
                .filter_map(|id| self.model.get(id));
            stack.extend(next);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShapeBody;

    fn id(s: &str) -> ShapeId {
        s.parse().unwrap()
    }

    /// `Node { next: Node, children: NodeList }`, `NodeList = list<Node>`.
    fn recursive_model() -> Model {
        Model::builder()
            .shape(Shape::structure(
                id("ex#Node"),
                vec![id("ex#Node$next"), id("ex#Node$children")],
            ))
            .shape(Shape::member(id("ex#Node$next"), id("ex#Node")))
            .shape(Shape::member(id("ex#Node$children"), id("ex#NodeList")))
            .shape(Shape::new(
                id("ex#NodeList"),
                ShapeBody::List {
                    member: id("ex#NodeList$member"),
                },
            ))
            .shape(Shape::member(id("ex#NodeList$member"), id("ex#Node")))
            .build()
            .unwrap()
    }

    #[test]
    fn test_walk_terminates_on_cycles() {
        let model = recursive_model();
        let ids: Vec<String> = Walker::new(&model)
            .walk(&id("ex#Node"))
            .iter()
            .map(|s| s.id.to_string())
            .collect();

        assert_eq!(
            ids,
            [
                "ex#Node",
                "ex#Node$next",
                "ex#Node$children",
                "ex#NodeList",
                "ex#NodeList$member",
            ]
        );
    }

    #[test]
    fn test_walk_is_repeatable() {
        let model = recursive_model();
        let walker = Walker::new(&model);
        assert_eq!(walker.walk(&id("ex#Node")), walker.walk(&id("ex#Node")));
    }

    #[test]
    fn test_can_reach() {
        let model = recursive_model();
        let walker = Walker::new(&model);
        assert!(walker.can_reach(&id("ex#NodeList"), &id("ex#Node")));
        assert!(!walker.can_reach(&id("smithy.api#String"), &id("ex#Node")));
    }

    #[test]
    fn test_skip_collections_cuts_list_paths() {
        let model = recursive_model();
        let walker = Walker::new(&model).skip_collections();
        assert!(!walker.can_reach(&id("ex#NodeList"), &id("ex#Node")));
        assert!(walker.can_reach(&id("ex#Node$next"), &id("ex#Node")));
    }

    #[test]
    fn test_walk_unknown_start_is_empty() {
        let model = recursive_model();
        assert!(Walker::new(&model).walk(&id("ex#Nope")).is_empty());
    }
}
