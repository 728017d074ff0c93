//! Shapes: the nodes of the interface graph.

use std::fmt;

use crate::{ShapeId, Trait, Traits};

/// Numeric shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberType {
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
}

/// The kind of a shape, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Structure,
    Union,
    Member,
    Operation,
    Service,
    String,
    Number(NumberType),
    Boolean,
    Blob,
    Timestamp,
    List,
    Map,
}

impl ShapeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Structure => "structure",
            ShapeType::Union => "union",
            ShapeType::Member => "member",
            ShapeType::Operation => "operation",
            ShapeType::Service => "service",
            ShapeType::String => "string",
            ShapeType::Number(NumberType::Byte) => "byte",
            ShapeType::Number(NumberType::Short) => "short",
            ShapeType::Number(NumberType::Integer) => "integer",
            ShapeType::Number(NumberType::Long) => "long",
            ShapeType::Number(NumberType::Float) => "float",
            ShapeType::Number(NumberType::Double) => "double",
            ShapeType::Number(NumberType::BigInteger) => "bigInteger",
            ShapeType::Number(NumberType::BigDecimal) => "bigDecimal",
            ShapeType::Boolean => "boolean",
            ShapeType::Blob => "blob",
            ShapeType::Timestamp => "timestamp",
            ShapeType::List => "list",
            ShapeType::Map => "map",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a shape. References to other shapes are ids,
/// never owned shapes, so the graph may share and cycle freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeBody {
    /// Member ids in declaration order.
    Structure { members: Vec<ShapeId> },
    Union { members: Vec<ShapeId> },
    Member { container: ShapeId, target: ShapeId },
    Operation {
        input: Option<ShapeId>,
        output: Option<ShapeId>,
        errors: Vec<ShapeId>,
    },
    Service {
        version: String,
        operations: Vec<ShapeId>,
    },
    String,
    Number(NumberType),
    Boolean,
    Blob,
    Timestamp,
    /// `member` is the id of the list's member shape.
    List { member: ShapeId },
    Map { key: ShapeId, value: ShapeId },
}

/// A node in the shape graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub id: ShapeId,
    pub traits: Traits,
    pub body: ShapeBody,
}

impl Shape {
    pub fn new(id: ShapeId, body: ShapeBody) -> Self {
        Self {
            id,
            traits: Traits::new(),
            body,
        }
    }

    /// Builder-style trait attachment.
    pub fn with_trait(mut self, t: Trait) -> Self {
        self.traits.insert(t);
        self
    }

    pub fn structure(id: ShapeId, members: Vec<ShapeId>) -> Self {
        Self::new(id, ShapeBody::Structure { members })
    }

    pub fn member(id: ShapeId, target: ShapeId) -> Self {
        let container = id.root();
        Self::new(id, ShapeBody::Member { container, target })
    }

    pub fn operation(id: ShapeId, input: Option<ShapeId>, output: Option<ShapeId>) -> Self {
        Self::new(
            id,
            ShapeBody::Operation {
                input,
                output,
                errors: Vec::new(),
            },
        )
    }

    pub fn service(id: ShapeId, version: impl Into<String>, operations: Vec<ShapeId>) -> Self {
        Self::new(
            id,
            ShapeBody::Service {
                version: version.into(),
                operations,
            },
        )
    }

    pub fn shape_type(&self) -> ShapeType {
        match &self.body {
            ShapeBody::Structure { .. } => ShapeType::Structure,
            ShapeBody::Union { .. } => ShapeType::Union,
            ShapeBody::Member { .. } => ShapeType::Member,
            ShapeBody::Operation { .. } => ShapeType::Operation,
            ShapeBody::Service { .. } => ShapeType::Service,
            ShapeBody::String => ShapeType::String,
            ShapeBody::Number(n) => ShapeType::Number(*n),
            ShapeBody::Boolean => ShapeType::Boolean,
            ShapeBody::Blob => ShapeType::Blob,
            ShapeBody::Timestamp => ShapeType::Timestamp,
            ShapeBody::List { .. } => ShapeType::List,
            ShapeBody::Map { .. } => ShapeType::Map,
        }
    }

    /// Member ids of a structure or union; empty for every other kind.
    pub fn members(&self) -> &[ShapeId] {
        match &self.body {
            ShapeBody::Structure { members } | ShapeBody::Union { members } => members,
            _ => &[],
        }
    }

    /// `(container, target)` if this is a member shape.
    pub fn as_member(&self) -> Option<(&ShapeId, &ShapeId)> {
        match &self.body {
            ShapeBody::Member { container, target } => Some((container, target)),
            _ => None,
        }
    }

    /// Name of the member (`cityId` for `ns#GetCityInput$cityId`).
    pub fn member_name(&self) -> Option<&str> {
        self.id.member()
    }

    /// Every shape id this shape points at, in declaration order.
    ///
    /// A member's container is not included: walking follows targets, not
    /// back-edges.
    pub fn references(&self) -> Vec<&ShapeId> {
        match &self.body {
            ShapeBody::Structure { members } | ShapeBody::Union { members } => {
                members.iter().collect()
            }
            ShapeBody::Member { target, .. } => vec![target],
            ShapeBody::Operation {
                input,
                output,
                errors,
            } => input
                .iter()
                .chain(output.iter())
                .chain(errors.iter())
                .collect(),
            ShapeBody::Service { operations, .. } => operations.iter().collect(),
            ShapeBody::List { member } => vec![member],
            ShapeBody::Map { key, value } => vec![key, value],
            ShapeBody::String
            | ShapeBody::Number(_)
            | ShapeBody::Boolean
            | ShapeBody::Blob
            | ShapeBody::Timestamp => Vec::new(),
        }
    }

    pub fn is_structure(&self) -> bool {
        matches!(self.body, ShapeBody::Structure { .. })
    }

    pub fn is_union(&self) -> bool {
        matches!(self.body, ShapeBody::Union { .. })
    }

    pub fn is_member(&self) -> bool {
        matches!(self.body, ShapeBody::Member { .. })
    }

    pub fn is_operation(&self) -> bool {
        matches!(self.body, ShapeBody::Operation { .. })
    }

    pub fn is_blob(&self) -> bool {
        matches!(self.body, ShapeBody::Blob)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.body, ShapeBody::List { .. } | ShapeBody::Map { .. })
    }
}
