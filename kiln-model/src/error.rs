use thiserror::Error;

use crate::{ShapeId, ShapeType};

/// Errors raised while building, loading or querying a [`Model`](crate::Model).
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid shape id `{id}`: {reason}")]
    InvalidShapeId { id: String, reason: String },

    #[error("shape `{id}` not found in model")]
    MissingShape { id: ShapeId },

    #[error("shape `{shape}` references `{target}`, which is not in the model")]
    UnresolvedReference { shape: ShapeId, target: ShapeId },

    #[error("shape `{id}` is a {actual}, expected a {expected}")]
    WrongKind {
        id: ShapeId,
        expected: ShapeType,
        actual: ShapeType,
    },

    #[error("malformed trait `{trait_id}` on `{shape}`: {reason}")]
    MalformedTrait {
        shape: ShapeId,
        trait_id: String,
        reason: String,
    },

    #[error("shape `{id}` has unsupported type `{kind}`")]
    UnsupportedShapeType { id: ShapeId, kind: String },

    #[error("failed to parse model JSON: {0}")]
    Json(#[from] serde_json::Error),
}
