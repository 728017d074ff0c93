//! Errors raised while resolving symbols and composing generated code.

use kiln_model::{ModelError, ShapeId};
use thiserror::Error;

use crate::customize::SectionName;

/// Error taxonomy of the code generation engine.
///
/// Pipeline phases return `eyre::Result`; these errors travel inside the
/// report and can be recovered with `downcast_ref::<CodegenError>()`.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("shape `{shape}` is missing required trait `{trait_id}`")]
    MissingTrait {
        shape: ShapeId,
        trait_id: &'static str,
    },

    #[error("decorator `{decorator}` failed to render section `{section}`")]
    Composition {
        decorator: String,
        section: SectionName,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("`{first}` and `{second}` both generate `{name}`")]
    SymbolCollision {
        name: String,
        first: ShapeId,
        second: ShapeId,
    },

    #[error(
        "decorator `{name}` is registered twice (positions {first} and {second})"
    )]
    DuplicateDecorator {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("section `{section}` is already registered")]
    DuplicateSection { section: SectionName },

    #[error("section `{section}` is not registered")]
    UnknownSection { section: SectionName },

    #[error("service `{service}` uses protocol `{protocol}`, which has no generator")]
    UnsupportedProtocol { service: ShapeId, protocol: String },

    #[error("operation `{operation}` is not bound to any service")]
    UnboundOperation { operation: ShapeId },
}
