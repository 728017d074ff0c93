//! Shape graph model for the kiln SDK generator.
//!
//! The model is the input of every generation run: an immutable graph of
//! [`Shape`]s keyed by [`ShapeId`], where composite shapes reference their
//! members and targets by id (so the graph may be shared and cyclic).
//!
//! # Architecture
//!
//! ```text
//! model.json → Model::from_json_str → normalize_operations → codegen
//! ```

mod error;
mod json;
mod model;
mod normalize;
mod shape;
mod shape_id;
mod traits;
mod walker;

pub use error::ModelError;
pub use model::{Model, ModelBuilder, PRELUDE_NAMESPACE};
pub use normalize::{SYNTHETIC_NAMESPACE_SUFFIX, normalize_operations, synthetic_id};
pub use shape::{NumberType, Shape, ShapeBody, ShapeType};
pub use shape_id::ShapeId;
pub use traits::{EnumValue, ErrorFault, HttpTrait, ProtocolId, Trait, TraitKind, Traits};
pub use walker::Walker;
