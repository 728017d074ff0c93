//! Runtime library for servers generated by kiln.
//!
//! Generated service builders hold one [`Route`](routing::Route) per
//! operation and combine them with the operations'
//! [`RequestSpec`](routing::RequestSpec)s into a [`Router`](routing::Router)
//! when the service is built.
//!
//! # Architecture
//!
//! ```text
//! handler → Operation → Plugin → Route ─┐
//!                     RequestSpec ──────┴→ Router<Route, Protocol> → Response
//! ```
//!
//! [`ServiceBuilder`] is the dynamic equivalent of a generated builder, for
//! services assembled at runtime.

mod builder;
mod error;
pub mod operation;
pub mod protocol;
pub mod routing;
pub mod types;

pub use builder::{ServiceBuilder, ServiceBuilderError};
pub use bytes;
pub use error::MissingOperationsError;
pub use http;
pub use regex;
