//! Request routing.
//!
//! - [`RequestSpec`] - how requests for one operation are recognized
//! - [`Route`] - a cloneable, type-erased handler
//! - [`Router`] - dispatches requests to the first matching route
//! - [`Service`] / [`Layer`] - the composition traits routes and services share

mod request_spec;
mod route;
mod router;

pub use request_spec::{Match, PathSegment, QuerySegment, RequestSpec, TARGET_HEADER};
pub use route::{Layer, LayerFn, Route, Service, ServiceFn, layer_fn, service_fn};
pub use router::{Router, RoutingError};
