//! Operations and the plugins applied to them.

use bytes::Bytes;
use http::{HeaderValue, Request, Response, StatusCode};

use crate::routing::Route;

/// Header set on responses from operations that were never registered.
pub const MISSING_HANDLER_HEADER: &str = "x-kiln-missing-handler";

/// Wraps every operation route as it is registered on a builder.
///
/// `operation` is the absolute shape id (`example.weather#GetCity`).
pub trait Plugin<B> {
    fn apply(&self, operation: &'static str, route: Route<B>) -> Route<B>;
}

/// The plugin that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPlugin;

impl<B> Plugin<B> for IdentityPlugin {
    fn apply(&self, _operation: &'static str, route: Route<B>) -> Route<B> {
        route
    }
}

/// Apply two plugins, `first` innermost.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluginPair<A, B> {
    first: A,
    second: B,
}

impl<A, C> PluginPair<A, C> {
    pub fn new(first: A, second: C) -> Self {
        Self { first, second }
    }
}

impl<Body, A, C> Plugin<Body> for PluginPair<A, C>
where
    A: Plugin<Body>,
    C: Plugin<Body>,
{
    fn apply(&self, operation: &'static str, route: Route<Body>) -> Route<Body> {
        self.second
            .apply(operation, self.first.apply(operation, route))
    }
}

/// A handler not yet upgraded by the builder's plugin.
#[derive(Debug)]
pub struct Operation<B = Bytes> {
    route: Route<B>,
}

impl<B> Operation<B> {
    pub fn from_handler<F>(handler: F) -> Self
    where
        F: Fn(Request<B>) -> Response<Bytes> + Send + Sync + 'static,
    {
        Self {
            route: Route::new(handler),
        }
    }

    /// Apply `plugin`, yielding the route stored on the builder.
    pub fn upgrade<P: Plugin<B>>(self, operation: &'static str, plugin: &P) -> Route<B> {
        tracing::trace!(operation, "upgrading operation");
        plugin.apply(operation, self.route)
    }
}

/// Stands in for operations left unset by `build_unchecked`.
///
/// Every request gets a 500 naming the missing operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailOnMissingOperation;

impl FailOnMissingOperation {
    pub fn route<B: 'static>(operation: &'static str) -> Route<B> {
        Route::new(move |_request: Request<B>| {
            tracing::error!(operation, "request for an operation without a handler");
            let mut response = Response::new(Bytes::from(format!(
                "no handler registered for operation `{}`",
                operation
            )));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            if let Ok(value) = HeaderValue::from_str(operation) {
                response.headers_mut().insert(MISSING_HANDLER_HEADER, value);
            }
            response
        })
    }

    pub fn upgrade<B, P>(self, operation: &'static str, plugin: &P) -> Route<B>
    where
        B: 'static,
        P: Plugin<B>,
    {
        plugin.apply(operation, Self::route(operation))
    }
}
