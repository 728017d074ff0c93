//! The operation router.

use std::{fmt, marker::PhantomData};

use bytes::Bytes;
use http::{Method, Request, Response};
use thiserror::Error;

use super::{Match, RequestSpec, Route, Service};
use crate::protocol::Protocol;

/// Why a request could not be routed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("no operation matches {method} {path}")]
    NotFound { method: Method, path: String },

    #[error("{method} is not allowed for {path}")]
    MethodNotAllowed { method: Method, path: String },
}

/// Dispatches requests to the first route whose spec matches.
///
/// Routes are tried most specific first; specs of equal rank keep their
/// insertion order.
pub struct Router<S = Route, P = ()> {
    routes: Vec<(RequestSpec, S)>,
    _protocol: PhantomData<P>,
}

impl<S, P> Router<S, P> {
    pub fn new(routes: Vec<(RequestSpec, S)>) -> Self {
        let mut routes = routes;
        routes.sort_by_key(|(spec, _)| std::cmp::Reverse(spec.rank()));
        Self {
            routes,
            _protocol: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Apply `f` to every route, keeping the specs.
    pub fn map<T, F>(self, f: F) -> Router<T, P>
    where
        F: Fn(S) -> T,
    {
        Router {
            routes: self
                .routes
                .into_iter()
                .map(|(spec, service)| (spec, f(service)))
                .collect(),
            _protocol: PhantomData,
        }
    }

    pub fn match_route<B>(&self, request: &Request<B>) -> Result<&S, RoutingError> {
        let mut method_not_allowed = false;
        for (spec, service) in &self.routes {
            match spec.matches(request) {
                Match::Yes => return Ok(service),
                Match::MethodNotAllowed => method_not_allowed = true,
                Match::No => {}
            }
        }

        let method = request.method().clone();
        let path = request.uri().path().to_string();
        if method_not_allowed {
            Err(RoutingError::MethodNotAllowed { method, path })
        } else {
            Err(RoutingError::NotFound { method, path })
        }
    }
}

impl<S, P> FromIterator<(RequestSpec, S)> for Router<S, P> {
    fn from_iter<T: IntoIterator<Item = (RequestSpec, S)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<S, P, B> Service<B> for Router<S, P>
where
    S: Service<B>,
    P: Protocol,
{
    fn call(&self, request: Request<B>) -> Response<Bytes> {
        match self.match_route(&request) {
            Ok(service) => {
                tracing::debug!(
                    protocol = P::NAME,
                    method = %request.method(),
                    path = request.uri().path(),
                    "routing request"
                );
                service.call(request)
            }
            Err(error) => {
                tracing::debug!(protocol = P::NAME, %error, "no route");
                P::routing_error(&error)
            }
        }
    }
}

impl<S: Clone, P> Clone for Router<S, P> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
            _protocol: PhantomData,
        }
    }
}

impl<S, P> fmt::Debug for Router<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field(
                "specs",
                &self.routes.iter().map(|(spec, _)| spec).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;
    use crate::{
        protocol::RestJson1,
        routing::{PathSegment, service_fn},
    };

    fn respond(text: &'static str) -> Route<()> {
        Route::new(move |_| Response::new(Bytes::from_static(text.as_bytes())))
    }

    fn router() -> Router<Route<()>, RestJson1> {
        [
            (
                RequestSpec::rest(Method::GET, vec![PathSegment::literal("cities")], vec![]),
                respond("list"),
            ),
            (
                RequestSpec::rest(
                    Method::GET,
                    vec![PathSegment::literal("cities"), PathSegment::Label],
                    vec![],
                ),
                respond("get"),
            ),
            (
                RequestSpec::rest(
                    Method::GET,
                    vec![
                        PathSegment::literal("cities"),
                        PathSegment::Label,
                        PathSegment::literal("image"),
                    ],
                    vec![],
                ),
                respond("image"),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn get(uri: &str) -> Request<()> {
        Request::builder().method(Method::GET).uri(uri).body(()).unwrap()
    }

    #[test]
    fn test_dispatch() {
        let router = router();
        assert_eq!(router.call(get("/cities")).body(), "list");
        assert_eq!(router.call(get("/cities/paris")).body(), "get");
        assert_eq!(router.call(get("/cities/paris/image")).body(), "image");
    }

    #[test]
    fn test_unmatched_and_wrong_method() {
        let router = router();
        assert_eq!(router.call(get("/towns")).status(), StatusCode::NOT_FOUND);

        let post = Request::builder()
            .method(Method::POST)
            .uri("/cities")
            .body(())
            .unwrap();
        assert_eq!(
            router.match_route(&post).unwrap_err(),
            RoutingError::MethodNotAllowed {
                method: Method::POST,
                path: "/cities".to_string()
            }
        );
        assert_eq!(router.call(post).status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_map_wraps_every_route() {
        let router = router().map(|route| {
            Route::from_service(service_fn(move |request| {
                let mut response = route.call(request);
                *response.status_mut() = StatusCode::ACCEPTED;
                response
            }))
        });
        assert_eq!(router.len(), 3);
        assert_eq!(router.call(get("/cities")).status(), StatusCode::ACCEPTED);
    }
}
