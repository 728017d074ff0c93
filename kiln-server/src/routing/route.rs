//! Type-erased handlers and the traits they compose with.

use std::{fmt, sync::Arc};

use bytes::Bytes;
use http::{Request, Response};

/// Something that turns a request into a response.
pub trait Service<B> {
    fn call(&self, request: Request<B>) -> Response<Bytes>;
}

/// Wraps a service in another service.
pub trait Layer<S> {
    type Service;

    fn layer(&self, inner: S) -> Self::Service;
}

/// A [`Service`] backed by a closure.
#[derive(Clone, Copy)]
pub struct ServiceFn<F> {
    f: F,
}

pub fn service_fn<F>(f: F) -> ServiceFn<F> {
    ServiceFn { f }
}

impl<F, B> Service<B> for ServiceFn<F>
where
    F: Fn(Request<B>) -> Response<Bytes>,
{
    fn call(&self, request: Request<B>) -> Response<Bytes> {
        (self.f)(request)
    }
}

impl<F> fmt::Debug for ServiceFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceFn").finish_non_exhaustive()
    }
}

/// A [`Layer`] backed by a closure.
#[derive(Clone, Copy)]
pub struct LayerFn<F> {
    f: F,
}

pub fn layer_fn<F>(f: F) -> LayerFn<F> {
    LayerFn { f }
}

impl<F, S, Out> Layer<S> for LayerFn<F>
where
    F: Fn(S) -> Out,
{
    type Service = Out;

    fn layer(&self, inner: S) -> Self::Service {
        (self.f)(inner)
    }
}

type BoxedHandler<B> = Arc<dyn Fn(Request<B>) -> Response<Bytes> + Send + Sync>;

/// A cloneable, type-erased operation handler.
pub struct Route<B = Bytes> {
    handler: BoxedHandler<B>,
}

impl<B> Route<B> {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(Request<B>) -> Response<Bytes> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Erase any thread-safe service into a route.
    pub fn from_service<S>(service: S) -> Self
    where
        S: Service<B> + Send + Sync + 'static,
        B: 'static,
    {
        Self::new(move |request| service.call(request))
    }

    pub fn call(&self, request: Request<B>) -> Response<Bytes> {
        (self.handler)(request)
    }
}

impl<B> Clone for Route<B> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<B> Service<B> for Route<B> {
    fn call(&self, request: Request<B>) -> Response<Bytes> {
        Route::call(self, request)
    }
}

impl<B> fmt::Debug for Route<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").finish_non_exhaustive()
    }
}
