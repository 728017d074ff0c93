//! A service builder assembled at runtime.

use bytes::Bytes;
use http::{Request, Response};
use thiserror::Error;

use crate::{
    MissingOperationsError,
    operation::{FailOnMissingOperation, IdentityPlugin, Operation, Plugin},
    protocol::Protocol,
    routing::{RequestSpec, Route, Router},
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceBuilderError {
    #[error("operation `{operation}` is declared twice on `{service}`")]
    DuplicateOperation {
        service: String,
        operation: &'static str,
    },

    #[error("`{service}` has no operation `{operation}`")]
    UnknownOperation { service: String, operation: String },
}

struct Slot<B> {
    operation: &'static str,
    setter: &'static str,
    spec: RequestSpec,
    route: Option<Route<B>>,
}

/// Collects one handler per declared operation, then builds a [`Router`].
///
/// Generated builders have one typed field per operation; this builder
/// keeps the same contract for operation sets only known at runtime.
pub struct ServiceBuilder<B = Bytes, P = IdentityPlugin> {
    service_name: String,
    plugin: P,
    slots: Vec<Slot<B>>,
}

impl<B> ServiceBuilder<B, IdentityPlugin> {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            plugin: IdentityPlugin,
            slots: Vec::new(),
        }
    }
}

impl<B: 'static, P: Plugin<B>> ServiceBuilder<B, P> {
    /// Replace the plugin applied to operations registered from now on.
    pub fn with_plugin<Q: Plugin<B>>(self, plugin: Q) -> ServiceBuilder<B, Q> {
        ServiceBuilder {
            service_name: self.service_name,
            plugin,
            slots: self.slots,
        }
    }

    /// Declare an operation, its builder method name and its request spec.
    pub fn declare(
        mut self,
        operation: &'static str,
        setter: &'static str,
        spec: RequestSpec,
    ) -> Result<Self, ServiceBuilderError> {
        if self.slots.iter().any(|slot| slot.operation == operation) {
            return Err(ServiceBuilderError::DuplicateOperation {
                service: self.service_name,
                operation,
            });
        }
        self.slots.push(Slot {
            operation,
            setter,
            spec,
            route: None,
        });
        Ok(self)
    }

    pub fn set_handler<F>(self, operation: &str, handler: F) -> Result<Self, ServiceBuilderError>
    where
        F: Fn(Request<B>) -> Response<Bytes> + Send + Sync + 'static,
    {
        self.set_operation(operation, Operation::from_handler(handler))
    }

    pub fn set_operation(
        mut self,
        operation: &str,
        value: Operation<B>,
    ) -> Result<Self, ServiceBuilderError> {
        let plugin = &self.plugin;
        match self.slots.iter_mut().find(|slot| slot.operation == operation) {
            Some(slot) => {
                slot.route = Some(value.upgrade(slot.operation, plugin));
                Ok(self)
            }
            None => Err(ServiceBuilderError::UnknownOperation {
                service: self.service_name,
                operation: operation.to_string(),
            }),
        }
    }

    pub fn is_set(&self, operation: &str) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.operation == operation && slot.route.is_some())
    }

    /// Operations without a handler, in declaration order.
    pub fn unset_operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots
            .iter()
            .filter(|slot| slot.route.is_none())
            .map(|slot| slot.operation)
    }

    /// Build the router, failing if any declared operation is unset.
    ///
    /// Missing operations are reported sorted by operation id.
    pub fn build<Pr: Protocol>(self) -> Result<Router<Route<B>, Pr>, MissingOperationsError> {
        let mut unset: Vec<_> = self.slots.iter().filter(|slot| slot.route.is_none()).collect();
        unset.sort_by_key(|slot| slot.operation);
        let mut missing = MissingOperationsError::new(self.service_name.as_str());
        for slot in unset {
            missing.push(slot.operation, format!(".{}()", slot.setter));
        }
        if !missing.is_empty() {
            return Err(missing);
        }

        tracing::debug!(
            service = %self.service_name,
            protocol = Pr::NAME,
            operations = self.slots.len(),
            "built service"
        );
        Ok(self
            .slots
            .into_iter()
            .filter_map(|slot| slot.route.map(|route| (slot.spec, route)))
            .collect())
    }

    /// Build the router, answering unset operations with a 500.
    pub fn build_unchecked<Pr: Protocol>(self) -> Router<Route<B>, Pr> {
        let plugin = self.plugin;
        self.slots
            .into_iter()
            .map(|slot| {
                let route = match slot.route {
                    Some(route) => route,
                    None => {
                        tracing::warn!(operation = slot.operation, "operation has no handler");
                        FailOnMissingOperation.upgrade(slot.operation, &plugin)
                    }
                };
                (slot.spec, route)
            })
            .collect()
    }
}

impl<B, P> std::fmt::Debug for ServiceBuilder<B, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBuilder")
            .field("service_name", &self.service_name)
            .field(
                "operations",
                &self.slots.iter().map(|s| s.operation).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;
    use crate::routing::PathSegment;

    fn builder() -> ServiceBuilder<()> {
        ServiceBuilder::new("Weather")
            .declare(
                "example.weather#GetCity",
                "get_city",
                RequestSpec::rest(
                    Method::GET,
                    vec![PathSegment::literal("cities"), PathSegment::Label],
                    vec![],
                ),
            )
            .unwrap()
    }

    #[test]
    fn test_duplicate_declaration() {
        let err = builder()
            .declare("example.weather#GetCity", "get_city", RequestSpec::rpc("x"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "operation `example.weather#GetCity` is declared twice on `Weather`"
        );
    }

    #[test]
    fn test_unknown_operation() {
        let err = builder()
            .set_handler("example.weather#Nope", |_| Response::new(Bytes::new()))
            .unwrap_err();
        assert!(matches!(err, ServiceBuilderError::UnknownOperation { .. }));
    }

    #[test]
    fn test_is_set() {
        let builder = builder();
        assert!(!builder.is_set("example.weather#GetCity"));
        let builder = builder
            .set_handler("example.weather#GetCity", |_| Response::new(Bytes::new()))
            .unwrap();
        assert!(builder.is_set("example.weather#GetCity"));
        assert_eq!(builder.unset_operations().count(), 0);
    }

    #[test]
    fn test_missing_operations_sorted_by_id() {
        let err = ServiceBuilder::<()>::new("Weather")
            .declare("example.weather#ListCities", "list_cities", RequestSpec::rpc("b"))
            .and_then(|b| b.declare("example.weather#GetForecast", "get_forecast", RequestSpec::rpc("c")))
            .and_then(|b| b.declare("example.weather#GetCity", "get_city", RequestSpec::rpc("a")))
            .unwrap()
            .build::<crate::protocol::AwsJson1_0>()
            .unwrap_err();

        assert_eq!(
            err.operation_names().collect::<Vec<_>>(),
            [
                "example.weather#GetCity",
                "example.weather#GetForecast",
                "example.weather#ListCities",
            ]
        );
        assert_eq!(
            err.setter_names().collect::<Vec<_>>(),
            [".get_city()", ".get_forecast()", ".list_cities()"]
        );
    }
}
