//! Wire protocol generators and request matching specs.

use std::{collections::BTreeMap, sync::Arc};

use kiln_model::{HttpTrait, Model, ProtocolId, Shape};

use crate::{CodegenContext, CodegenError, builder::CodeFragment};

/// Protocol generators available to a service, keyed by protocol.
pub type ProtocolMap = BTreeMap<ProtocolId, Arc<dyn Protocol>>;

/// Generator-side knowledge of one wire protocol.
pub trait Protocol: Send + Sync {
    fn id(&self) -> ProtocolId;

    /// Path of the runtime marker type for this protocol.
    fn marker_struct(&self, ctx: &CodegenContext) -> String;

    /// Path of the runtime router the service dispatches with.
    fn router_type(&self, ctx: &CodegenContext) -> String;

    /// How requests for `operation` are recognized.
    ///
    /// A pure function of the operation and the protocol.
    fn request_spec(&self, model: &Model, operation: &Shape) -> Result<RequestSpec, CodegenError>;

    /// The client-side function that parses the generic error fields
    /// (code, message, request id) out of an error response.
    fn parse_http_generic_error(&self, ctx: &CodegenContext, operation: &Shape) -> CodeFragment;
}

/// Pick the generator for the single protocol declared on `service`.
pub fn resolve_protocol(
    service: &Shape,
    protocols: &ProtocolMap,
) -> Result<Arc<dyn Protocol>, CodegenError> {
    let declared = service.traits.protocols();
    let id = match declared.as_slice() {
        [id] => *id,
        [] => {
            return Err(CodegenError::UnsupportedProtocol {
                service: service.id.clone(),
                protocol: "<none>".to_string(),
            });
        }
        many => {
            let names: Vec<_> = many.iter().map(ProtocolId::as_str).collect();
            return Err(CodegenError::UnsupportedProtocol {
                service: service.id.clone(),
                protocol: names.join(", "),
            });
        }
    };
    protocols
        .get(&id)
        .cloned()
        .ok_or_else(|| CodegenError::UnsupportedProtocol {
            service: service.id.clone(),
            protocol: id.to_string(),
        })
}

/// One segment of a request path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Literal(String),
    /// `{name}`: matches exactly one segment.
    Label(String),
    /// `{name+}`: matches one or more segments.
    Greedy(String),
}

/// A constant query string requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryLiteral {
    /// `?key`: the key must be present.
    Key(String),
    /// `?key=value`: the key must be present with this value.
    KeyValue(String, String),
}

/// How a server recognizes requests for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSpec {
    /// Method, path pattern and query literals (REST protocols).
    Rest {
        method: String,
        path: Vec<PathSegment>,
        query: Vec<QueryLiteral>,
    },
    /// A target header naming `Service.Operation` (RPC protocols).
    RpcTarget { target: String },
}

impl RequestSpec {
    /// Parse an `http` binding such as `GET /cities/{cityId}?view=summary`.
    pub fn from_http(http: &HttpTrait) -> Self {
        let (path, query) = match http.uri.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (http.uri.as_str(), None),
        };

        let path = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(label) => match label.strip_suffix('+') {
                    Some(greedy) => PathSegment::Greedy(greedy.to_string()),
                    None => PathSegment::Label(label.to_string()),
                },
                None => PathSegment::Literal(segment.to_string()),
            })
            .collect();

        let query = query
            .into_iter()
            .flat_map(|q| q.split('&'))
            .filter(|s| !s.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => QueryLiteral::KeyValue(key.to_string(), value.to_string()),
                None => QueryLiteral::Key(pair.to_string()),
            })
            .collect();

        RequestSpec::Rest {
            method: http.method.to_ascii_uppercase(),
            path,
            query,
        }
    }

    pub fn rpc(target: impl Into<String>) -> Self {
        RequestSpec::RpcTarget {
            target: target.into(),
        }
    }

    /// The runtime constructor call building this spec.
    pub fn render(&self, server_crate: &str) -> CodeFragment {
        let routing = format!("{}::routing", server_crate);
        match self {
            RequestSpec::RpcTarget { target } => {
                CodeFragment::line(format!("{}::RequestSpec::rpc({:?})", routing, target))
            }
            RequestSpec::Rest {
                method,
                path,
                query,
            } => {
                let path = path
                    .iter()
                    .map(|segment| match segment {
                        PathSegment::Literal(s) => {
                            CodeFragment::line(format!("{}::PathSegment::literal({:?}),", routing, s))
                        }
                        PathSegment::Label(_) => {
                            CodeFragment::line(format!("{}::PathSegment::Label,", routing))
                        }
                        PathSegment::Greedy(_) => {
                            CodeFragment::line(format!("{}::PathSegment::Greedy,", routing))
                        }
                    })
                    .collect();
                let query = query
                    .iter()
                    .map(|literal| match literal {
                        QueryLiteral::Key(k) => {
                            CodeFragment::line(format!("{}::QuerySegment::key({:?}),", routing, k))
                        }
                        QueryLiteral::KeyValue(k, v) => CodeFragment::line(format!(
                            "{}::QuerySegment::key_value({:?}, {:?}),",
                            routing, k, v
                        )),
                    })
                    .collect();

                CodeFragment::block(
                    format!("{}::RequestSpec::rest(", routing),
                    vec![
                        CodeFragment::line(format!(
                            "{},",
                            method_expr(server_crate, method)
                        )),
                        vec_literal(path),
                        vec_literal(query),
                    ],
                    Some(")".to_string()),
                )
            }
        }
    }
}

fn vec_literal(items: Vec<CodeFragment>) -> CodeFragment {
    if items.is_empty() {
        CodeFragment::line("vec![],")
    } else {
        CodeFragment::block("vec![", items, Some("],".to_string()))
    }
}

fn method_expr(server_crate: &str, method: &str) -> String {
    const STANDARD: [&str; 9] = [
        "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "CONNECT", "TRACE",
    ];
    if STANDARD.contains(&method) {
        format!("{}::http::Method::{}", server_crate, method)
    } else {
        format!(
            "{}::http::Method::from_bytes(b{:?}).expect(\"valid HTTP method\")",
            server_crate, method
        )
    }
}
