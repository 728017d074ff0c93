//! Request matching specs.

use http::{Method, Request};

/// Header carrying `Service.Operation` for RPC protocols.
pub const TARGET_HEADER: &str = "x-amz-target";

/// One segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Literal(String),
    /// Matches exactly one non-empty segment.
    Label,
    /// Matches one or more segments.
    Greedy,
}

impl PathSegment {
    pub fn literal(value: &str) -> Self {
        PathSegment::Literal(value.to_string())
    }
}

/// A constant query string requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySegment {
    Key(String),
    KeyValue(String, String),
}

impl QuerySegment {
    pub fn key(key: &str) -> Self {
        QuerySegment::Key(key.to_string())
    }

    pub fn key_value(key: &str, value: &str) -> Self {
        QuerySegment::KeyValue(key.to_string(), value.to_string())
    }
}

/// Outcome of matching a request against a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    No,
    /// The path and query match but the method does not.
    MethodNotAllowed,
    Yes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Rest {
        method: Method,
        path: Vec<PathSegment>,
        query: Vec<QuerySegment>,
    },
    Rpc {
        target: String,
    },
}

/// How a server recognizes requests for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    kind: Kind,
}

impl RequestSpec {
    /// A REST binding: method, path pattern and constant query literals.
    pub fn rest(method: Method, path: Vec<PathSegment>, query: Vec<QuerySegment>) -> Self {
        Self {
            kind: Kind::Rest {
                method,
                path,
                query,
            },
        }
    }

    /// An RPC binding: `POST /` with [`TARGET_HEADER`] set to `target`.
    pub fn rpc(target: &str) -> Self {
        Self {
            kind: Kind::Rpc {
                target: target.to_string(),
            },
        }
    }

    /// Specificity used to order specs; more specific specs are tried first.
    pub fn rank(&self) -> usize {
        match &self.kind {
            Kind::Rest { path, query, .. } => path.len() + query.len(),
            Kind::Rpc { .. } => 0,
        }
    }

    pub fn matches<B>(&self, request: &Request<B>) -> Match {
        match &self.kind {
            Kind::Rpc { target } => {
                let header = request
                    .headers()
                    .get(TARGET_HEADER)
                    .and_then(|value| value.to_str().ok());
                match header {
                    Some(value) if value == target && request.uri().path() == "/" => {
                        if request.method() == Method::POST {
                            Match::Yes
                        } else {
                            Match::MethodNotAllowed
                        }
                    }
                    _ => Match::No,
                }
            }
            Kind::Rest {
                method,
                path,
                query,
            } => {
                let segments: Vec<&str> = request
                    .uri()
                    .path()
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .collect();
                if !match_path(path, &segments) {
                    return Match::No;
                }

                let pairs = query_pairs(request.uri().query().unwrap_or_default());
                if !query.iter().all(|required| match_query(required, &pairs)) {
                    return Match::No;
                }

                if request.method() == method {
                    Match::Yes
                } else {
                    Match::MethodNotAllowed
                }
            }
        }
    }
}

fn match_path(pattern: &[PathSegment], segments: &[&str]) -> bool {
    match pattern.split_first() {
        None => segments.is_empty(),
        Some((PathSegment::Literal(literal), rest)) => match segments.split_first() {
            Some((segment, remaining)) if segment == literal => match_path(rest, remaining),
            _ => false,
        },
        Some((PathSegment::Label, rest)) => match segments.split_first() {
            Some((_, remaining)) => match_path(rest, remaining),
            None => false,
        },
        // Take as few segments as possible, but at least one.
        Some((PathSegment::Greedy, rest)) => {
            (1..=segments.len()).any(|taken| match_path(rest, &segments[taken..]))
        }
    }
}

fn query_pairs(query: &str) -> Vec<(&str, &str)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect()
}

fn match_query(required: &QuerySegment, pairs: &[(&str, &str)]) -> bool {
    match required {
        QuerySegment::Key(key) => pairs.iter().any(|(k, _)| k == key),
        QuerySegment::KeyValue(key, value) => pairs.iter().any(|(k, v)| k == key && v == value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    fn city() -> RequestSpec {
        RequestSpec::rest(
            Method::GET,
            vec![PathSegment::literal("cities"), PathSegment::Label],
            vec![],
        )
    }

    #[test]
    fn test_label_matches_one_segment() {
        assert_eq!(city().matches(&request(Method::GET, "/cities/paris")), Match::Yes);
        assert_eq!(city().matches(&request(Method::GET, "/cities")), Match::No);
        assert_eq!(city().matches(&request(Method::GET, "/cities/paris/image")), Match::No);
    }

    #[test]
    fn test_method_mismatch() {
        assert_eq!(
            city().matches(&request(Method::DELETE, "/cities/paris")),
            Match::MethodNotAllowed
        );
    }

    #[test]
    fn test_greedy_label() {
        let spec = RequestSpec::rest(
            Method::GET,
            vec![PathSegment::Label, PathSegment::Greedy, PathSegment::literal("acl")],
            vec![],
        );
        assert_eq!(spec.matches(&request(Method::GET, "/bucket/a/b/c/acl")), Match::Yes);
        assert_eq!(spec.matches(&request(Method::GET, "/bucket/acl")), Match::No);
    }

    #[test]
    fn test_query_literals() {
        let spec = RequestSpec::rest(
            Method::GET,
            vec![PathSegment::literal("cities")],
            vec![QuerySegment::key_value("view", "summary"), QuerySegment::key("full")],
        );
        assert_eq!(
            spec.matches(&request(Method::GET, "/cities?full&view=summary&page=2")),
            Match::Yes
        );
        assert_eq!(spec.matches(&request(Method::GET, "/cities?view=detail&full")), Match::No);
        assert_eq!(spec.matches(&request(Method::GET, "/cities?view=summary")), Match::No);
    }

    #[test]
    fn test_rpc_target() {
        let spec = RequestSpec::rpc("Weather.GetCity");
        let matching = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(TARGET_HEADER, "Weather.GetCity")
            .body(())
            .unwrap();
        let other = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(TARGET_HEADER, "Weather.ListCities")
            .body(())
            .unwrap();

        assert_eq!(spec.matches(&matching), Match::Yes);
        assert_eq!(spec.matches(&other), Match::No);
        assert_eq!(spec.matches(&request(Method::POST, "/")), Match::No);
    }

    #[test]
    fn test_rank_prefers_specific_specs() {
        let list = RequestSpec::rest(Method::GET, vec![PathSegment::literal("cities")], vec![]);
        assert!(city().rank() > list.rank());
    }
}
