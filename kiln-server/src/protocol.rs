//! Protocol marker types.
//!
//! A generated service names its protocol in its router type
//! (`Router<S, RestJson1>`); the marker decides how routing failures are
//! reported on the wire.

use bytes::Bytes;
use http::{Response, StatusCode, header};

use crate::routing::RoutingError;

/// A wire protocol a router can speak.
pub trait Protocol {
    /// Protocol name (`restJson1`).
    const NAME: &'static str;

    /// The response sent when no operation matches a request.
    fn routing_error(error: &RoutingError) -> Response<Bytes>;
}

fn error_response(status: StatusCode, content_type: &str, body: String) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from(body));
    *response.status_mut() = status;
    if let Ok(value) = content_type.parse() {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

fn status(error: &RoutingError) -> StatusCode {
    match error {
        RoutingError::NotFound { .. } => StatusCode::NOT_FOUND,
        RoutingError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
    }
}

/// `aws.protocols#restJson1`
#[derive(Debug, Clone, Copy, Default)]
pub struct RestJson1;

impl Protocol for RestJson1 {
    const NAME: &'static str = "restJson1";

    fn routing_error(error: &RoutingError) -> Response<Bytes> {
        let mut response = error_response(status(error), "application/json", "{}".to_string());
        if let Ok(value) = "UnknownOperationException".parse() {
            response.headers_mut().insert("x-amzn-errortype", value);
        }
        response
    }
}

/// `aws.protocols#restXml`
#[derive(Debug, Clone, Copy, Default)]
pub struct RestXml;

impl Protocol for RestXml {
    const NAME: &'static str = "restXml";

    fn routing_error(error: &RoutingError) -> Response<Bytes> {
        error_response(
            status(error),
            "application/xml",
            "<ErrorResponse><Error><Code>UnknownOperationException</Code></Error></ErrorResponse>"
                .to_string(),
        )
    }
}

/// `aws.protocols#awsJson1_0`
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsJson1_0;

impl Protocol for AwsJson1_0 {
    const NAME: &'static str = "awsJson1_0";

    fn routing_error(error: &RoutingError) -> Response<Bytes> {
        aws_json_error(error, "application/x-amz-json-1.0")
    }
}

/// `aws.protocols#awsJson1_1`
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsJson1_1;

impl Protocol for AwsJson1_1 {
    const NAME: &'static str = "awsJson1_1";

    fn routing_error(error: &RoutingError) -> Response<Bytes> {
        aws_json_error(error, "application/x-amz-json-1.1")
    }
}

// RPC protocols always answer unknown targets with 404.
fn aws_json_error(_error: &RoutingError, content_type: &str) -> Response<Bytes> {
    error_response(
        StatusCode::NOT_FOUND,
        content_type,
        r#"{"__type":"UnknownOperationException"}"#.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;

    fn not_found() -> RoutingError {
        RoutingError::NotFound {
            method: Method::GET,
            path: "/nowhere".to_string(),
        }
    }

    #[test]
    fn test_rest_json_not_found() {
        let response = RestJson1::routing_error(&not_found());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-amzn-errortype"], "UnknownOperationException");
    }

    #[test]
    fn test_aws_json_is_always_not_found() {
        let err = RoutingError::MethodNotAllowed {
            method: Method::GET,
            path: "/".to_string(),
        };
        let response = AwsJson1_1::routing_error(&err);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/x-amz-json-1.1"
        );
    }

    #[test]
    fn test_rest_xml_body() {
        let response = RestXml::routing_error(&not_found());
        assert!(
            std::str::from_utf8(response.body())
                .unwrap()
                .contains("<Code>UnknownOperationException</Code>")
        );
    }
}
