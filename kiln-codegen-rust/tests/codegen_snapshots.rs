//! Snapshot tests for whole-crate Rust code generation.
//!
//! Run `cargo insta review` to update snapshots when making intentional changes.

use kiln_codegen_rust::{Generator, LanguageCodegen};
use kiln_manifest::parse_manifest;
use kiln_model::Model;

const KEY_VALUE_MODEL: &str = r#"{
    "smithy": "2.0",
    "shapes": {
        "example.kv#KeyValue": {
            "type": "service",
            "version": "2024-01-01",
            "operations": [
                { "target": "example.kv#PutItem" },
                { "target": "example.kv#GetItem" }
            ],
            "traits": { "aws.protocols#awsJson1_0": {} }
        },
        "example.kv#GetItem": {
            "type": "operation",
            "input": { "target": "example.kv#GetItemRequest" },
            "output": { "target": "example.kv#GetItemResponse" }
        },
        "example.kv#GetItemRequest": {
            "type": "structure",
            "members": {
                "key": { "target": "smithy.api#String", "traits": { "smithy.api#required": {} } }
            }
        },
        "example.kv#GetItemResponse": {
            "type": "structure",
            "members": {
                "value": { "target": "smithy.api#Blob" }
            }
        },
        "example.kv#PutItem": {
            "type": "operation",
            "input": { "target": "example.kv#GetItemRequest" }
        }
    }
}"#;

/// Generate a crate and return its files sorted by path.
fn generate_files(mode: &str) -> Vec<(String, String)> {
    let manifest = parse_manifest(
        &format!(
            r#"
            [codegen]
            service = "example.kv#KeyValue"
            model = "kv.json"
            module-name = "kv-store"
            mode = "{mode}"
            "#
        ),
        "kiln.toml",
    )
    .expect("Failed to parse manifest");
    let model = Model::from_json_str(KEY_VALUE_MODEL).expect("Failed to parse model");
    let generator = Generator::from_manifest(model, &manifest).expect("Failed to select decorators");

    let mut files: Vec<(String, String)> = generator
        .preview()
        .expect("Failed to render")
        .into_iter()
        .map(|f| (f.path, f.content))
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}

fn get_file<'a>(files: &'a [(String, String)], path: &str) -> &'a str {
    files
        .iter()
        .find(|(p, _)| p == path)
        .map(|(_, c)| c.as_str())
        .unwrap_or_else(|| panic!("{path} not generated"))
}

#[test]
fn test_server_cargo_toml() {
    let files = generate_files("server");
    // The blob member is what pulls in the types runtime.
    assert!(get_file(&files, "src/output.rs").contains("Option<kiln_types::Blob>"));
    insta::assert_snapshot!(get_file(&files, "Cargo.toml"), @r#"
    [package]
    name = "kv-store"
    version = "0.1.0"
    edition = "2024"

    [dependencies]
    kiln-server = "0.1"
    kiln-types = "0.1"
    "#);
}

#[test]
fn test_server_lib_rs() {
    let files = generate_files("server");
    insta::assert_snapshot!(get_file(&files, "src/lib.rs"), @r"
    // Code generated by kiln. DO NOT EDIT.

    //! Generated server for the `KeyValue` service.

    pub mod error;
    pub mod input;
    pub mod model;
    pub mod operation;
    pub mod output;
    mod service;

    pub use service::{KeyValue, KeyValueBuilder};
    ");
}

#[test]
fn test_rpc_request_specs() {
    let files = generate_files("server");
    let service = get_file(&files, "src/service.rs");

    let start = service.find("mod request_specs {").unwrap();
    let end = start + service[start..].find("\n}\n").unwrap() + 2;
    insta::assert_snapshot!(&service[start..end], @r#"
    mod request_specs {
        pub(crate) fn get_item() -> kiln_server::routing::RequestSpec {
            kiln_server::routing::RequestSpec::rpc("KeyValue.GetItem")
        }

        pub(crate) fn put_item() -> kiln_server::routing::RequestSpec {
            kiln_server::routing::RequestSpec::rpc("KeyValue.PutItem")
        }
    }
    "#);
    assert!(service.contains("router: kiln_server::routing::Router<S, kiln_server::protocol::AwsJson1_0>,"));
}

#[test]
fn test_operations_are_ordered_by_id() {
    let files = generate_files("server");
    let service = get_file(&files, "src/service.rs");
    let get = service.find("missing.push(crate::operation::GetItem::ID").unwrap();
    let put = service.find("missing.push(crate::operation::PutItem::ID").unwrap();
    assert!(get < put);
}

#[test]
fn test_client_crate() {
    let files = generate_files("client");
    let paths: Vec<&str> = files.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(
        paths,
        [
            "Cargo.toml",
            "src/config.rs",
            "src/error.rs",
            "src/input.rs",
            "src/lib.rs",
            "src/model.rs",
            "src/operation.rs",
            "src/output.rs",
            "src/protocol_serde.rs",
            "src/service.rs",
        ]
    );

    let serde = get_file(&files, "src/protocol_serde.rs");
    assert!(serde.contains("kiln_types::protocol::aws_json::parse_generic_error"));
    assert!(serde.contains("pub fn de_get_item_error("));
    assert!(serde.contains("pub fn de_put_item_error("));
    assert!(!serde.contains("apply_extended_error"));
}

#[test]
fn test_generation_is_deterministic() {
    assert_eq!(generate_files("server"), generate_files("server"));
    assert_eq!(generate_files("client"), generate_files("client"));
}
