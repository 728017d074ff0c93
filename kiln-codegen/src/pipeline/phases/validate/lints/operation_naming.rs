//! Lint for operation field name collisions.

use std::collections::BTreeMap;

use kiln_model::ShapeId;

use super::super::Lint;
use crate::{CodegenContext, pipeline::Diagnostic};

/// Lint that errors when two operations map to the same builder field.
///
/// `GetCity` and `Get_City` would both generate a `get_city` setter.
pub struct OperationNamingLint;

impl Lint for OperationNamingLint {
    fn name(&self) -> &'static str {
        "operation-naming"
    }

    fn description(&self) -> &'static str {
        "Detect operations whose generated field names collide"
    }

    fn check(&self, ctx: &CodegenContext, diagnostics: &mut Vec<Diagnostic>) {
        let operations = match ctx.operations() {
            Ok(operations) => operations,
            Err(e) => {
                diagnostics.push(Diagnostic::error("validate", e.to_string()).at(ctx.service()));
                return;
            }
        };

        let mut seen: BTreeMap<String, &ShapeId> = BTreeMap::new();
        for operation in operations {
            let field = CodegenContext::operation_field_name(&operation.id);
            match seen.get(&field) {
                Some(first) => diagnostics.push(
                    Diagnostic::error(
                        "validate",
                        format!(
                            "operations `{}` and `{}` both generate the field `{}`",
                            first, operation.id, field
                        ),
                    )
                    .at(&operation.id),
                ),
                None => {
                    seen.insert(field, &operation.id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kiln_manifest::Mode;

    use super::*;
    use crate::testing;

    #[test]
    fn test_distinct_names() {
        let ctx = testing::weather_context(Mode::Server).unwrap();
        let mut diagnostics = Vec::new();
        OperationNamingLint.check(&ctx, &mut diagnostics);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_collision_names_both_operations() {
        let model = r#"{
            "shapes": {
                "ex#Svc": {
                    "type": "service",
                    "version": "1",
                    "operations": [{ "target": "ex#GetCity" }, { "target": "ex#Get_City" }],
                    "traits": { "aws.protocols#restJson1": {} }
                },
                "ex#GetCity": { "type": "operation" },
                "ex#Get_City": { "type": "operation" }
            }
        }"#;
        let manifest = "[codegen]\nservice = \"ex#Svc\"\nmodel = \"m.json\"\nmodule-name = \"svc\"\n";
        let ctx = testing::context_from(model, manifest).unwrap();
        let mut diagnostics = Vec::new();
        OperationNamingLint.check(&ctx, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "operations `ex#GetCity` and `ex#Get_City` both generate the field `get_city`"
        );
    }
}
