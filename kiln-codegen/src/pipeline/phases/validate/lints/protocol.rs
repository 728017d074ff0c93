//! Lint for the service protocol declaration.

use super::super::Lint;
use crate::{CodegenContext, pipeline::Diagnostic};

/// Lint that errors unless the service declares exactly one protocol.
pub struct ProtocolLint;

impl Lint for ProtocolLint {
    fn name(&self) -> &'static str {
        "protocol"
    }

    fn description(&self) -> &'static str {
        "Require exactly one supported protocol trait on the service"
    }

    fn check(&self, ctx: &CodegenContext, diagnostics: &mut Vec<Diagnostic>) {
        let service = match ctx.service_shape() {
            Ok(service) => service,
            Err(e) => {
                diagnostics.push(Diagnostic::error("validate", e.to_string()).at(ctx.service()));
                return;
            }
        };

        let protocols = service.traits.protocols();
        match protocols.len() {
            1 => {}
            0 => diagnostics.push(
                Diagnostic::error("validate", "service declares no supported protocol trait")
                    .at(&service.id),
            ),
            _ => {
                let names: Vec<_> = protocols.iter().map(|p| p.as_str()).collect();
                diagnostics.push(
                    Diagnostic::error(
                        "validate",
                        format!(
                            "service declares several protocols ({}); exactly one is supported",
                            names.join(", ")
                        ),
                    )
                    .at(&service.id),
                );
            }
        }
    }
}
