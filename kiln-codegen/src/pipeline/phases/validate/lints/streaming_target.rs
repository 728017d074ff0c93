//! Lint for streaming members.

use super::super::Lint;
use crate::{CodegenContext, pipeline::Diagnostic};

/// Lint that errors on streaming members whose target is not a blob.
pub struct StreamingTargetLint;

impl Lint for StreamingTargetLint {
    fn name(&self) -> &'static str {
        "streaming-target"
    }

    fn description(&self) -> &'static str {
        "Streaming members must target a blob"
    }

    fn check(&self, ctx: &CodegenContext, diagnostics: &mut Vec<Diagnostic>) {
        let model = ctx.model();
        for member in model.shapes().filter(|s| s.is_member()) {
            if !model.is_streaming(member) {
                continue;
            }
            match model.member_target(member) {
                Ok(target) if target.is_blob() => {}
                Ok(target) => diagnostics.push(
                    Diagnostic::error(
                        "validate",
                        format!(
                            "streaming member targets a {} (`{}`), expected a blob",
                            target.shape_type(),
                            target.id
                        ),
                    )
                    .at(&member.id),
                ),
                Err(e) => {
                    diagnostics.push(Diagnostic::error("validate", e.to_string()).at(&member.id))
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
    fn test_streaming_blob_is_fine() {
        let ctx = testing::weather_context(Mode::Client).unwrap();
        let mut diagnostics = Vec::new();
        StreamingTargetLint.check(&ctx, &mut diagnostics);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_streaming_string_member() {
        let model = testing::WEATHER_MODEL.replace(
            r#""chanceOfRain": { "target": "smithy.api#Float" }"#,
            r#""chanceOfRain": { "target": "smithy.api#String", "traits": { "smithy.api#streaming": {} } }"#,
        );
        let ctx = testing::context_from(&model, &testing::weather_manifest(Mode::Client)).unwrap();
        let mut diagnostics = Vec::new();
        StreamingTargetLint.check(&ctx, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].location.as_deref(),
            Some("example.weather#GetForecastOutput$chanceOfRain")
        );
        assert!(diagnostics[0].message.contains("targets a string"));
    }
}
