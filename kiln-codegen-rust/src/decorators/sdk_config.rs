//! Construction of the client `Config` from a shared `SdkConfig`.

use eyre::Result;
use kiln_codegen::{
    CodegenContext,
    builder::CodeFragment,
    customize::{ConfigSection, Decorator, ExtraSection, SdkConfigSection, Section, SectionName},
};

use crate::ast::{Fn, Param};

/// Copy `field` from the shared config into the client config builder:
/// `builder.set_<field>(input.<field>()<map>);`.
///
/// `map` is appended verbatim after the accessor call, e.g. `.cloned()`.
pub fn copy_field<'a>(field: &'static str, map: Option<&'static str>) -> ExtraSection<'a> {
    ExtraSection::new(SectionName::CopySdkConfigToClientConfig, move |section| {
        match section {
            Section::SdkConfig(SdkConfigSection::CopySdkConfigToClientConfig {
                sdk_config,
                service_config_builder,
            }) => Ok(Some(CodeFragment::line(format!(
                "{}.set_{}({}.{}(){});",
                service_config_builder,
                field,
                sdk_config,
                field,
                map.unwrap_or_default()
            )))),
            _ => Ok(None),
        }
    })
}

/// Lets a client be configured from the shared `SdkConfig`.
///
/// Contributes `Config::new(&SdkConfig)` and copies the generic settings
/// (retries, timeouts, sleep, connector) into the config builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdkConfigDecorator;

impl Decorator for SdkConfigDecorator {
    fn name(&self) -> &'static str {
        "sdk-config"
    }

    fn section(&self, ctx: &CodegenContext, section: &Section<'_>) -> Result<Option<CodeFragment>> {
        match section {
            Section::Config(ConfigSection::ConfigImpl) => {
                let sdk_config = format!("{}::sdk_config::SdkConfig", ctx.runtime_crate("types"));
                Ok(Some(
                    Fn::new("new")
                        .doc(format!(
                            "Creates a new [service config](crate::Config) from a [shared `config`]({}).",
                            sdk_config
                        ))
                        .param(Param::new("config", format!("&{}", sdk_config)))
                        .returns("Self")
                        .body_line("Builder::from(config).build()")
                        .to_fragment(),
                ))
            }
            _ => Ok(None),
        }
    }

    fn extra_sections<'a>(&'a self, _ctx: &'a CodegenContext) -> Vec<ExtraSection<'a>> {
        vec![
            copy_field("retry_config", Some(".cloned()")),
            copy_field("timeout_config", Some(".cloned()")),
            copy_field("sleep_impl", None),
            copy_field("http_connector", Some(".cloned()")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use insta::assert_snapshot;
    use kiln_codegen::{customize::CombinedDecorator, testing};
    use kiln_manifest::Mode;

    use super::*;

    fn render(section: &Section<'_>) -> String {
        let ctx = testing::weather_context(Mode::Client).unwrap();
        let combined = CombinedDecorator::new(vec![Arc::new(SdkConfigDecorator)]).unwrap();
        let registry = combined.section_registry(&ctx).unwrap();
        registry.render_sequence(section).unwrap().render()
    }

    #[test]
    fn test_copy_fields() {
        let out = render(&Section::SdkConfig(
            SdkConfigSection::CopySdkConfigToClientConfig {
                sdk_config: "input",
                service_config_builder: "builder",
            },
        ));
        assert_snapshot!(out, @r"
        builder.set_retry_config(input.retry_config().cloned());
        builder.set_timeout_config(input.timeout_config().cloned());
        builder.set_sleep_impl(input.sleep_impl());
        builder.set_http_connector(input.http_connector().cloned());
        ");
    }

    #[test]
    fn test_new_from_shared() {
        let out = render(&Section::Config(ConfigSection::ConfigImpl));
        assert_snapshot!(out, @r"
        /// Creates a new [service config](crate::Config) from a [shared `config`](kiln_types::sdk_config::SdkConfig).
        pub fn new(config: &kiln_types::sdk_config::SdkConfig) -> Self {
            Builder::from(config).build()
        }
        ");
    }

    #[test]
    fn test_other_sections_untouched() {
        assert_eq!(render(&Section::Config(ConfigSection::BuilderBuild)), "");
    }
}
