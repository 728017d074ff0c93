//! Client configuration (`config.rs`).

use eyre::Result;
use kiln_codegen::{
    builder::CodeFragment,
    customize::{ConfigSection, SdkConfigSection, Section},
};

use super::GeneratorContext;
use crate::{
    ast::{Fn, Impl, Param},
    rust_file::RustFile,
};

/// Settings every client config carries: `(field, type under {types}::config)`.
const BASE_FIELDS: [(&str, &str); 4] = [
    ("retry_config", "RetryConfig"),
    ("timeout_config", "TimeoutConfig"),
    ("sleep_impl", "SharedAsyncSleep"),
    ("http_connector", "HttpConnector"),
];

const SDK_CONFIG: &str = "input";
const BUILDER: &str = "builder";

/// Renders `Config`, its `Builder`, and the conversions from `SdkConfig`
/// when a decorator copies shared settings.
pub struct ConfigGenerator<'a> {
    ctx: &'a GeneratorContext<'a>,
}

impl<'a> ConfigGenerator<'a> {
    pub fn new(ctx: &'a GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    fn section(&self, section: ConfigSection) -> Result<CodeFragment> {
        Ok(self.ctx.sections.render_sequence(&Section::Config(section))?)
    }

    fn field_type(&self, ty: &str) -> String {
        format!("{}::config::{}", self.ctx.types_crate(), ty)
    }

    pub fn render(&self) -> Result<String> {
        let fields: Vec<_> = BASE_FIELDS
            .iter()
            .map(|(name, ty)| CodeFragment::line(format!("{}: Option<{}>,", name, self.field_type(ty))))
            .collect();

        let config = CodeFragment::sequence(vec![
            CodeFragment::rust_doc("Configuration for a client of this service."),
            CodeFragment::line("#[derive(Debug, Clone)]"),
            CodeFragment::braced(
                "pub struct Config {",
                fields
                    .iter()
                    .cloned()
                    .chain([self.section(ConfigSection::ConfigStruct)?])
                    .collect(),
            ),
        ]);

        let getters = BASE_FIELDS.iter().map(|(name, ty)| {
            Fn::new(*name)
                .param(Param::receiver("&self"))
                .returns(format!("Option<&{}>", self.field_type(ty)))
                .body_line(format!("self.{}.as_ref()", name))
        });
        let config_impl = getters
            .fold(
                Impl::new("Config").method(
                    Fn::new("builder")
                        .doc("A builder for the config.")
                        .returns("Builder")
                        .body_line("Builder::default()"),
                ),
                Impl::method,
            )
            .item(self.section(ConfigSection::ConfigImpl)?);

        let builder = CodeFragment::sequence(vec![
            CodeFragment::rust_doc("Builder for [`Config`]."),
            CodeFragment::line("#[derive(Debug, Clone, Default)]"),
            CodeFragment::braced(
                "pub struct Builder {",
                fields
                    .into_iter()
                    .chain([self.section(ConfigSection::BuilderStruct)?])
                    .collect(),
            ),
        ]);

        let setters = BASE_FIELDS.iter().map(|(name, ty)| {
            Fn::new(format!("set_{}", name))
                .param(Param::receiver("&mut self"))
                .param(Param::new(*name, format!("Option<{}>", self.field_type(ty))))
                .returns("&mut Self")
                .body_line(format!("self.{} = {};", name, name))
                .body_line("self")
        });
        let build = Fn::new("build")
            .doc("Builds the [`Config`].")
            .param(Param::receiver("self"))
            .returns("Config")
            .body(CodeFragment::block(
                "Config {",
                BASE_FIELDS
                    .iter()
                    .map(|(name, _)| CodeFragment::line(format!("{}: self.{},", name, name)))
                    .chain([self.section(ConfigSection::BuilderBuild)?])
                    .collect(),
                Some("}".to_string()),
            ));
        let builder_impl = setters
            .fold(
                Impl::new("Builder").method(
                    Fn::new("new")
                        .doc("Constructs a config builder.")
                        .returns("Self")
                        .body_line("Self::default()"),
                ),
                Impl::method,
            )
            .item(self.section(ConfigSection::BuilderImpl)?)
            .method(build);

        let mut file = RustFile::new()
            .doc("Configuration for the service client.")
            .add(config)
            .add(config_impl.to_fragment())
            .add(builder)
            .add(builder_impl.to_fragment());
        for conversion in self.sdk_config_conversions()? {
            file = file.add(conversion);
        }
        Ok(file.render())
    }

    /// `From<&SdkConfig>` for `Builder` and `Config`, only when a decorator
    /// copies at least one shared setting.
    fn sdk_config_conversions(&self) -> Result<Vec<CodeFragment>> {
        let copies = self.ctx.sections.render(&Section::SdkConfig(
            SdkConfigSection::CopySdkConfigToClientConfig {
                sdk_config: SDK_CONFIG,
                service_config_builder: BUILDER,
            },
        ))?;
        if copies.is_empty() {
            return Ok(Vec::new());
        }

        let sdk_config = format!("&{}::sdk_config::SdkConfig", self.ctx.types_crate());
        let builder_from = Impl::new("Builder")
            .for_trait(format!("From<{}>", sdk_config))
            .method(
                Fn::new("from")
                    .private()
                    .param(Param::new(SDK_CONFIG, sdk_config.as_str()))
                    .returns("Self")
                    .body_line(format!("let mut {} = Builder::default();", BUILDER))
                    .body(CodeFragment::sequence(copies))
                    .body_line(BUILDER),
            );
        let config_from = Impl::new("Config")
            .for_trait(format!("From<{}>", sdk_config))
            .method(
                Fn::new("from")
                    .private()
                    .param(Param::new("sdk_config", sdk_config.as_str()))
                    .returns("Self")
                    .body_line("Builder::from(sdk_config).build()"),
            );
        Ok(vec![builder_from.to_fragment(), config_from.to_fragment()])
    }
}
