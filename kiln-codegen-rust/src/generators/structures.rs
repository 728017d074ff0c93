//! Type definitions for the shapes of the service closure.

use eyre::{Result, eyre};
use kiln_codegen::{
    CodegenError,
    builder::{CodeFragment, EnumSpec, FieldSpec, StructSpec, StructureRenderer, VariantSpec},
    symbol::Symbol,
};
use kiln_core::to_pascal_case;
use kiln_model::{EnumValue, Shape, ShapeBody, TraitKind};

use super::GeneratorContext;
use crate::{
    ast::{Fn, Impl, Param},
    naming::RUST_NAMING,
    rust_file::RustFile,
    structure_renderer::RustStructureRenderer,
};

/// Modules holding type definitions, with their module docs.
pub const MODULES: [(&str, &str); 5] = [
    ("error", "Errors returned by the service's operations."),
    ("input", "Operation inputs."),
    ("model", "Data shapes shared by operations."),
    ("operation", "Operation marker types."),
    ("output", "Operation outputs."),
];

/// Renders every generated type into the module its symbol names.
///
/// Derives come from symbol metadata, field types from the resolved symbol
/// of each member, so override stages are reflected without the generator
/// knowing about them.
pub struct StructureGenerator<'a> {
    ctx: &'a GeneratorContext<'a>,
    renderer: RustStructureRenderer,
}

impl<'a> StructureGenerator<'a> {
    pub fn new(ctx: &'a GeneratorContext<'a>) -> Self {
        Self {
            ctx,
            renderer: RustStructureRenderer::new(),
        }
    }

    /// `(path, content)` of every type module, in [`MODULES`] order.
    pub fn render_all(&self) -> Result<Vec<(String, String)>> {
        MODULES
            .iter()
            .map(|(module, doc)| Ok((format!("src/{}.rs", module), self.render_module(module, doc)?)))
            .collect()
    }

    pub fn render_module(&self, module: &str, doc: &str) -> Result<String> {
        let items = self
            .definitions(module)
            .into_iter()
            .map(|(shape, symbol)| self.render_shape(shape, symbol))
            .collect::<Result<Vec<_>>>()?;
        Ok(RustFile::new().doc(doc).add_all(items).render())
    }

    /// Shapes defining a type in `module`, sorted by type name.
    fn definitions(&self, module: &str) -> Vec<(&'a Shape, &'a Symbol)> {
        let model = self.ctx.codegen.model();
        let mut definitions: Vec<_> = self
            .ctx
            .symbols
            .iter()
            .filter(|(_, symbol)| symbol.module.as_deref() == Some(module))
            .filter_map(|(id, symbol)| model.get(id).map(|shape| (shape, symbol)))
            .filter(|(shape, _)| !shape.is_member())
            .collect();
        definitions.sort_by(|(_, a), (_, b)| a.name().cmp(b.name()));
        definitions
    }

    fn render_shape(&self, shape: &Shape, symbol: &Symbol) -> Result<CodeFragment> {
        tracing::debug!(shape = %shape.id, symbol = %symbol, "rendering definition");
        match &shape.body {
            ShapeBody::Structure { members } => self.structure(shape, symbol, members),
            ShapeBody::Union { members } => self.union(shape, symbol, members),
            ShapeBody::String => match shape.traits.enum_values() {
                Some(values) => Ok(self.string_enum(shape, symbol, values)),
                None => self.constrained_string(shape, symbol),
            },
            ShapeBody::Operation { .. } => Ok(self.operation(shape, symbol)),
            _ => Err(eyre!(
                "`{}` ({}) has no type definition",
                shape.id,
                shape.shape_type().as_str()
            )),
        }
    }

    fn member(&self, id: &kiln_model::ShapeId) -> Result<(&'a Shape, &'a Symbol)> {
        let member = self.ctx.codegen.model().expect_shape(id)?;
        Ok((member, self.ctx.symbols.expect(id)?))
    }

    fn structure(
        &self,
        shape: &Shape,
        symbol: &Symbol,
        members: &[kiln_model::ShapeId],
    ) -> Result<CodeFragment> {
        let fields = members
            .iter()
            .map(|id| {
                let (member, ty) = self.member(id)?;
                Ok(FieldSpec::new(field_name(member), ty.full_name())
                    .maybe_doc(member.traits.documentation()))
            })
            .collect::<Result<Vec<_>>>()?;
        let spec = StructSpec::new(symbol.name())
            .maybe_doc(shape.traits.documentation())
            .derives(symbol.metadata.derive_names())
            .fields(fields);

        let mut parts = vec![self.renderer.render_struct(&spec)];
        if shape.traits.error().is_some() {
            parts.push(self.error_impls(shape, symbol, members)?);
        }
        Ok(separated(parts))
    }

    /// `Display` (name, then the message when there is one) and `Error`.
    fn error_impls(
        &self,
        shape: &Shape,
        symbol: &Symbol,
        members: &[kiln_model::ShapeId],
    ) -> Result<CodeFragment> {
        let mut message = None;
        for id in members {
            let (member, ty) = self.member(id)?;
            let is_message = member
                .member_name()
                .is_some_and(|name| name.eq_ignore_ascii_case("message"));
            if is_message && ty.name() == "String" {
                message = Some((field_name(member), ty.is_optional()));
                break;
            }
        }

        let fmt = Fn::new("fmt")
            .private()
            .param(Param::receiver("&self"))
            .param(Param::new("f", "&mut std::fmt::Formatter<'_>"))
            .returns("std::fmt::Result")
            .body_line(format!("f.write_str({:?})?;", shape.id.name()));
        let fmt = match message {
            Some((field, true)) => fmt.body(CodeFragment::braced(
                format!("if let Some(message) = &self.{} {{", field),
                vec![CodeFragment::line("write!(f, \": {}\", message)?;")],
            )),
            Some((field, false)) => fmt.body_line(format!("write!(f, \": {{}}\", self.{})?;", field)),
            None => fmt,
        }
        .body_line("Ok(())");

        Ok(separated(vec![
            Impl::new(symbol.name())
                .for_trait("std::fmt::Display")
                .method(fmt)
                .to_fragment(),
            CodeFragment::line(format!("impl std::error::Error for {} {{}}", symbol.name())),
        ]))
    }

    fn union(
        &self,
        shape: &Shape,
        symbol: &Symbol,
        members: &[kiln_model::ShapeId],
    ) -> Result<CodeFragment> {
        let variants = members
            .iter()
            .map(|id| {
                let (member, ty) = self.member(id)?;
                let name = member.member_name().unwrap_or(member.id.name());
                Ok(VariantSpec::tuple(
                    to_pascal_case(name),
                    vec![ty.clone().make_required().full_name()],
                )
                .maybe_doc(member.traits.documentation()))
            })
            .collect::<Result<Vec<_>>>()?;
        let spec = EnumSpec::new(symbol.name())
            .maybe_doc(shape.traits.documentation())
            .derives(symbol.metadata.derive_names())
            .variants(variants);
        Ok(self.renderer.render_enum(&spec))
    }

    /// An enum with one unit variant per value and an `Unknown` fallback.
    fn string_enum(&self, shape: &Shape, symbol: &Symbol, values: &[EnumValue]) -> CodeFragment {
        let name = symbol.name();
        let variants: Vec<_> = values.iter().map(|v| (variant_name(v), &v.value)).collect();

        let spec = EnumSpec::new(name)
            .maybe_doc(shape.traits.documentation())
            .derives(symbol.metadata.derive_names())
            .variants(variants.iter().map(|(variant, _)| VariantSpec::unit(variant)))
            .variant(
                VariantSpec::tuple("Unknown", vec!["String".to_string()])
                    .maybe_doc(Some("A value this crate was not generated with.")),
            );

        let as_str = variants
            .iter()
            .map(|(variant, value)| CodeFragment::line(format!("{}::{} => {:?},", name, variant, value)))
            .chain([CodeFragment::line(format!("{}::Unknown(value) => value.as_str(),", name))])
            .collect();
        let from = variants
            .iter()
            .map(|(variant, value)| CodeFragment::line(format!("{:?} => {}::{},", value, name, variant)))
            .chain([CodeFragment::line(format!("other => {}::Unknown(other.to_string()),", name))])
            .collect();

        separated(vec![
            self.renderer.render_enum(&spec),
            Impl::new(name)
                .method(
                    Fn::new("as_str")
                        .doc("The wire value.")
                        .param(Param::receiver("&self"))
                        .returns("&str")
                        .body(CodeFragment::braced("match self {", as_str)),
                )
                .to_fragment(),
            Impl::new(name)
                .for_trait("From<&str>")
                .method(
                    Fn::new("from")
                        .private()
                        .param(Param::new("value", "&str"))
                        .returns("Self")
                        .body(CodeFragment::braced("match value {", from)),
                )
                .to_fragment(),
        ])
    }

    /// A newtype validated against the shape's `pattern`.
    ///
    /// The pattern is compiled here once so a malformed one fails the run
    /// instead of the generated crate.
    fn constrained_string(&self, shape: &Shape, symbol: &Symbol) -> Result<CodeFragment> {
        let pattern = shape
            .traits
            .pattern()
            .ok_or_else(|| CodegenError::MissingTrait {
                shape: shape.id.clone(),
                trait_id: TraitKind::Pattern.id(),
            })?;
        regex::Regex::new(pattern)
            .map_err(|e| eyre!("invalid pattern on `{}`: {}", shape.id, e))?;

        let name = symbol.name();
        let regex = format!("{}::regex::Regex", self.ctx.server_crate());
        let mut declaration = Vec::new();
        if let Some(doc) = shape.traits.documentation() {
            declaration.push(CodeFragment::rust_doc(doc));
        }
        declaration.push(CodeFragment::line(format!(
            "#[derive({})]",
            symbol.metadata.derive_names().join(", ")
        )));
        declaration.push(CodeFragment::line(format!("pub struct {}(String);", name)));

        let compile_regex = Fn::new("compile_regex")
            .doc("The compiled pattern, built on first use.")
            .returns(format!("&'static {}", regex))
            .body_line(format!(
                "static REGEX: std::sync::OnceLock<{}> = std::sync::OnceLock::new();",
                regex
            ))
            .body(CodeFragment::block(
                "REGEX.get_or_init(|| {",
                vec![CodeFragment::line(format!(
                    "{}::new({:?}).expect(\"pattern is checked when the crate is generated\")",
                    regex, pattern
                ))],
                Some("})".to_string()),
            ));

        Ok(separated(vec![
            CodeFragment::sequence(declaration),
            Impl::new(name)
                .method(compile_regex)
                .method(
                    Fn::new("as_str")
                        .param(Param::receiver("&self"))
                        .returns("&str")
                        .body_line("&self.0"),
                )
                .method(
                    Fn::new("into_inner")
                        .param(Param::receiver("self"))
                        .returns("String")
                        .body_line("self.0"),
                )
                .to_fragment(),
            Impl::new(name)
                .for_trait("TryFrom<String>")
                .item(CodeFragment::line("type Error = String;"))
                .method(
                    Fn::new("try_from")
                        .private()
                        .param(Param::new("value", "String"))
                        .returns("Result<Self, Self::Error>")
                        .body(CodeFragment::block(
                            "if Self::compile_regex().is_match(&value) {",
                            vec![CodeFragment::line("Ok(Self(value))")],
                            Some("} else {".to_string()),
                        ))
                        .body(CodeFragment::indent(vec![CodeFragment::line("Err(value)")]))
                        .body_line("}"),
                )
                .to_fragment(),
        ]))
    }

    /// A unit marker naming the operation.
    fn operation(&self, shape: &Shape, symbol: &Symbol) -> CodeFragment {
        let name = symbol.name();
        let mut declaration = Vec::new();
        if let Some(doc) = shape.traits.documentation() {
            declaration.push(CodeFragment::rust_doc(doc));
        }
        declaration.push(CodeFragment::line(format!(
            "#[derive({})]",
            symbol.metadata.derive_names().join(", ")
        )));
        declaration.push(CodeFragment::line(format!("pub struct {};", name)));

        separated(vec![
            CodeFragment::sequence(declaration),
            Impl::new(name)
                .item(CodeFragment::sequence(vec![
                    CodeFragment::rust_doc("Absolute shape id of the operation."),
                    CodeFragment::line(format!("pub const ID: &'static str = {:?};", shape.id.to_string())),
                ]))
                .item(CodeFragment::sequence(vec![
                    CodeFragment::rust_doc("Name of the operation within its service."),
                    CodeFragment::line(format!("pub const NAME: &'static str = {:?};", shape.id.name())),
                ]))
                .to_fragment(),
        ])
    }
}

fn field_name(member: &Shape) -> String {
    RUST_NAMING.field_name(member.member_name().unwrap_or(member.id.name()))
}

/// `CELSIUS` -> `Celsius`, `us-east-1` -> `UsEast1`.
fn variant_name(value: &EnumValue) -> String {
    let raw = value.name.as_deref().unwrap_or(&value.value);
    let shouting = raw.chars().all(|c| !c.is_lowercase());
    if shouting {
        to_pascal_case(&raw.to_lowercase())
    } else {
        to_pascal_case(raw)
    }
}

/// Items joined by blank lines.
fn separated(parts: Vec<CodeFragment>) -> CodeFragment {
    let mut out = Vec::with_capacity(parts.len() * 2);
    for part in parts {
        if !out.is_empty() {
            out.push(CodeFragment::blank());
        }
        out.push(part);
    }
    CodeFragment::sequence(out)
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use kiln_manifest::Mode;

    use super::*;
    use crate::generators::test_support::Fixture;

    fn module(mode: Mode, module: &str) -> String {
        Fixture::weather(mode).with(|ctx| StructureGenerator::new(ctx).render_module(module, "Docs.").unwrap())
    }

    #[test]
    fn test_enum_definition() {
        let model = module(Mode::Client, "model");
        let start = model.find("#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]\npub enum TemperatureUnit").unwrap();
        assert_snapshot!(&model[start..], @r#"
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TemperatureUnit {
            Celsius,
            Fahrenheit,
            /// A value this crate was not generated with.
            Unknown(String),
        }

        impl TemperatureUnit {
            /// The wire value.
            pub fn as_str(&self) -> &str {
                match self {
                    TemperatureUnit::Celsius => "CELSIUS",
                    TemperatureUnit::Fahrenheit => "FAHRENHEIT",
                    TemperatureUnit::Unknown(value) => value.as_str(),
                }
            }
        }

        impl From<&str> for TemperatureUnit {
            fn from(value: &str) -> Self {
                match value {
                    "CELSIUS" => TemperatureUnit::Celsius,
                    "FAHRENHEIT" => TemperatureUnit::Fahrenheit,
                    other => TemperatureUnit::Unknown(other.to_string()),
                }
            }
        }
        "#);
    }

    #[test]
    fn test_model_types_are_sorted_and_boxed() {
        let model = module(Mode::Client, "model");
        let names: Vec<_> = model
            .lines()
            .filter_map(|l| l.strip_prefix("pub struct ").or_else(|| l.strip_prefix("pub enum ")))
            .collect();
        assert_eq!(
            names,
            ["CityCoordinates {", "CitySummary {", "Region {", "TemperatureUnit {"]
        );
        assert!(model.contains("pub parent: Option<Box<crate::model::Region>>,"), "{model}");
        assert!(model.contains("pub city_id: String,"), "{model}");
    }

    #[test]
    fn test_server_pattern_newtype() {
        let model = module(Mode::Server, "model");
        assert!(model.contains("pub struct CityId(String);"), "{model}");
        assert!(model.contains(
            "kiln_server::regex::Regex::new(\"^[A-Za-z0-9 ]+$\").expect(\"pattern is checked when the crate is generated\")"
        ));
        assert!(model.contains("pub city_id: crate::model::CityId,"), "{model}");
    }

    #[test]
    fn test_error_display() {
        let errors = module(Mode::Client, "error");
        assert!(errors.contains("pub struct NoSuchResource {"), "{errors}");
        assert!(errors.contains("if let Some(message) = &self.message {"), "{errors}");
        assert!(errors.contains("impl std::error::Error for NoSuchResource {}"), "{errors}");
    }

    #[test]
    fn test_streaming_output_drops_partial_eq() {
        let output = module(Mode::Server, "output");
        let start = output.find("pub struct GetCityImageOutput").unwrap();
        let preceding = &output[..start];
        assert!(preceding.ends_with("#[derive(Debug, Clone)]\n"), "{output}");
        assert!(output.contains("pub image: kiln_server::types::ByteStream,"), "{output}");
    }

    #[test]
    fn test_operation_markers() {
        let operations = module(Mode::Server, "operation");
        assert!(operations.starts_with("//! Docs.\n\n#[derive(Debug, Clone)]\npub struct GetCity;\n"));
        assert!(operations.contains("pub const ID: &'static str = \"example.weather#GetCity\";"));
        assert_eq!(operations.matches("pub struct ").count(), 4);
    }

    #[test]
    fn test_invalid_pattern_fails_the_run() {
        let model = kiln_codegen::testing::WEATHER_MODEL.replace("^[A-Za-z0-9 ]+$", "([unclosed");
        let ctx = kiln_codegen::testing::context_from(&model, &kiln_codegen::testing::weather_manifest(Mode::Server)).unwrap();
        let err = Fixture::new(ctx)
            .with(|ctx| StructureGenerator::new(ctx).render_module("model", "Docs."))
            .unwrap_err();
        assert!(err.to_string().contains("invalid pattern on `example.weather#CityId`"), "{err}");
    }
}
