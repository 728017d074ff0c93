//! The service entry point (`service.rs`).
//!
//! Servers get a `<Service>Builder` with one route slot per operation, a
//! `request_specs` module and the service type wrapping the router.
//! Clients get a handle owning the client `Config`.

use std::collections::BTreeMap;

use eyre::Result;
use kiln_codegen::{
    CodegenError,
    builder::CodeFragment,
    customize::{Section, ServiceSection},
};
use kiln_core::to_snake_case;
use kiln_manifest::Mode;
use kiln_model::{Shape, ShapeBody, ShapeId, Walker};

use super::GeneratorContext;
use crate::{
    ast::{Fn, Impl, Param},
    naming::RUST_NAMING,
    rust_file::RustFile,
};

/// One operation as the builder sees it.
struct OperationSlot<'m> {
    shape: &'m Shape,
    /// Struct field and handler setter (`get_city`, `r#type`).
    field: String,
    /// Setter taking an assembled operation (`get_city_operation`).
    operation_setter: String,
    /// Marker type path (`crate::operation::GetCity`).
    marker: String,
}

pub struct ServiceGenerator<'a> {
    ctx: &'a GeneratorContext<'a>,
}

impl<'a> ServiceGenerator<'a> {
    pub fn new(ctx: &'a GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn render(&self) -> Result<String> {
        match self.ctx.codegen.mode() {
            Mode::Server => self.render_server(),
            Mode::Client => self.render_client(),
        }
    }

    fn service_doc(&self) -> Result<String> {
        let service = self.ctx.codegen.service_shape()?;
        Ok(service
            .traits
            .documentation()
            .map(str::to_string)
            .unwrap_or_else(|| format!("The `{}` service.", self.ctx.codegen.service_name())))
    }

    /// Operations in id order, with their field names.
    ///
    /// Two operations mapping to one field name is a collision.
    fn slots(&self) -> Result<Vec<OperationSlot<'a>>> {
        let mut seen: BTreeMap<String, &ShapeId> = BTreeMap::new();
        let mut slots = Vec::new();
        for shape in self.ctx.codegen.operations()? {
            let field = RUST_NAMING.field_name(shape.id.name());
            if let Some(first) = seen.insert(field.clone(), &shape.id) {
                return Err(CodegenError::SymbolCollision {
                    name: field,
                    first: first.clone(),
                    second: shape.id.clone(),
                }
                .into());
            }
            let marker = self.ctx.symbols.expect(&shape.id)?.full_name();
            slots.push(OperationSlot {
                shape,
                operation_setter: format!("{}_operation", to_snake_case(shape.id.name())),
                field,
                marker,
            });
        }
        Ok(slots)
    }

    fn render_client(&self) -> Result<String> {
        let name = self.ctx.codegen.service_name();
        let client = CodeFragment::sequence(vec![
            CodeFragment::rust_doc(self.service_doc()?),
            CodeFragment::line("#[derive(Debug, Clone)]"),
            CodeFragment::braced(
                format!("pub struct {} {{", name),
                vec![CodeFragment::line("config: crate::config::Config,")],
            ),
        ]);
        let client_impl = Impl::new(&name)
            .method(
                Fn::new("from_conf")
                    .doc("Creates a client from a service config.")
                    .param(Param::new("config", "crate::config::Config"))
                    .returns("Self")
                    .body_line("Self { config }"),
            )
            .method(
                Fn::new("config")
                    .param(Param::receiver("&self"))
                    .returns("&crate::config::Config")
                    .body_line("&self.config"),
            );
        Ok(RustFile::new()
            .doc(format!("The {} client.", name))
            .add(client)
            .add(client_impl.to_fragment())
            .render())
    }

    fn render_server(&self) -> Result<String> {
        let name = self.ctx.codegen.service_name();
        let slots = self.slots()?;

        Ok(RustFile::new()
            .doc(format!("The {} service.", name))
            .add(self.builder_struct(&name, &slots))
            .add(self.builder_impl(&name, &slots)?)
            .add(self.request_specs(&slots)?)
            .add(self.service_struct(&name)?)
            .add(self.service_impls(&name, &slots))
            .render())
    }

    fn route(&self) -> String {
        format!("{}::routing::Route<Body>", self.ctx.server_crate())
    }

    fn builder_struct(&self, name: &str, slots: &[OperationSlot<'_>]) -> CodeFragment {
        let route = self.route();
        let fields = slots
            .iter()
            .map(|slot| CodeFragment::line(format!("{}: Option<{}>,", slot.field, route)))
            .chain([
                CodeFragment::line("plugin: Plugin,"),
                CodeFragment::line("_body: std::marker::PhantomData<Body>,"),
            ])
            .collect();
        CodeFragment::sequence(vec![
            CodeFragment::rust_doc(format!(
                "Builder for [`{name}`].\n\nEvery operation needs a handler before [`build`]({name}Builder::build) succeeds."
            )),
            CodeFragment::braced(format!("pub struct {}Builder<Body, Plugin> {{", name), fields),
        ])
    }

    fn builder_impl(&self, name: &str, slots: &[OperationSlot<'_>]) -> Result<CodeFragment> {
        let server = self.ctx.server_crate();
        let mut builder_impl = Impl::new(format!("{}Builder<Body, Plugin>", name))
            .generic("Body: 'static")
            .generic(format!("Plugin: {}::operation::Plugin<Body>", server));

        for slot in slots {
            let operation = slot.shape.id.name();
            builder_impl = builder_impl
                .method(
                    Fn::new(&slot.field)
                        .doc(format!("Sets the handler for `{}`.", operation))
                        .generic("H")
                        .param(Param::receiver("self"))
                        .param(Param::new("handler", "H"))
                        .returns("Self")
                        .where_clause(format!(
                            "H: Fn({s}::http::Request<Body>) -> {s}::http::Response<{s}::bytes::Bytes> + Send + Sync + 'static",
                            s = server
                        ))
                        .body_line(format!(
                            "self.{}({}::operation::Operation::from_handler(handler))",
                            slot.operation_setter, server
                        )),
                )
                .method(
                    Fn::new(&slot.operation_setter)
                        .doc(format!("Sets an assembled operation for `{}`.", operation))
                        .param(Param::receiver("mut self"))
                        .param(Param::new(
                            "operation",
                            format!("{}::operation::Operation<Body>", server),
                        ))
                        .returns("Self")
                        .body_line(format!(
                            "self.{} = Some(operation.upgrade({}::ID, &self.plugin));",
                            slot.field, slot.marker
                        ))
                        .body_line("self"),
                );
        }

        let builder_section = self.ctx.sections.render_sequence(&Section::Service(
            ServiceSection::BuilderImpl { service_name: name },
        ))?;
        Ok(builder_impl
            .item(builder_section)
            .method(self.build(name, slots)?)
            .method(self.build_unchecked(name, slots))
            .to_fragment())
    }

    /// Pattern-constrained types in the service closure, sorted.
    fn constrained_types(&self) -> Vec<String> {
        let model = self.ctx.codegen.model();
        let mut types: Vec<String> = Walker::new(model)
            .walk(self.ctx.codegen.service())
            .into_iter()
            .filter(|shape| matches!(shape.body, ShapeBody::String) && shape.traits.pattern().is_some())
            .filter_map(|shape| self.ctx.symbols.get(&shape.id))
            .filter(|symbol| symbol.is_generated())
            .map(|symbol| symbol.full_name())
            .collect();
        types.sort();
        types.dedup();
        types
    }

    fn build(&self, name: &str, slots: &[OperationSlot<'_>]) -> Result<Fn> {
        let server = self.ctx.server_crate();
        let prologue = self.ctx.sections.render_sequence(&Section::Service(
            ServiceSection::BuildPrologue { service_name: name },
        ))?;

        let mut build = Fn::new("build")
            .doc("Builds the service, failing when any operation has no handler.")
            .param(Param::receiver("self"))
            .returns(format!(
                "Result<{}<{}>, {}::MissingOperationsError>",
                name,
                self.route(),
                server
            ));
        for ty in self.constrained_types() {
            build = build.body_line(format!("{}::compile_regex();", ty));
        }
        let binding = if slots.is_empty() { "let" } else { "let mut" };
        build = build
            .body(prologue)
            .body_line(format!(
                "{} missing = {}::MissingOperationsError::new({:?});",
                binding, server, name
            ));
        for slot in slots {
            build = build.body(CodeFragment::braced(
                format!("if self.{}.is_none() {{", slot.field),
                vec![CodeFragment::line(format!(
                    "missing.push({}::ID, \".{}()\");",
                    slot.marker, slot.field
                ))],
            ));
        }
        build = build.body(CodeFragment::braced(
            "if !missing.is_empty() {",
            vec![CodeFragment::line("return Err(missing);")],
        ));

        let routes = slots
            .iter()
            .map(|slot| {
                CodeFragment::line(format!(
                    "(request_specs::{}(), self.{}),",
                    slot.field, slot.field
                ))
            })
            .collect();
        let routes_type = format!(
            "[({}::routing::RequestSpec, Option<{}>); {}]",
            server,
            self.route(),
            slots.len()
        );
        Ok(build
            .body(CodeFragment::block(
                format!("let routes: {} = [", routes_type),
                routes,
                Some("];".to_string()),
            ))
            .body_line("let router = routes")
            .body(CodeFragment::indent(vec![
                CodeFragment::line(".into_iter()"),
                CodeFragment::line(".filter_map(|(spec, route)| route.map(|route| (spec, route)))"),
                CodeFragment::line(".collect();"),
            ]))
            .body_line(format!("Ok({} {{ router }})", name)))
    }

    fn build_unchecked(&self, name: &str, slots: &[OperationSlot<'_>]) -> Fn {
        let server = self.ctx.server_crate();
        let routes = slots
            .iter()
            .map(|slot| {
                CodeFragment::block(
                    "(",
                    vec![
                        CodeFragment::line(format!("request_specs::{}(),", slot.field)),
                        CodeFragment::line(format!(
                            "self.{}.unwrap_or_else(|| {}::operation::FailOnMissingOperation.upgrade({}::ID, &plugin)),",
                            slot.field, server, slot.marker
                        )),
                    ],
                    Some("),".to_string()),
                )
            })
            .collect();
        let routes_type = format!(
            "[({}::routing::RequestSpec, {}); {}]",
            server,
            self.route(),
            slots.len()
        );
        // Without operations the plugin is never applied.
        let plugin = if slots.is_empty() {
            "let _ = self.plugin;"
        } else {
            "let plugin = self.plugin;"
        };
        Fn::new("build_unchecked")
            .doc("Builds the service; operations without a handler answer every request with a 500.")
            .param(Param::receiver("self"))
            .returns(format!("{}<{}>", name, self.route()))
            .body_line(plugin)
            .body(CodeFragment::block(
                format!("let routes: {} = [", routes_type),
                routes,
                Some("];".to_string()),
            ))
            .body_line("let router = routes")
            .body(CodeFragment::indent(vec![
                CodeFragment::line(".into_iter()"),
                CodeFragment::line(".collect();"),
            ]))
            .body_line(format!("{} {{ router }}", name))
    }

    fn request_specs(&self, slots: &[OperationSlot<'_>]) -> Result<CodeFragment> {
        let server = self.ctx.server_crate();
        let model = self.ctx.codegen.model();
        let mut functions = Vec::new();
        for slot in slots {
            let spec = self.ctx.protocol.request_spec(model, slot.shape)?;
            if !functions.is_empty() {
                functions.push(CodeFragment::blank());
            }
            functions.push(
                Fn::new(&slot.field)
                    .visibility(kiln_codegen::builder::Visibility::Crate)
                    .returns(format!("{}::routing::RequestSpec", server))
                    .body(spec.render(&server))
                    .to_fragment(),
            );
        }
        Ok(CodeFragment::braced("mod request_specs {", functions))
    }

    fn service_struct(&self, name: &str) -> Result<CodeFragment> {
        let server = self.ctx.server_crate();
        Ok(CodeFragment::sequence(vec![
            CodeFragment::rust_doc(self.service_doc()?),
            CodeFragment::line("#[derive(Debug, Clone)]"),
            CodeFragment::braced(
                format!("pub struct {}<S = {}::routing::Route> {{", name, server),
                vec![CodeFragment::line(format!(
                    "router: {}<S, {}>,",
                    self.ctx.protocol.router_type(self.ctx.codegen),
                    self.ctx.protocol.marker_struct(self.ctx.codegen)
                ))],
            ),
        ]))
    }

    fn service_impls(&self, name: &str, slots: &[OperationSlot<'_>]) -> CodeFragment {
        let server = self.ctx.server_crate();
        let router = format!(
            "{}<S, {}>",
            self.ctx.protocol.router_type(self.ctx.codegen),
            self.ctx.protocol.marker_struct(self.ctx.codegen)
        );

        let empty_slots = slots
            .iter()
            .map(|slot| CodeFragment::line(format!("{}: None,", slot.field)))
            .chain([
                CodeFragment::line("plugin,"),
                CodeFragment::line("_body: std::marker::PhantomData,"),
            ])
            .collect();
        let constructors = Impl::new(format!("{}<()>", name))
            .method(
                Fn::new("builder_with_plugins")
                    .doc("A builder applying `plugin` to every operation it registers.")
                    .generic("Body")
                    .generic(format!("Plugin: {}::operation::Plugin<Body>", server))
                    .param(Param::new("plugin", "Plugin"))
                    .returns(format!("{}Builder<Body, Plugin>", name))
                    .body(CodeFragment::braced(format!("{}Builder {{", name), empty_slots)),
            )
            .method(
                Fn::new("builder_without_plugins")
                    .doc("A builder registering operations unchanged.")
                    .generic("Body")
                    .returns(format!(
                        "{}Builder<Body, {}::operation::IdentityPlugin>",
                        name, server
                    ))
                    .body_line(format!(
                        "Self::builder_with_plugins({}::operation::IdentityPlugin)",
                        server
                    )),
            );

        let adapters = Impl::new(format!("{}<S>", name))
            .generic("S")
            .method(
                Fn::new("layer")
                    .doc("Wraps every route in `layer`.")
                    .generic("L")
                    .param(Param::receiver("self"))
                    .param(Param::new("layer", "&L"))
                    .returns(format!("{}<L::Service>", name))
                    .where_clause(format!("L: {}::routing::Layer<S>", server))
                    .body_line(format!(
                        "{} {{ router: self.router.map(|route| {}::routing::Layer::layer(layer, route)) }}",
                        name, server
                    )),
            )
            .method(
                Fn::new("boxed")
                    .doc("Erases the route type.")
                    .generic("Body")
                    .param(Param::receiver("self"))
                    .returns(format!("{}<{}::routing::Route<Body>>", name, server))
                    .where_clause(format!(
                        "S: {}::routing::Service<Body> + Send + Sync + 'static",
                        server
                    ))
                    .where_clause("Body: 'static")
                    .body_line(format!(
                        "{} {{ router: self.router.map({}::routing::Route::from_service) }}",
                        name, server
                    )),
            );

        let service = Impl::new(format!("{}<S>", name))
            .generic("S")
            .generic("Body")
            .for_trait(format!("{}::routing::Service<Body>", server))
            .where_clause(format!("{}: {}::routing::Service<Body>", router, server))
            .method(
                Fn::new("call")
                    .private()
                    .param(Param::receiver("&self"))
                    .param(Param::new("request", format!("{}::http::Request<Body>", server)))
                    .returns(format!("{s}::http::Response<{s}::bytes::Bytes>", s = server))
                    .body_line(format!(
                        "{}::routing::Service::call(&self.router, request)",
                        server
                    )),
            );

        CodeFragment::sequence(vec![
            constructors.to_fragment(),
            CodeFragment::blank(),
            adapters.to_fragment(),
            CodeFragment::blank(),
            service.to_fragment(),
        ])
    }
}
