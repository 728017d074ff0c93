//! Per-run code generation context.

use std::sync::Arc;

use kiln_core::{to_pascal_case, to_snake_case};
use kiln_manifest::{CodegenSettings, Manifest, Mode, RuntimeConfig};
use kiln_model::{Model, Shape, ShapeId, ShapeType};

use crate::CodegenError;

/// Everything a generator or decorator may consult during one run.
///
/// Created once at the start of a run and passed explicitly; the model is
/// shared read-only and only replaced wholesale by the transform phase.
#[derive(Debug, Clone)]
pub struct CodegenContext {
    model: Arc<Model>,
    settings: CodegenSettings,
    runtime: RuntimeConfig,
}

impl CodegenContext {
    pub fn new(model: Model, manifest: &Manifest) -> Self {
        Self {
            model: Arc::new(model),
            settings: manifest.codegen.clone(),
            runtime: manifest.runtime.clone(),
        }
    }

    /// The same context over a transformed model.
    pub fn with_model(self, model: Model) -> Self {
        Self {
            model: Arc::new(model),
            ..self
        }
    }

    pub fn replace_model(&mut self, model: Model) {
        self.model = Arc::new(model);
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn service(&self) -> &ShapeId {
        &self.settings.service
    }

    pub fn service_shape(&self) -> Result<&Shape, CodegenError> {
        Ok(self.model.expect_kind(self.service(), ShapeType::Service)?)
    }

    /// Operations of the service, sorted by id.
    pub fn operations(&self) -> Result<Vec<&Shape>, CodegenError> {
        Ok(self.model.operations(self.service())?)
    }

    /// Type name of the generated service (`Weather`).
    pub fn service_name(&self) -> String {
        to_pascal_case(self.service().name())
    }

    pub fn settings(&self) -> &CodegenSettings {
        &self.settings
    }

    pub fn runtime(&self) -> &RuntimeConfig {
        &self.runtime
    }

    pub fn mode(&self) -> Mode {
        self.settings.mode
    }

    /// Rust path root of a runtime crate (`kiln_server`).
    pub fn runtime_crate(&self, suffix: &str) -> String {
        self.runtime.crate_ident(suffix)
    }

    /// Field and setter name for an operation (`GetCity` -> `get_city`).
    pub fn operation_field_name(operation: &ShapeId) -> String {
        to_snake_case(operation.name())
    }
}
