//! Built-in decorators and their static registry.

mod s3;
mod sdk_config;

use std::sync::Arc;

use eyre::{Result, bail};
use kiln_codegen::customize::{CombinedDecorator, Decorator};
use kiln_manifest::DecoratorSettings;

pub use s3::{S3Decorator, S3ProtocolOverride};
pub use sdk_config::{SdkConfigDecorator, copy_field};

/// Every built-in decorator, in registration order.
pub fn builtin_decorators() -> Vec<Arc<dyn Decorator>> {
    vec![Arc::new(SdkConfigDecorator), Arc::new(S3Decorator)]
}

/// Registry names of the built-in decorators.
pub fn builtin_names() -> Vec<&'static str> {
    builtin_decorators().iter().map(|d| d.name()).collect()
}

/// The decorators taking part in a run.
///
/// Without an `enabled` list every built-in runs. Names keep their
/// registration order regardless of the order they are listed in.
pub fn select_decorators(settings: &DecoratorSettings) -> Result<CombinedDecorator> {
    let builtins = builtin_decorators();
    let selected = match &settings.enabled {
        None => builtins,
        Some(enabled) => {
            for name in enabled {
                if !builtins.iter().any(|d| d.name() == name) {
                    bail!(
                        "unknown decorator `{}` (available: {})",
                        name,
                        builtin_names().join(", ")
                    );
                }
            }
            builtins
                .into_iter()
                .filter(|d| enabled.iter().any(|name| name == d.name()))
                .collect()
        }
    };
    let combined = CombinedDecorator::new(selected)?;
    tracing::debug!(decorators = ?combined.names(), "selected decorators");
    Ok(combined)
}
