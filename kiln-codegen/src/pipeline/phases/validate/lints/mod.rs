//! Built-in lints for model validation.

mod empty_service;
mod operation_naming;
mod protocol;
mod streaming_target;

pub use empty_service::EmptyServiceLint;
pub use operation_naming::OperationNamingLint;
pub use protocol::ProtocolLint;
pub use streaming_target::StreamingTargetLint;
