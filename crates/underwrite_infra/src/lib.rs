#![forbid(unsafe_code)]

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod status;
pub mod store;
pub mod telemetry;
pub mod validate;
pub mod wire;

pub use config::EngineConfig;
pub use engine::UnderwritingEngine;
pub use error::{ConfigError, PolicyError};
pub use status::{StatusReporter, StatusSummary};
pub use store::{ActivePolicy, PolicySnapshot, PolicySource, PolicyState, PolicyStore};
pub use telemetry::init_tracing;
pub use validate::decode_policy;
