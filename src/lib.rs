//! Operational support for ML workflows.
//!
//! Three loosely coupled components:
//! - [`error`]: a typed error taxonomy with captured context and a durable
//!   per-developer exception log.
//! - [`logging`]: six file-backed log channels per developer with fixed
//!   severity floors and plain-text record templates.
//! - [`persistence`]: save/load of serializable models under versioned
//!   file names, with failures translated into the typed errors.
//!
//! Paths are wired together through [`config::Config`]; the crate's own
//! diagnostics go through `tracing` (see [`config::init_tracing`]).

pub mod config;
pub mod error;
pub mod logging;
pub mod persistence;

pub use config::{init_tracing, Config};
pub use error::{ErrorContext, ExceptionLog, MlError, Result};
pub use logging::{ChannelName, DeveloperChannels, LoggerRegistry, Severity};
pub use persistence::{ModelMetadata, ModelStore};
