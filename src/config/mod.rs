//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! role defaults (entry / resolution)
//!     → loader.rs (optional TOML file, then environment overrides)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → consumed once at startup to build clients, tracer and router
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow running with environment only
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, ServiceConfig, ServiceRole, TelemetryConfig,
    TimeoutConfig, UpstreamConfig,
};
