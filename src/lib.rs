//! Zipcode weather library.
//!
//! Two HTTP services that turn a Brazilian postal code into the current
//! temperature of its locality, with one distributed trace per request.

// Domain
pub mod convert;
pub mod error;
pub mod model;
pub mod zipcode;

// Request handling
pub mod http;
pub mod providers;
pub mod services;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod trace;

pub use config::{ServiceConfig, ServiceRole};
pub use error::{ErrorKind, PipelineError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use model::ComposedResponse;
