//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → crate::services (entry / resolution handlers)
//!     → client.rs (traced outbound calls)
//!     → Send to client
//! ```

pub mod client;
pub mod server;

pub use client::{CallError, CallResponse, OutboundClient};
pub use server::HttpServer;
