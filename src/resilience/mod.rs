//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request accepted
//!     → timeouts.rs (Deadline from the request budget)
//!     → every outbound call runs under the remaining budget
//!     → tower-http TimeoutLayer as a backstop for the whole handler
//! ```
//!
//! # Design Decisions
//! - No retries: each remote call is attempted once
//! - One deadline per inbound request, shared by all of its outbound calls
//! - Dropping the handler future (client gone) drops in-flight calls with it

pub mod timeouts;

pub use timeouts::{Deadline, DeadlineExceeded};
