//! Timeout enforcement.
//!
//! # Responsibilities
//! - Derive a deadline from the inbound request's budget
//! - Bound each outbound call by the time left on that deadline
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;

/// The request's time budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline exceeded after {0:?}")]
pub struct DeadlineExceeded(pub Duration);

/// Point in time by which a request must be finished.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    at: Instant,
}

impl Deadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        let started = Instant::now();
        Self {
            started,
            at: started + budget,
        }
    }

    /// Time left, or an error once the deadline has passed.
    pub fn remaining(&self) -> Result<Duration, DeadlineExceeded> {
        let now = Instant::now();
        if now >= self.at {
            Err(DeadlineExceeded(self.at - self.started))
        } else {
            Ok(self.at - now)
        }
    }

    /// Run `fut` under the time left.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, DeadlineExceeded> {
        let remaining = self.remaining()?;
        tokio::time::timeout(remaining, fut)
            .await
            .map_err(|_| DeadlineExceeded(self.at - self.started))
    }
}
