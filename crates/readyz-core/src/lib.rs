//! readyz core: the error surface and the readiness gate shared by the server
//! and its tests.
//!
//! This crate carries no HTTP or runtime dependencies. Everything in here is a
//! pure function of its inputs (plus the monotonic clock), so the server only
//! has to wire it to routes.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod readiness;

/// Error type and its result alias.
pub use error::{Result, ReadyzError};
pub use readiness::{Readiness, ReadinessCheck, ReadinessGate};
