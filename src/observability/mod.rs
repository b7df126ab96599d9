//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! middleware / body:
//!     → tracing events (bypass reasons, rewrite decisions, stream failures)
//!     → metrics.rs (exchange outcome counters)
//!
//! Host binaries:
//!     → logging.rs installs the subscriber
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing a subscriber or recorder is up to the host
//! - Metric updates go through the `metrics` facade and cost nothing without a recorder

pub mod logging;
pub mod metrics;
