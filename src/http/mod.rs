//! HTTP pipeline integration.
//!
//! # Data Flow
//! ```text
//! request
//!     → middleware.rs (gate on Accept, resolve public URL, snapshot, rewrite)
//!         → negotiate.rs (media type gating)
//!     → inner service (sees the internal URL)
//!     → interceptor.rs (response held before the first byte is sent)
//!     → middleware.rs (restore, origin, ignore check)
//!         → headers.rs (header value rewrite)
//!         → stream (body substitution)
//!     → client
//! ```

pub mod headers;
pub mod interceptor;
pub mod middleware;
pub mod negotiate;

pub use interceptor::{InterceptFuture, InterceptHandler, Intercepted};
pub use middleware::{Camouflage, CamouflageLayer, Interception};
pub use negotiate::accepts;
