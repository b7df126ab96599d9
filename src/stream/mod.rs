//! Streaming body transformation.
//!
//! # Responsibilities
//! - Replace a literal byte string in a chunked body (substitute.rs)
//! - Wrap a response body so the replacement happens while it streams (body.rs)
//!
//! # Design Decisions
//! - Pull-based: nothing is read from upstream before the client asks for it
//! - Bounded memory: only a partial match is ever held back
//! - Errors end the body; the response is never replayed

pub mod body;
pub mod substitute;

pub use body::RewriteBody;
pub use substitute::Substitution;
