//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or RewriteConfig literal
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, regex / MIME / URL compilation)
//!     → Settings (validated, immutable)
//!     → shared via Arc with every request
//! ```
//!
//! # Design Decisions
//! - Config is immutable once compiled; a new layer is built to change it
//! - All fields have defaults to allow minimal configs
//! - A config without `url` is valid and means "disabled"

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{RewriteConfig, Settings};
pub use validation::ValidationError;
