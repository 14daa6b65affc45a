//! Compiles a design-token document into one output directory per namespace:
//! a `variables.css` stylesheet and, when enabled, `tokens.js`/`tokens.d.ts`
//! with the text tokens.

pub mod config;
pub mod error;
pub mod loader;
pub mod orchestrator;

pub use config::{BuildConfig, NamespaceSettings};
pub use error::{ConfigError, NamespaceError};
pub use orchestrator::{run, NamespaceFailure, NamespaceJob, RunReport};
