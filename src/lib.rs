//! configsmith library
//!
//! Materializes JSON configuration documents from default templates, the
//! previously persisted files, and environment-variable overrides.
//!
//! ```no_run
//! let report = configsmith::materialize_configuration()?;
//! for err in report.rejected() {
//!     eprintln!("Ignored invalid override: {}", err);
//! }
//! # Ok::<(), configsmith::error::Error>(())
//! ```

pub mod binding;
pub mod catalog;
pub mod cli;
pub mod coerce;
pub mod config;
pub mod document;
pub mod env;
pub mod error;
pub mod format;
pub mod materialize;
pub mod store;

pub use materialize::{MaterializeReport, Materializer, materialize_configuration};
