//! Command-line front-end for the docline clone-detection backend
//!
//! This crate wires the configuration contract of `docline_core` to a
//! terminal session:
//! - Settings from flags, environment and `config.yaml`
//! - A line-driven shell with schema-rendered mode forms
//! - Background dispatch so input stays responsive
//! - An optional locally spawned backend process

// ============================================================================
// Modules
// ============================================================================

pub mod backend;
pub mod config;
pub mod form;
pub mod logging;
pub mod session;
pub mod shell;
pub mod worker;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{Overrides, Settings};
pub use logging::init_logging;
pub use session::Session;
pub use worker::DispatchWorker;
