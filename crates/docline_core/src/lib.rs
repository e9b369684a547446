//! Mode configuration and dispatch contract for the docline clone-detection backend.
//!
//! A front-end picks one of four analysis modes, adjusts its parameters and
//! hands the result to the backend. This crate owns that contract:
//! - the parameter schema of every mode (`model`, `registry`)
//! - validation and clamping into a wire payload (`builder`)
//! - the HTTP exchange with the backend and its outcome (`dispatch`, `request`)
//!
//! ```ignore
//! use docline_core::{AnalysisDispatcher, ConfigurationBuilder, Dispatch, DispatcherConfig, ModeRegistry};
//!
//! let mode = ModeRegistry::global().mode_at(2)?;
//! let request = ConfigurationBuilder::new(mode)
//!     .set("source_language", "Russian")
//!     .build()?;
//! let dispatcher = AnalysisDispatcher::new(DispatcherConfig::default())?;
//! let outcome = dispatcher.dispatch(&request);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod builder;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod registry;
pub mod request;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use builder::{BuildReport, ConfigurationBuilder, ValidationClampedWarning};
pub use dispatch::{AnalysisDispatcher, DEFAULT_BASE_URL, Dispatch, DispatcherConfig};
pub use error::{BuildError, RegistryError, SourceFileError, TransportError};
pub use model::{
    Endpoint, ModeConfig, ParamValue, ParameterKind, ParameterSpec, ParameterValues,
    UNBOUNDED_SYMBOL,
};
pub use registry::ModeRegistry;
pub use request::{AnalysisOutcome, AnalysisRequest, BackendReply, Payload, SourceFile};
