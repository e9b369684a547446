//! Turns the parameter values of a mode into a validated [`AnalysisRequest`].
//!
//! ```ignore
//! use docline_core::{ConfigurationBuilder, ModeRegistry};
//!
//! let mode = ModeRegistry::global().find("automatic")?;
//! let request = ConfigurationBuilder::new(mode)
//!     .set("length_slider", 25) // clamped to 20
//!     .set("convert_checkbox", true)
//!     .build()?;
//! ```
//!
//! Rules applied per declared parameter:
//! - missing values fall back to the declared default;
//! - integers outside `[min, max]` are clamped to the nearest bound;
//! - booleans pass through;
//! - enum values must be one of the declared options.
//!
//! Display transforms (the unbounded sentinel) are never applied here.

use std::fmt;

use crate::error::BuildError;
use crate::model::{ModeConfig, ParamValue, ParameterKind, ParameterSpec, ParameterValues};
use crate::request::{AnalysisRequest, Payload, SourceFile};

/// Non-fatal notice that an integer was forced into range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationClampedWarning {
    pub id: String,
    pub requested: i64,
    pub applied: i64,
}

impl fmt::Display for ValidationClampedWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` clamped from {} to {}",
            self.id, self.requested, self.applied
        )
    }
}

/// Result of normalizing a single value against its spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub value: ParamValue,
    pub clamped: Option<ValidationClampedWarning>,
}

/// A built request plus any clamping that happened on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub request: AnalysisRequest,
    pub warnings: Vec<ValidationClampedWarning>,
}

/// Build the request for `mode` from `values`.
pub fn build(mode: &ModeConfig, values: &ParameterValues) -> Result<AnalysisRequest, BuildError> {
    ConfigurationBuilder::new(mode)
        .values(values.clone())
        .build()
}

/// Check one value against its spec, clamping integers into range.
pub fn normalize(spec: &ParameterSpec, value: &ParamValue) -> Result<Normalized, BuildError> {
    match (spec.kind(), value) {
        (ParameterKind::IntegerRange { min, max, .. }, ParamValue::Integer(requested)) => {
            let applied = (*requested).clamp(*min, *max);
            let clamped = (applied != *requested).then(|| ValidationClampedWarning {
                id: spec.id().to_string(),
                requested: *requested,
                applied,
            });
            Ok(Normalized {
                value: ParamValue::Integer(applied),
                clamped,
            })
        }
        (ParameterKind::Boolean { .. }, ParamValue::Boolean(_)) => Ok(Normalized {
            value: value.clone(),
            clamped: None,
        }),
        (ParameterKind::Enum { options, .. }, ParamValue::Choice(choice)) => {
            if options.iter().any(|option| option == choice) {
                Ok(Normalized {
                    value: value.clone(),
                    clamped: None,
                })
            } else {
                Err(BuildError::InvalidEnumValue {
                    id: spec.id().to_string(),
                    value: choice.clone(),
                    options: options.clone(),
                })
            }
        }
        _ => Err(BuildError::TypeMismatch {
            id: spec.id().to_string(),
            expected: spec.kind_name(),
            found: value.kind_name(),
        }),
    }
}

/// Fluent builder for one mode's request
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder<'a> {
    mode: &'a ModeConfig,
    values: ParameterValues,
    source_file: Option<SourceFile>,
}

impl<'a> ConfigurationBuilder<'a> {
    pub fn new(mode: &'a ModeConfig) -> Self {
        Self {
            mode,
            values: ParameterValues::new(),
            source_file: None,
        }
    }

    /// Replace all collected values
    pub fn values(mut self, values: ParameterValues) -> Self {
        self.values = values;
        self
    }

    pub fn set(mut self, id: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.values.set(id, value);
        self
    }

    pub fn source_file(mut self, file: SourceFile) -> Self {
        self.source_file = Some(file);
        self
    }

    pub fn build(self) -> Result<AnalysisRequest, BuildError> {
        self.build_report().map(|report| report.request)
    }

    pub fn build_report(self) -> Result<BuildReport, BuildError> {
        let mut payload = Payload::new();
        let mut warnings = Vec::new();

        for spec in self.mode.parameters() {
            let normalized = match self.values.get(spec.id()) {
                Some(value) => normalize(spec, value)?,
                None => Normalized {
                    value: spec.default_value(),
                    clamped: None,
                },
            };
            if let Some(warning) = normalized.clamped {
                tracing::warn!(
                    mode = %self.mode.endpoint(),
                    parameter = %warning.id,
                    requested = warning.requested,
                    applied = warning.applied,
                    "Parameter value clamped into range"
                );
                warnings.push(warning);
            }
            payload.insert(spec.id().to_string(), normalized.value);
        }

        for (id, _) in self.values.iter() {
            if self.mode.parameter(id).is_none() {
                tracing::debug!(mode = %self.mode.endpoint(), parameter = id, "Ignoring undeclared parameter");
            }
        }

        tracing::debug!(mode = %self.mode.endpoint(), keys = payload.len(), "Built analysis payload");

        Ok(BuildReport {
            request: AnalysisRequest::new(self.mode.endpoint(), payload, self.source_file),
            warnings,
        })
    }
}
