//! Parameter schema and runtime values

mod mode;
mod parameter;
mod value;

pub use mode::{Endpoint, ModeConfig};
pub use parameter::{ParameterKind, ParameterSpec, UNBOUNDED_SYMBOL};
pub use value::{ParamValue, ParameterValues};
