//! Declarative description of one tunable parameter.

use super::value::ParamValue;

/// Rendered in place of integers at or above the unbounded sentinel
pub const UNBOUNDED_SYMBOL: &str = "∞";

/// The shape of values a parameter accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterKind {
    /// Slider-like integer in `[min, max]`.
    ///
    /// `unbounded_above` is a display sentinel: values at or above it are
    /// shown as unbounded but still sent as the literal number.
    IntegerRange {
        min: i64,
        max: i64,
        default: i64,
        unbounded_above: Option<i64>,
    },
    /// Checkbox
    Boolean { default: bool },
    /// Fixed, ordered set of string options
    Enum {
        options: Vec<String>,
        default: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    id: String,
    label: String,
    kind: ParameterKind,
}

impl ParameterSpec {
    pub fn integer(
        id: impl Into<String>,
        label: impl Into<String>,
        min: i64,
        max: i64,
        default: i64,
    ) -> Self {
        debug_assert!(min <= default && default <= max, "default outside range");
        Self {
            id: id.into(),
            label: label.into(),
            kind: ParameterKind::IntegerRange {
                min,
                max,
                default,
                unbounded_above: None,
            },
        }
    }

    pub fn boolean(id: impl Into<String>, label: impl Into<String>, default: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ParameterKind::Boolean { default },
        }
    }

    pub fn choice<S: Into<String>>(
        id: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        default: usize,
    ) -> Self {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        debug_assert!(default < options.len(), "default option out of range");
        Self {
            id: id.into(),
            label: label.into(),
            kind: ParameterKind::Enum { options, default },
        }
    }

    /// Mark an integer parameter as displaying "unbounded" at or above `sentinel`.
    /// No effect on other kinds.
    pub fn unbounded_above(mut self, sentinel: i64) -> Self {
        if let ParameterKind::IntegerRange {
            unbounded_above, ..
        } = &mut self.kind
        {
            *unbounded_above = Some(sentinel);
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    /// Name of the value kind this parameter expects
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ParameterKind::IntegerRange { .. } => "integer",
            ParameterKind::Boolean { .. } => "boolean",
            ParameterKind::Enum { .. } => "string",
        }
    }

    pub fn default_value(&self) -> ParamValue {
        match &self.kind {
            ParameterKind::IntegerRange { default, .. } => ParamValue::Integer(*default),
            ParameterKind::Boolean { default } => ParamValue::Boolean(*default),
            ParameterKind::Enum { options, default } => {
                ParamValue::Choice(options.get(*default).cloned().unwrap_or_default())
            }
        }
    }

    /// Inclusive bounds for integer parameters
    pub fn bounds(&self) -> Option<(i64, i64)> {
        match self.kind {
            ParameterKind::IntegerRange { min, max, .. } => Some((min, max)),
            _ => None,
        }
    }

    /// Options for enum parameters
    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            ParameterKind::Enum { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Presentation form of `value`. Never used when building payloads.
    pub fn display(&self, value: &ParamValue) -> String {
        match (&self.kind, value) {
            (
                ParameterKind::IntegerRange {
                    unbounded_above: Some(sentinel),
                    ..
                },
                ParamValue::Integer(v),
            ) if v >= sentinel => UNBOUNDED_SYMBOL.to_string(),
            _ => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unbounded_sentinel() {
        let spec = ParameterSpec::integer("max_clone_slider", "Max", 2, 200, 50).unbounded_above(100);
        assert_eq!(spec.display(&ParamValue::Integer(99)), "99");
        assert_eq!(spec.display(&ParamValue::Integer(100)), UNBOUNDED_SYMBOL);
        assert_eq!(spec.display(&ParamValue::Integer(200)), UNBOUNDED_SYMBOL);
    }

    #[test]
    fn test_display_without_sentinel_is_literal() {
        let spec = ParameterSpec::integer("length_slider", "Length", 1, 20, 5);
        assert_eq!(spec.display(&ParamValue::Integer(150)), "150");
    }

    #[test]
    fn test_unbounded_ignored_for_non_integer() {
        let spec = ParameterSpec::boolean("convert_checkbox", "Convert", false).unbounded_above(100);
        assert_eq!(spec.kind(), &ParameterKind::Boolean { default: false });
    }

    #[test]
    fn test_choice_default_value() {
        let spec = ParameterSpec::choice("source_language", "Language", ["English", "Russian"], 1);
        assert_eq!(spec.default_value(), ParamValue::Choice("Russian".into()));
        assert_eq!(spec.kind_name(), "string");
    }
}
