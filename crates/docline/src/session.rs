//! Interactive selection state: active mode, its values and the chosen file.

use std::path::PathBuf;

use docline_core::builder::normalize;
use docline_core::{
    AnalysisRequest, BuildError, ConfigurationBuilder, ModeConfig, ModeRegistry, ParamValue,
    ParameterKind, ParameterSpec, ParameterValues, RegistryError, SourceFile, SourceFileError,
    ValidationClampedWarning,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Registry(RegistryError),
    UnknownParameter { mode: String, id: String },
    InvalidValue { id: String, raw: String, expected: String },
    Build(BuildError),
    SourceFile(SourceFileError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Registry(e) => write!(f, "{}", e),
            SessionError::UnknownParameter { mode, id } => {
                write!(f, "{} has no parameter `{}`", mode, id)
            }
            SessionError::InvalidValue { id, raw, expected } => {
                write!(f, "Invalid value {:?} for `{}`: expected {}", raw, id, expected)
            }
            SessionError::Build(e) => write!(f, "{}", e),
            SessionError::SourceFile(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<RegistryError> for SessionError {
    fn from(e: RegistryError) -> Self {
        SessionError::Registry(e)
    }
}

impl From<BuildError> for SessionError {
    fn from(e: BuildError) -> Self {
        SessionError::Build(e)
    }
}

impl From<SourceFileError> for SessionError {
    fn from(e: SourceFileError) -> Self {
        SessionError::SourceFile(e)
    }
}

/// Parse user text into a value of the kind `spec` declares.
///
/// Integers accept `inf`/`∞` on unbounded sliders, booleans accept
/// `true/false/on/off/yes/no/1/0`, options match case-insensitively and
/// come back in their canonical spelling.
pub fn parse_value(spec: &ParameterSpec, raw: &str) -> Result<ParamValue, SessionError> {
    let text = raw.trim();
    let invalid = |expected: String| SessionError::InvalidValue {
        id: spec.id().to_string(),
        raw: raw.to_string(),
        expected,
    };

    match spec.kind() {
        ParameterKind::IntegerRange {
            min,
            max,
            unbounded_above,
            ..
        } => {
            if unbounded_above.is_some() && matches!(text, "inf" | "∞") {
                return Ok(ParamValue::Integer(*max));
            }
            text.parse::<i64>()
                .map(ParamValue::Integer)
                .map_err(|_| invalid(format!("an integer in {}..={}", min, max)))
        }
        ParameterKind::Boolean { .. } => match text.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(ParamValue::Boolean(true)),
            "false" | "off" | "no" | "0" => Ok(ParamValue::Boolean(false)),
            _ => Err(invalid("on or off".to_string())),
        },
        ParameterKind::Enum { options, .. } => options
            .iter()
            .find(|option| option.eq_ignore_ascii_case(text))
            .map(|option| ParamValue::Choice(option.clone()))
            .ok_or_else(|| invalid(format!("one of {}", options.join(", ")))),
    }
}

#[derive(Debug, Clone)]
pub struct Session<'r> {
    registry: &'r ModeRegistry,
    active: usize,
    values: ParameterValues,
    source_file: Option<SourceFile>,
}

impl<'r> Session<'r> {
    /// Start on the first mode with its defaults.
    pub fn new(registry: &'r ModeRegistry) -> Self {
        let values = registry
            .mode_at(0)
            .map(ParameterValues::defaults_for)
            .unwrap_or_default();
        Self {
            registry,
            active: 0,
            values,
            source_file: None,
        }
    }

    pub fn registry(&self) -> &'r ModeRegistry {
        self.registry
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn mode(&self) -> Result<&'r ModeConfig, SessionError> {
        Ok(self.registry.mode_at(self.active)?)
    }

    pub fn values(&self) -> &ParameterValues {
        &self.values
    }

    pub fn source_file(&self) -> Option<&SourceFile> {
        self.source_file.as_ref()
    }

    /// Switch modes by index. Values reset to the new mode's defaults.
    pub fn select_mode(&mut self, index: usize) -> Result<&'r ModeConfig, SessionError> {
        let mode = self.registry.mode_at(index)?;
        self.activate(mode);
        Ok(mode)
    }

    /// Switch modes by name, endpoint or alias.
    pub fn select_mode_by_name(&mut self, name: &str) -> Result<&'r ModeConfig, SessionError> {
        let mode = self.registry.find(name)?;
        self.activate(mode);
        Ok(mode)
    }

    fn activate(&mut self, mode: &ModeConfig) {
        self.active = mode.ordinal();
        self.values = ParameterValues::defaults_for(mode);
        tracing::debug!(mode = %mode.endpoint(), "Mode selected");
    }

    /// Set one parameter of the active mode from user text.
    ///
    /// Integers are held within bounds the way a slider would; the
    /// returned warning says when that happened.
    pub fn set(
        &mut self,
        id: &str,
        raw: &str,
    ) -> Result<Option<ValidationClampedWarning>, SessionError> {
        let mode = self.mode()?;
        let spec = mode
            .parameter(id)
            .ok_or_else(|| SessionError::UnknownParameter {
                mode: mode.name().to_string(),
                id: id.to_string(),
            })?;

        let normalized = normalize(spec, &parse_value(spec, raw)?)?;
        self.values.set(id, normalized.value);
        Ok(normalized.clamped)
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> Result<&SourceFile, SessionError> {
        let file = SourceFile::new(path)?;
        tracing::debug!(path = %file.path().display(), "Source file selected");
        Ok(self.source_file.insert(file))
    }

    pub fn clear_file(&mut self) {
        self.source_file = None;
    }

    /// Build the request for the active mode.
    pub fn request(&self) -> Result<AnalysisRequest, SessionError> {
        let mut builder = ConfigurationBuilder::new(self.mode()?).values(self.values.clone());
        if let Some(file) = &self.source_file {
            builder = builder.source_file(file.clone());
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docline_core::Endpoint;

    #[test]
    fn test_starts_on_first_mode_with_defaults() {
        let registry = ModeRegistry::new();
        let session = Session::new(&registry);
        assert_eq!(session.active_index(), 0);
        assert_eq!(session.values().get("length_slider"), Some(&ParamValue::Integer(5)));
        assert!(session.source_file().is_none());
    }

    #[test]
    fn test_mode_change_resets_values() {
        let registry = ModeRegistry::new();
        let mut session = Session::new(&registry);
        session.set("length_slider", "12").unwrap();

        session.select_mode(1).unwrap();
        session.select_mode_by_name("automatic").unwrap();
        assert_eq!(session.values().get("length_slider"), Some(&ParamValue::Integer(5)));
    }

    #[test]
    fn test_set_clamps_like_a_slider() {
        let registry = ModeRegistry::new();
        let mut session = Session::new(&registry);
        let warning = session.set("archetype_slider", "0").unwrap().unwrap();
        assert_eq!(warning.applied, 1);
        assert_eq!(session.values().get("archetype_slider"), Some(&ParamValue::Integer(1)));
        assert!(session.set("length_slider", "20").unwrap().is_none());
    }

    #[test]
    fn test_set_parses_each_kind() {
        let registry = ModeRegistry::new();
        let mut session = Session::new(&registry);
        session.select_mode_by_name("ngram").unwrap();

        session.set("source_language", "russian").unwrap();
        session.set("max_edit_slider", "∞").unwrap();
        assert_eq!(
            session.values().get("source_language"),
            Some(&ParamValue::Choice("Russian".into()))
        );
        assert_eq!(session.values().get("max_edit_slider"), Some(&ParamValue::Integer(200)));

        session.select_mode(3).unwrap();
        session.set("extention_point_checkbox", "on").unwrap();
        assert_eq!(
            session.request().unwrap().payload()["extention_point_checkbox"],
            ParamValue::Boolean(true)
        );
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let registry = ModeRegistry::new();
        let mut session = Session::new(&registry);
        assert!(matches!(
            session.set("min_group_slider", "3"),
            Err(SessionError::UnknownParameter { .. })
        ));
        assert!(matches!(
            session.set("length_slider", "seven"),
            Err(SessionError::InvalidValue { .. })
        ));
        assert!(matches!(
            session.set("convert_checkbox", "maybe"),
            Err(SessionError::InvalidValue { .. })
        ));
        // Only unbounded sliders take infinity
        assert!(session.set("length_slider", "inf").is_err());
        session.select_mode_by_name("ngram").unwrap();
        assert!(session.set("source_language", "French").is_err());
    }

    #[test]
    fn test_out_of_range_index() {
        let registry = ModeRegistry::new();
        let mut session = Session::new(&registry);
        assert!(matches!(
            session.select_mode(4),
            Err(SessionError::Registry(RegistryError::OutOfRange { .. }))
        ));
        assert_eq!(session.active_index(), 0);
    }

    #[test]
    fn test_request_carries_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.md");
        std::fs::write(&path, "# Guide").unwrap();

        let registry = ModeRegistry::new();
        let mut session = Session::new(&registry);
        session.select_mode(1).unwrap();
        assert!(session.select_file(dir.path().join("guide.pdf")).is_err());
        session.select_file(&path).unwrap();

        let request = session.request().unwrap();
        assert_eq!(request.mode(), Endpoint::InteractiveMode);
        assert_eq!(request.source_file().map(|f| f.path()), Some(path.as_path()));
        assert!(!request.payload().contains_key("file_path"));

        session.clear_file();
        assert!(session.request().unwrap().source_file().is_none());
    }
}
