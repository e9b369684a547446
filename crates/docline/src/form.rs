//! Text rendering of mode forms and outcomes.
//!
//! Forms are produced from a mode's parameter specs alone; no mode has
//! rendering code of its own.

use std::fmt::Write;

use docline_core::{
    AnalysisOutcome, ModeConfig, ModeRegistry, ParamValue, ParameterKind, ParameterSpec,
    ParameterValues, SourceFile, UNBOUNDED_SYMBOL,
};

fn value_text(spec: &ParameterSpec, value: &ParamValue) -> String {
    match value.as_bool() {
        Some(true) => "[x]".to_string(),
        Some(false) => "[ ]".to_string(),
        None => spec.display(value),
    }
}

fn domain_text(spec: &ParameterSpec) -> String {
    match spec.kind() {
        ParameterKind::IntegerRange {
            min,
            max,
            unbounded_above: Some(sentinel),
            ..
        } => format!("{min}..{max}, {UNBOUNDED_SYMBOL} from {sentinel}"),
        ParameterKind::IntegerRange { min, max, .. } => format!("{min}..{max}"),
        ParameterKind::Boolean { .. } => "on/off".to_string(),
        ParameterKind::Enum { options, .. } => options.join(" | "),
    }
}

/// Render the form for `mode` with the current `values`.
///
/// Missing values show the declared default.
pub fn render_mode(
    mode: &ModeConfig,
    values: &ParameterValues,
    source_file: Option<&SourceFile>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {} ({})",
        mode.ordinal(),
        mode.name(),
        mode.endpoint()
    );
    let _ = writeln!(out, "{}", mode.group());

    let label_width = mode
        .parameters()
        .iter()
        .map(|spec| spec.label().chars().count())
        .max()
        .unwrap_or(0);
    let id_width = mode.parameter_ids().map(str::len).max().unwrap_or(0);

    for spec in mode.parameters() {
        let value = values
            .get(spec.id())
            .cloned()
            .unwrap_or_else(|| spec.default_value());
        let _ = writeln!(
            out,
            "  {:<label_width$}  {:<id_width$}  {:>8}  ({})",
            spec.label(),
            spec.id(),
            value_text(spec, &value),
            domain_text(spec),
        );
    }

    let file = source_file
        .map(|f| f.path().display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let _ = writeln!(out, "  File: {file}");
    out
}

/// One line per mode: index, name and endpoint
pub fn render_mode_list(registry: &ModeRegistry) -> String {
    let mut out = String::new();
    for mode in registry.list_modes() {
        let _ = writeln!(
            out,
            "{}  {:<24} {:<18} ({})",
            mode.ordinal(),
            mode.name(),
            mode.endpoint(),
            mode.endpoint().alias()
        );
    }
    out
}

/// Human summary of a completed dispatch
pub fn render_outcome(outcome: &AnalysisOutcome) -> String {
    let mut out = String::new();
    match (&outcome.error, outcome.status_code) {
        (Some(error), _) => {
            let _ = writeln!(out, "{}: analysis failed: {}", outcome.mode, error);
        }
        (None, Some(status)) if outcome.succeeded => {
            let _ = writeln!(out, "{}: analysis completed (HTTP {})", outcome.mode, status);
        }
        (None, Some(status)) => {
            let _ = writeln!(out, "{}: analysis failed (HTTP {})", outcome.mode, status);
        }
        (None, None) => {
            let _ = writeln!(out, "{}: analysis failed", outcome.mode);
        }
    }

    if let Some(reply) = &outcome.reply {
        if !reply.message.is_empty() {
            let _ = writeln!(out, "  {}", reply.message);
        }
        if !reply.groups.is_empty() {
            let _ = writeln!(out, "  {} duplicate group(s)", reply.groups.len());
        }
        if !reply.archetypes.is_empty() {
            let _ = writeln!(out, "  {} archetype(s)", reply.archetypes.len());
        }
        if let Some(results) = &reply.results_file {
            let _ = writeln!(out, "  Results: {results}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use docline_core::{BackendReply, Endpoint, TransportError};

    #[test]
    fn test_every_mode_renders_all_parameters() {
        let registry = ModeRegistry::new();
        for mode in registry.list_modes() {
            let form = render_mode(mode, &ParameterValues::new(), None);
            assert!(form.contains(mode.group()));
            for spec in mode.parameters() {
                assert!(form.contains(spec.id()), "{} missing {}", mode.name(), spec.id());
                assert!(form.contains(spec.label()));
            }
            assert!(form.contains("File: (none)"));
        }
    }

    #[test]
    fn test_unbounded_value_shows_infinity() {
        let registry = ModeRegistry::new();
        let mode = registry.find("interactive").unwrap();
        let values = ParameterValues::new().with("max_clone_slider", 150);
        let form = render_mode(mode, &values, None);

        let line = form
            .lines()
            .find(|line| line.contains("max_clone_slider"))
            .unwrap();
        assert!(line.contains("∞"));
        assert!(line.contains("2..200, ∞ from 100"));
        assert!(!line.contains("150"));
    }

    #[test]
    fn test_checkbox_values_render_as_boxes() {
        let registry = ModeRegistry::new();
        let mode = registry.find("interactive").unwrap();
        let line_for = |on: bool| {
            let values = ParameterValues::new().with("extension_checkbox", on);
            render_mode(mode, &values, None)
                .lines()
                .find(|line| line.contains("extension_checkbox"))
                .map(str::to_string)
                .unwrap()
        };
        assert!(line_for(true).contains("[x]"));
        assert!(line_for(false).contains("[ ]"));
        assert!(line_for(false).contains("(on/off)"));
    }

    #[test]
    fn test_mode_list() {
        let list = render_mode_list(&ModeRegistry::new());
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("0  Automatic mode"));
        assert!(lines[3].contains("heuristic_finder"));
    }

    #[test]
    fn test_outcome_text() {
        let ok = AnalysisOutcome::from_status(
            Endpoint::NgramFinder,
            200,
            Some(BackendReply {
                status: "ok".into(),
                message: "Found clones".into(),
                groups: [("1".to_string(), vec!["a".to_string()])].into(),
                archetypes: Default::default(),
                results_file: Some("report.html".into()),
            }),
        );
        let text = render_outcome(&ok);
        assert!(text.starts_with("ngram_finder: analysis completed (HTTP 200)"));
        assert!(text.contains("1 duplicate group(s)"));
        assert!(text.contains("Results: report.html"));

        let failed = AnalysisOutcome::from_status(Endpoint::NgramFinder, 503, None);
        assert!(render_outcome(&failed).contains("failed (HTTP 503)"));

        let refused = AnalysisOutcome::from_transport_error(
            Endpoint::AutomaticMode,
            TransportError::Connect {
                url: "http://localhost:8080/automatic_mode".into(),
                message: "connection refused".into(),
            },
        );
        assert!(render_outcome(&refused).contains("could not connect"));
    }
}
