//! Tests for registry lookups and request building
//!
//! These tests verify:
//! - Mode index to endpoint routing
//! - Default filling for every mode
//! - Clamping and enum validation on concrete inputs

use crate::builder::{ConfigurationBuilder, build};
use crate::error::{BuildError, RegistryError};
use crate::model::{Endpoint, ParamValue, ParameterValues};
use crate::registry::ModeRegistry;

#[test]
fn test_mode_at_routes_to_expected_endpoints() {
    let registry = ModeRegistry::new();
    let expected = [
        (0, "automatic_mode"),
        (1, "interactive_mode"),
        (2, "ngram_finder"),
        (3, "heuristic_finder"),
    ];
    for (index, endpoint) in expected {
        let mode = registry.mode_at(index).unwrap();
        assert_eq!(mode.endpoint().as_str(), endpoint);
    }
    assert!(matches!(
        registry.mode_at(4),
        Err(RegistryError::OutOfRange { index: 4, .. })
    ));
}

#[test]
fn test_automatic_mode_clamps_both_sliders() {
    let registry = ModeRegistry::new();
    let mode = registry.mode_at(0).unwrap();
    let values = ParameterValues::new()
        .with("length_slider", 25)
        .with("convert_checkbox", true)
        .with("archetype_slider", 0)
        .with("strict_filtering_checkbox", false);

    let report = ConfigurationBuilder::new(mode)
        .values(values)
        .build_report()
        .unwrap();

    let payload = report.request.payload();
    assert_eq!(payload.len(), 4);
    assert_eq!(payload["length_slider"], ParamValue::Integer(20));
    assert_eq!(payload["convert_checkbox"], ParamValue::Boolean(true));
    assert_eq!(payload["archetype_slider"], ParamValue::Integer(1));
    assert_eq!(payload["strict_filtering_checkbox"], ParamValue::Boolean(false));

    let clamped: Vec<&str> = report.warnings.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(clamped, ["length_slider", "archetype_slider"]);
}

#[test]
fn test_automatic_mode_wire_body() {
    let registry = ModeRegistry::new();
    let request = ConfigurationBuilder::new(registry.mode_at(0).unwrap())
        .set("length_slider", 25)
        .set("convert_checkbox", true)
        .set("archetype_slider", 0)
        .build()
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(&request.body_json().unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "length_slider": 20,
            "convert_checkbox": true,
            "archetype_slider": 1,
            "strict_filtering_checkbox": false
        })
    );
}

#[test]
fn test_empty_values_yield_defaults_for_every_mode() {
    let registry = ModeRegistry::new();
    let expected: [(Endpoint, &[(&str, ParamValue)]); 4] = [
        (
            Endpoint::AutomaticMode,
            &[
                ("length_slider", ParamValue::Integer(5)),
                ("convert_checkbox", ParamValue::Boolean(false)),
                ("archetype_slider", ParamValue::Integer(5)),
                ("strict_filtering_checkbox", ParamValue::Boolean(false)),
            ],
        ),
        (
            Endpoint::InteractiveMode,
            &[
                ("min_clone_slider", ParamValue::Integer(5)),
                ("max_clone_slider", ParamValue::Integer(50)),
                ("min_group_slider", ParamValue::Integer(2)),
                ("extension_checkbox", ParamValue::Boolean(false)),
            ],
        ),
        (
            Endpoint::NgramFinder,
            &[
                ("min_clone_slider", ParamValue::Integer(5)),
                ("max_edit_slider", ParamValue::Integer(50)),
                ("max_fuzzy_slider", ParamValue::Integer(2)),
                ("source_language", ParamValue::Choice("English".into())),
            ],
        ),
        (
            Endpoint::HeuristicFinder,
            &[("extention_point_checkbox", ParamValue::Boolean(false))],
        ),
    ];

    for (endpoint, defaults) in expected {
        let mode = registry.by_endpoint(endpoint).unwrap();
        let request = build(mode, &ParameterValues::new()).unwrap();
        assert_eq!(request.mode(), endpoint);
        assert_eq!(request.payload().len(), defaults.len(), "{endpoint}");
        for (id, value) in defaults {
            assert_eq!(request.payload().get(*id), Some(value), "{endpoint}.{id}");
        }
    }
}

#[test]
fn test_unknown_language_is_rejected() {
    let registry = ModeRegistry::new();
    let mode = registry.find("ngram").unwrap();
    let err = build(mode, &ParameterValues::new().with("source_language", "French")).unwrap_err();
    assert_eq!(
        err,
        BuildError::InvalidEnumValue {
            id: "source_language".into(),
            value: "French".into(),
            options: vec!["English".into(), "Russian".into()],
        }
    );
}

#[test]
fn test_enum_match_is_exact() {
    let registry = ModeRegistry::new();
    let mode = registry.find("ngram").unwrap();
    assert!(build(mode, &ParameterValues::new().with("source_language", "russian")).is_err());
    let request = build(mode, &ParameterValues::new().with("source_language", "Russian")).unwrap();
    assert_eq!(
        request.payload()["source_language"],
        ParamValue::Choice("Russian".into())
    );
}

#[test]
fn test_undeclared_keys_never_reach_payload() {
    let registry = ModeRegistry::new();
    let mode = registry.find("heuristic").unwrap();
    let values = ParameterValues::new()
        .with("extention_point_checkbox", true)
        .with("length_slider", 7)
        .with("file_path", "/tmp/doc.txt");
    let request = build(mode, &values).unwrap();
    let keys: Vec<&String> = request.payload().keys().collect();
    assert_eq!(keys, ["extention_point_checkbox"]);
}

#[test]
fn test_wrong_kind_is_rejected() {
    let registry = ModeRegistry::new();
    let mode = registry.find("interactive").unwrap();
    let err = build(mode, &ParameterValues::new().with("extension_checkbox", 1)).unwrap_err();
    assert!(matches!(err, BuildError::TypeMismatch { ref id, .. } if id == "extension_checkbox"));
}

#[test]
fn test_unbounded_values_are_sent_literally() {
    let registry = ModeRegistry::new();
    let mode = registry.find("interactive").unwrap();
    let spec = mode.parameter("max_clone_slider").unwrap();
    let request = build(mode, &ParameterValues::new().with("max_clone_slider", 150)).unwrap();
    let sent = &request.payload()["max_clone_slider"];
    assert_eq!(sent, &ParamValue::Integer(150));
    assert_eq!(spec.display(sent), "∞");
}

#[test]
fn test_parameter_ids_are_unique_and_defaults_in_range() {
    for mode in ModeRegistry::new().list_modes() {
        let mut ids: Vec<&str> = mode.parameter_ids().collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), mode.parameters().len(), "{}", mode.name());

        for spec in mode.parameters() {
            if let (Some((min, max)), Some(default)) = (spec.bounds(), spec.default_value().as_integer()) {
                assert!(min <= default && default <= max, "{}", spec.id());
            }
        }
    }
}
