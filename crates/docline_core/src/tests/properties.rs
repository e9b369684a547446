//! Property tests for request building
//!
//! These tests verify, for arbitrary inputs:
//! - Clamped integers always land inside the declared bounds
//! - Payload keys always equal the declared parameter ids, and built
//!   integers stay inside their bounds
//! - The wire encoding decodes back to the same payload

use proptest::prelude::*;

use crate::builder::{build, normalize};
use crate::model::{ParamValue, ParameterKind, ParameterValues};
use crate::registry::{ModeRegistry, SOURCE_LANGUAGES};
use crate::request::{decode_payload, encode_payload};

/// Values for every declared parameter of `mode`, drawn from the seeds
fn values_for(mode_index: usize, ints: &[i64], flags: &[bool], language: usize) -> ParameterValues {
    let registry = ModeRegistry::global();
    let Ok(mode) = registry.mode_at(mode_index) else {
        return ParameterValues::new();
    };
    let mut values = ParameterValues::new();
    for (i, spec) in mode.parameters().iter().enumerate() {
        let value = match spec.kind() {
            ParameterKind::IntegerRange { .. } => ParamValue::Integer(ints[i % ints.len()]),
            ParameterKind::Boolean { .. } => ParamValue::Boolean(flags[i % flags.len()]),
            ParameterKind::Enum { options, .. } => {
                ParamValue::Choice(options[language % options.len()].clone())
            }
        };
        values.set(spec.id(), value);
    }
    values
}

proptest! {
    #[test]
    fn prop_clamped_integer_within_bounds(requested in any::<i64>(), mode_index in 0usize..4) {
        let mode = ModeRegistry::global().mode_at(mode_index).unwrap();
        for spec in mode.parameters() {
            let Some((min, max)) = spec.bounds() else { continue };
            let normalized = normalize(spec, &ParamValue::Integer(requested)).unwrap();
            let applied = normalized.value.as_integer().unwrap();
            prop_assert!(min <= applied && applied <= max);
            prop_assert_eq!(normalized.clamped.is_some(), applied != requested);
            if (min..=max).contains(&requested) {
                prop_assert_eq!(applied, requested);
            }
        }
    }

    #[test]
    fn prop_payload_keys_match_declared_ids(
        mode_index in 0usize..4,
        ints in prop::collection::vec(any::<i64>(), 1..5),
        flags in prop::collection::vec(any::<bool>(), 1..5),
        language in 0usize..SOURCE_LANGUAGES.len(),
        drop_mask in any::<u8>(),
    ) {
        let mode = ModeRegistry::global().mode_at(mode_index).unwrap();
        let mut values = values_for(mode_index, &ints, &flags, language);
        for (i, id) in mode.parameter_ids().enumerate() {
            if drop_mask & (1 << i) != 0 {
                values.remove(id);
            }
        }

        let request = build(mode, &values).unwrap();
        let mut sent: Vec<&str> = request.payload().keys().map(String::as_str).collect();
        let mut declared: Vec<&str> = mode.parameter_ids().collect();
        sent.sort_unstable();
        declared.sort_unstable();
        prop_assert_eq!(sent, declared);

        for spec in mode.parameters() {
            let Some((min, max)) = spec.bounds() else { continue };
            let built = request.payload()[spec.id()].as_integer().unwrap();
            prop_assert!(
                min <= built && built <= max,
                "{} = {} outside {}..={}", spec.id(), built, min, max
            );
        }
    }

    #[test]
    fn prop_wire_encoding_round_trips(
        mode_index in 0usize..4,
        ints in prop::collection::vec(any::<i64>(), 1..5),
        flags in prop::collection::vec(any::<bool>(), 1..5),
        language in 0usize..SOURCE_LANGUAGES.len(),
    ) {
        let mode = ModeRegistry::global().mode_at(mode_index).unwrap();
        let values = values_for(mode_index, &ints, &flags, language);
        let request = build(mode, &values).unwrap();

        let bytes = encode_payload(request.payload()).unwrap();
        let decoded = decode_payload(&bytes).unwrap();
        prop_assert_eq!(&decoded, request.payload());
    }
}
