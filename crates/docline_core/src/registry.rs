//! The fixed set of analysis modes.
//!
//! The registry is built once and never mutated. [`ModeRegistry::global`]
//! hands out the process-wide instance; [`ModeRegistry::new`] builds an
//! independent one when a caller needs its own.

use std::sync::OnceLock;

use crate::error::RegistryError;
use crate::model::{Endpoint, ModeConfig, ParameterSpec};

/// Display values at or above this are shown as unbounded
pub const UNBOUNDED_SENTINEL: i64 = 100;

/// Source languages understood by the n-gram finder
pub const SOURCE_LANGUAGES: [&str; 2] = ["English", "Russian"];

static GLOBAL: OnceLock<ModeRegistry> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeRegistry {
    modes: Vec<ModeConfig>,
}

impl ModeRegistry {
    /// Number of modes in every registry
    pub const MODE_COUNT: usize = 4;

    pub fn new() -> Self {
        Self {
            modes: vec![
                automatic_mode(),
                interactive_mode(),
                ngram_finder(),
                heuristic_finder(),
            ],
        }
    }

    /// Shared immutable registry, initialised on first use
    pub fn global() -> &'static ModeRegistry {
        GLOBAL.get_or_init(ModeRegistry::new)
    }

    /// All modes in their fixed order
    pub fn list_modes(&self) -> &[ModeConfig] {
        &self.modes
    }

    pub fn mode_at(&self, index: usize) -> Result<&ModeConfig, RegistryError> {
        self.modes.get(index).ok_or(RegistryError::OutOfRange {
            index,
            len: self.modes.len(),
        })
    }

    /// Look up a mode by display name, endpoint identifier or short alias
    /// (case-insensitive).
    pub fn find(&self, name: &str) -> Result<&ModeConfig, RegistryError> {
        let needle = name.trim();
        self.modes
            .iter()
            .find(|mode| {
                let endpoint = mode.endpoint();
                mode.name().eq_ignore_ascii_case(needle)
                    || endpoint.as_str().eq_ignore_ascii_case(needle)
                    || endpoint.alias().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| RegistryError::UnknownMode(needle.to_string()))
    }

    pub fn by_endpoint(&self, endpoint: Endpoint) -> Option<&ModeConfig> {
        self.modes.iter().find(|mode| mode.endpoint() == endpoint)
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn automatic_mode() -> ModeConfig {
    ModeConfig::new(
        "Automatic mode",
        0,
        Endpoint::AutomaticMode,
        "Clone Miner settings",
        vec![
            ParameterSpec::integer("length_slider", "Minimal clone length in tokens", 1, 20, 5),
            ParameterSpec::boolean("convert_checkbox", "Convert to DRL", false),
            ParameterSpec::integer(
                "archetype_slider",
                "Minimal archetype length in tokens",
                1,
                20,
                5,
            ),
            ParameterSpec::boolean(
                "strict_filtering_checkbox",
                "Strict small and overlapping duplicate filtering",
                false,
            ),
        ],
    )
}

fn interactive_mode() -> ModeConfig {
    ModeConfig::new(
        "Interactive mode",
        1,
        Endpoint::InteractiveMode,
        "Fuzzy Heat Settings",
        vec![
            ParameterSpec::integer(
                "min_clone_slider",
                "Minimal clone length (number of tokens)",
                1,
                20,
                5,
            ),
            ParameterSpec::integer(
                "max_clone_slider",
                "Maximal clone length (number of tokens)",
                2,
                200,
                50,
            )
            .unbounded_above(UNBOUNDED_SENTINEL),
            ParameterSpec::integer(
                "min_group_slider",
                "Minimal group power (number of clones)",
                2,
                10,
                2,
            ),
            ParameterSpec::boolean("extension_checkbox", "Extension point values", false),
        ],
    )
}

fn ngram_finder() -> ModeConfig {
    ModeConfig::new(
        "Ngram Duplicate Finder",
        2,
        Endpoint::NgramFinder,
        "Fuzzy Finder Settings",
        vec![
            ParameterSpec::integer(
                "min_clone_slider",
                "Minimal clone length (number of tokens)",
                1,
                20,
                5,
            ),
            ParameterSpec::integer(
                "max_edit_slider",
                "Maximal edit distance (Levenshtein)",
                2,
                200,
                50,
            )
            .unbounded_above(UNBOUNDED_SENTINEL),
            ParameterSpec::integer(
                "max_fuzzy_slider",
                "Minimal group power (number of clones)",
                2,
                10,
                2,
            ),
            ParameterSpec::choice("source_language", "Source Language", SOURCE_LANGUAGES, 0),
        ],
    )
}

fn heuristic_finder() -> ModeConfig {
    ModeConfig::new(
        "Heuristic Ngram Finder",
        3,
        Endpoint::HeuristicFinder,
        "Heuristic Duplicate Finder",
        vec![ParameterSpec::boolean(
            "extention_point_checkbox",
            "Extension point values",
            false,
        )],
    )
}
