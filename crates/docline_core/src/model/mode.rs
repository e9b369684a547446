use std::fmt;

use serde::{Deserialize, Serialize};

use super::parameter::ParameterSpec;

/// Logical backend route of an analysis mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    AutomaticMode,
    InteractiveMode,
    NgramFinder,
    HeuristicFinder,
}

impl Endpoint {
    /// All endpoints in registry order
    pub const ALL: [Endpoint; 4] = [
        Endpoint::AutomaticMode,
        Endpoint::InteractiveMode,
        Endpoint::NgramFinder,
        Endpoint::HeuristicFinder,
    ];

    /// Route identifier as used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::AutomaticMode => "automatic_mode",
            Endpoint::InteractiveMode => "interactive_mode",
            Endpoint::NgramFinder => "ngram_finder",
            Endpoint::HeuristicFinder => "heuristic_finder",
        }
    }

    /// URL path relative to the backend base address
    pub fn route(self) -> String {
        format!("/{}", self.as_str())
    }

    /// Short name accepted on the command line
    pub fn alias(self) -> &'static str {
        match self {
            Endpoint::AutomaticMode => "automatic",
            Endpoint::InteractiveMode => "interactive",
            Endpoint::NgramFinder => "ngram",
            Endpoint::HeuristicFinder => "heuristic",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A named analysis mode: its parameter schema and backend route.
///
/// Parameter order only matters for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeConfig {
    name: String,
    ordinal: usize,
    group: String,
    endpoint: Endpoint,
    parameters: Vec<ParameterSpec>,
}

impl ModeConfig {
    pub fn new(
        name: impl Into<String>,
        ordinal: usize,
        endpoint: Endpoint,
        group: impl Into<String>,
        parameters: Vec<ParameterSpec>,
    ) -> Self {
        debug_assert!(
            {
                let mut ids: Vec<&str> = parameters.iter().map(ParameterSpec::id).collect();
                ids.sort_unstable();
                ids.windows(2).all(|w| w[0] != w[1])
            },
            "parameter ids must be unique within a mode"
        );
        Self {
            name: name.into(),
            ordinal,
            group: group.into(),
            endpoint,
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable position in the registry (0-3)
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Title of the settings group shown above the parameters
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn parameter(&self, id: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|spec| spec.id() == id)
    }

    pub fn parameter_ids(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(ParameterSpec::id)
    }
}
