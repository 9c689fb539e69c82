use serde::{Deserialize, Serialize};

/// Runtime knobs for the navigation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorSettings {
    /// Refuse invariant-violating drawer transitions instead of force-closing.
    #[serde(default = "default_strict_invariants")]
    pub strict_invariants: bool,
    /// Resolve unknown pages to their deepest indexed path prefix.
    #[serde(default)]
    pub prefix_match: bool,
    /// Href prefixes that leave the console.
    #[serde(default = "default_external_schemes")]
    pub external_schemes: Vec<String>,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            strict_invariants: default_strict_invariants(),
            prefix_match: false,
            external_schemes: default_external_schemes(),
        }
    }
}

fn default_strict_invariants() -> bool {
    cfg!(debug_assertions)
}

fn default_external_schemes() -> Vec<String> {
    vec!["http://".into(), "https://".into(), "mailto:".into()]
}
