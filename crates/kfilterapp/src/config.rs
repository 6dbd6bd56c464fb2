//! # Configuration
//!
//! Kfilter configuration is managed by [`clapfig`], which handles layered loading
//! from TOML files, environment variables, and programmatic overrides.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `KFILTER__COMPONENT_LABEL`, `KFILTER__DEFAULT_OUTPUT`, etc.
//! 2. **Project Config**: `.kfilter/kfilter.toml`, found by walking up from the cwd.
//! 3. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `component_label` | `appstudio.openshift.io/component` | Label the `name` attribute also searches |
//! | `commit_label_keys` | PaC sha labels | Labels the `commit` attribute prefix-matches |
//! | `commit_annotation_keys` | build sha annotations | Annotations the `commit` attribute prefix-matches |
//! | `fallback_fields` | `["name", "description", "status"]` | Fields tried when an attribute path is missing |
//! | `default_output` | `table` | CLI output when `--output` is not given |

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::filters::matcher::{
    COMMIT_ANNOTATION_KEYS, COMMIT_LABEL_KEYS, COMPONENT_LABEL, FALLBACK_FIELDS,
};
use crate::filters::MatchRules;

fn owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

/// Configuration for kfilter, stored in `kfilter.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KfilterConfig {
    /// Label holding the component name of a resource.
    #[config(default = "appstudio.openshift.io/component")]
    pub component_label: String,

    /// Labels holding a commit sha. When absent, the Konflux defaults apply.
    pub commit_label_keys: Option<Vec<String>>,

    /// Annotations holding a commit sha. When absent, the Konflux defaults apply.
    pub commit_annotation_keys: Option<Vec<String>>,

    /// Generic fields searched when an attribute path yields nothing.
    pub fallback_fields: Option<Vec<String>>,

    /// Output format of the CLI: "table" or "json".
    #[config(default = "table")]
    pub default_output: String,
}

impl Default for KfilterConfig {
    fn default() -> Self {
        Self {
            component_label: COMPONENT_LABEL.to_string(),
            commit_label_keys: None,
            commit_annotation_keys: None,
            fallback_fields: None,
            default_output: "table".to_string(),
        }
    }
}

impl KfilterConfig {
    pub fn commit_label_keys(&self) -> Vec<String> {
        self.commit_label_keys
            .clone()
            .unwrap_or_else(|| owned(COMMIT_LABEL_KEYS))
    }

    pub fn commit_annotation_keys(&self) -> Vec<String> {
        self.commit_annotation_keys
            .clone()
            .unwrap_or_else(|| owned(COMMIT_ANNOTATION_KEYS))
    }

    pub fn fallback_fields(&self) -> Vec<String> {
        self.fallback_fields
            .clone()
            .unwrap_or_else(|| owned(FALLBACK_FIELDS))
    }

    /// The matcher tables this configuration describes.
    pub fn match_rules(&self) -> MatchRules {
        MatchRules {
            component_label: self.component_label.clone(),
            commit_label_keys: self.commit_label_keys(),
            commit_annotation_keys: self.commit_annotation_keys(),
            fallback_fields: self.fallback_fields(),
        }
    }
}
