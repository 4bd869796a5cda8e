//! Assembly configuration.
//!
//! Configuration is plain data; it can be built in code or parsed from YAML.
//! Loading from files is left to the caller.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How data providers are batched into dataset blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetGrouping {
    /// One block per distinct element count.
    #[default]
    ByElementCount,
    /// One block per owning chart.
    ByChart,
}

/// Settings of a [`crate::ChartDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Dataset block grouping.
    #[serde(default)]
    pub dataset_grouping: DatasetGrouping,

    /// Move function-valued strings to reserved top-level keys.
    #[serde(default = "default_hoist_functions")]
    pub hoist_functions: bool,

    /// Prefix of hoisted function keys.
    #[serde(default = "default_function_prefix")]
    pub function_prefix: String,

    /// First segment of hoisted function names.
    #[serde(default = "default_function_root")]
    pub function_root: String,
}

fn default_hoist_functions() -> bool {
    true
}
fn default_function_prefix() -> String {
    "@function@".to_string()
}
fn default_function_root() -> String {
    "option".to_string()
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            dataset_grouping: DatasetGrouping::default(),
            hoist_functions: default_hoist_functions(),
            function_prefix: default_function_prefix(),
            function_root: default_function_root(),
        }
    }
}

impl AssemblyConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })
    }

    /// Set the dataset grouping.
    #[must_use]
    pub fn with_dataset_grouping(mut self, grouping: DatasetGrouping) -> Self {
        self.dataset_grouping = grouping;
        self
    }

    /// Enable or disable function hoisting.
    #[must_use]
    pub fn with_hoist_functions(mut self, hoist: bool) -> Self {
        self.hoist_functions = hoist;
        self
    }

    /// Set the hoisted key prefix.
    #[must_use]
    pub fn with_function_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.function_prefix = prefix.into();
        self
    }

    /// Set the first segment of hoisted names.
    #[must_use]
    pub fn with_function_root(mut self, root: impl Into<String>) -> Self {
        self.function_root = root.into();
        self
    }
}
