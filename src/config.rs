//! Configuration loading for asyncsuffix-linter
//!
//! Loads configuration from an `asyncsuffix.toml` found by walking up from
//! the analyzed path. Command line arguments take precedence over the file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::fix::RenameOptions;
use crate::rules;

pub const CONFIG_FILE_NAME: &str = "asyncsuffix.toml";

/// Test-framework marker attributes recognized out of the box.
pub const DEFAULT_TEST_ATTRIBUTES: &[&str] = &["TestMethod", "Test", "Fact", "Theory"];

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub enable: Vec<String>,

    #[serde(default)]
    pub disable: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// Replaces the default attribute catalog entirely when non-empty.
    #[serde(default)]
    pub test_attributes: Vec<String>,

    /// Appended to the catalog (default or replaced).
    #[serde(default)]
    pub extra_test_attributes: Vec<String>,

    #[serde(default)]
    pub rename: RenameConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RenameConfig {
    /// Rename other method declarations sharing the name
    #[serde(default = "default_true")]
    pub overloads: bool,

    /// Rewrite occurrences inside string literals
    #[serde(default)]
    pub strings: bool,

    /// Rewrite whole-word occurrences inside comments
    #[serde(default = "default_true")]
    pub comments: bool,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            overloads: true,
            strings: false,
            comments: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl RenameConfig {
    pub fn to_options(&self) -> RenameOptions {
        RenameOptions {
            overloads: self.overloads,
            strings: self.strings,
            comments: self.comments,
        }
    }
}

/// The set of attribute simple names that mark a method as a test.
/// Loaded once at startup, read-only thereafter.
#[derive(Debug, Clone)]
pub struct TestAttributeCatalog {
    names: HashSet<String>,
}

impl TestAttributeCatalog {
    pub fn with_defaults() -> Self {
        Self::from_names(DEFAULT_TEST_ATTRIBUTES.iter().map(|s| s.to_string()))
    }

    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// True when any of the method's attribute simple names is recognized.
    pub fn recognizes_any(&self, attribute_names: &HashSet<String>) -> bool {
        attribute_names.iter().any(|n| self.names.contains(n))
    }
}

impl Default for TestAttributeCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Build the catalog from config: `test_attributes` replaces the defaults,
/// `extra_test_attributes` appends.
pub fn attribute_catalog(config: Option<&Config>) -> TestAttributeCatalog {
    let mut names: HashSet<String> = match config {
        Some(cfg) if !cfg.test_attributes.is_empty() => {
            cfg.test_attributes.iter().cloned().collect()
        }
        _ => DEFAULT_TEST_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
    };
    if let Some(cfg) = config {
        names.extend(cfg.extra_test_attributes.iter().cloned());
    }
    TestAttributeCatalog::from_names(names)
}

/// Find an asyncsuffix.toml starting from a path and walking up
pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let mut current = if start_path.is_file() {
        start_path.parent()?
    } else {
        start_path
    };

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Load configuration from an asyncsuffix.toml
pub fn load_config(path: Option<&Path>) -> Option<Config> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            p.to_path_buf()
        } else {
            return None;
        }
    } else {
        find_config_file(&std::env::current_dir().ok()?)?
    };

    let content = std::fs::read_to_string(&config_path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge command line arguments with config file settings.
/// Command line arguments take precedence.
pub fn merge_config(
    config: Option<&Config>,
    cli_enable: &[String],
    cli_disable: &[String],
    cli_skip: &[String],
) -> (Option<Vec<String>>, Vec<String>) {
    let mut enable = None;
    let mut exclude = vec![];

    if let Some(cfg) = config {
        if !cfg.enable.is_empty() && cli_enable.is_empty() && cli_disable.is_empty() {
            if cfg.enable.contains(&"ALL".to_string()) {
                enable = Some(filtered_rule_ids(&cfg.disable));
            } else {
                enable = Some(cfg.enable.clone());
            }
        } else if !cfg.disable.is_empty() && cli_enable.is_empty() && cli_disable.is_empty() {
            enable = Some(filtered_rule_ids(&cfg.disable));
        }

        exclude.extend(cfg.exclude.iter().cloned());
    }

    if !cli_enable.is_empty() {
        if cli_enable.contains(&"ALL".to_string()) {
            enable = Some(filtered_rule_ids(cli_disable));
        } else {
            enable = Some(cli_enable.to_vec());
        }
    } else if !cli_disable.is_empty() {
        enable = Some(filtered_rule_ids(cli_disable));
    }

    exclude.extend(cli_skip.iter().cloned());

    // Default excludes for build output and tooling directories
    let defaults = [
        "bin",
        "obj",
        ".git",
        ".vs",
        "packages",
        "node_modules",
        "TestResults",
        "artifacts",
    ];
    for default in defaults {
        if !exclude.contains(&default.to_string()) {
            exclude.push(default.to_string());
        }
    }

    (enable, exclude)
}

fn filtered_rule_ids(disabled: &[String]) -> Vec<String> {
    rules::get_all_rule_ids()
        .into_iter()
        .filter(|r| !disabled.contains(r))
        .collect()
}
