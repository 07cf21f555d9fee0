//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tfunbind/tfunbind.toml`
//! 3. Explicit config: `--config <FILE>`
//! 4. Environment variables: `TFUNBIND_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, ContentRule, DomainError, ExistingPolicy, MarkerTable};

/// TFVC marker vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RulesConfig {
    /// Directory names never copied nor descended into
    pub excluded_dirs: Vec<String>,
    /// File extensions never copied (e.g. "vspscc")
    pub excluded_extensions: Vec<String>,
    /// Exact file names never copied (e.g. "vssver2.scc")
    pub excluded_names: Vec<String>,
    /// Extensions handled as solution files
    pub solution_extensions: Vec<String>,
    /// Extension suffixes handled as project files ("proj" -> csproj, vbproj, ...)
    pub project_extension_suffixes: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: vec![
                "$tf".into(),
                "Debug".into(),
                "Release".into(),
                "StyleCop".into(),
            ],
            excluded_extensions: vec![
                "vssscc".into(),
                "vspscc".into(),
                "user".into(),
                "pdb".into(),
            ],
            excluded_names: vec![
                "vssver2.scc".into(),
                "mssccprj.scc".into(),
                ".tfignore".into(),
            ],
            solution_extensions: vec!["sln".into()],
            project_extension_suffixes: vec!["proj".into()],
        }
    }
}

/// Raw rules config for intermediate parsing (arrays are Option to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRulesConfig {
    pub excluded_dirs: Option<Vec<String>>,
    pub excluded_extensions: Option<Vec<String>>,
    pub excluded_names: Option<Vec<String>>,
    pub solution_extensions: Option<Vec<String>>,
    pub project_extension_suffixes: Option<Vec<String>>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub overwrite_existing: Option<bool>,
    pub make_writable: Option<bool>,
    pub rules: RawRulesConfig,
}

impl RulesConfig {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    fn merge_field(base: &[String], overlay: Option<&Vec<String>>) -> Vec<String> {
        overlay
            .map(|o| Self::merge_array(base, o))
            .unwrap_or_else(|| base.to_vec())
    }

    fn replace_field(base: &[String], overlay: Option<&Vec<String>>) -> Vec<String> {
        overlay.cloned().unwrap_or_else(|| base.to_vec())
    }

    /// Union merge (explicit config file on top of global).
    pub fn merge(&self, overlay: &RawRulesConfig) -> Self {
        Self {
            excluded_dirs: Self::merge_field(&self.excluded_dirs, overlay.excluded_dirs.as_ref()),
            excluded_extensions: Self::merge_field(
                &self.excluded_extensions,
                overlay.excluded_extensions.as_ref(),
            ),
            excluded_names: Self::merge_field(&self.excluded_names, overlay.excluded_names.as_ref()),
            solution_extensions: Self::merge_field(
                &self.solution_extensions,
                overlay.solution_extensions.as_ref(),
            ),
            project_extension_suffixes: Self::merge_field(
                &self.project_extension_suffixes,
                overlay.project_extension_suffixes.as_ref(),
            ),
        }
    }

    /// Replace merge (global config on top of defaults).
    ///
    /// Global config defines the real baseline; defaults are only a starting point.
    pub fn apply_global(&self, global: &RawRulesConfig) -> Self {
        Self {
            excluded_dirs: Self::replace_field(&self.excluded_dirs, global.excluded_dirs.as_ref()),
            excluded_extensions: Self::replace_field(
                &self.excluded_extensions,
                global.excluded_extensions.as_ref(),
            ),
            excluded_names: Self::replace_field(
                &self.excluded_names,
                global.excluded_names.as_ref(),
            ),
            solution_extensions: Self::replace_field(
                &self.solution_extensions,
                global.solution_extensions.as_ref(),
            ),
            project_extension_suffixes: Self::replace_field(
                &self.project_extension_suffixes,
                global.project_extension_suffixes.as_ref(),
            ),
        }
    }

    /// Compile the vocabulary into an ordered marker table.
    pub fn marker_table(&self) -> Result<MarkerTable, DomainError> {
        Ok(MarkerTable::builder()
            .exclude_dirs(&self.excluded_dirs)?
            .exclude_file_names(&self.excluded_names)?
            .exclude_extensions(&self.excluded_extensions)?
            .rewrite_extensions(&self.solution_extensions, ContentRule::Solution)?
            .rewrite_extension_suffixes(&self.project_extension_suffixes, ContentRule::Project)?
            .build())
    }
}

/// Unified configuration for tfunbind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Overwrite files already present in the destination (default: true)
    pub overwrite_existing: bool,
    /// Clear the read-only flag on copied files (default: true)
    pub make_writable: bool,
    /// Marker vocabulary
    pub rules: RulesConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            overwrite_existing: true,
            make_writable: true,
            rules: RulesConfig::default(),
        }
    }
}

/// Get the XDG config directory for tfunbind.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tfunbind").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tfunbind.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    pub fn existing_policy(&self) -> ExistingPolicy {
        if self.overwrite_existing {
            ExistingPolicy::Overwrite
        } else {
            ExistingPolicy::Skip
        }
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            overwrite_existing: overlay
                .overwrite_existing
                .unwrap_or(self.overwrite_existing),
            make_writable: overlay.make_writable.unwrap_or(self.make_writable),
            rules: self.rules.merge(&overlay.rules),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            overwrite_existing: global
                .overwrite_existing
                .unwrap_or(self.overwrite_existing),
            make_writable: global.make_writable.unwrap_or(self.make_writable),
            rules: self.rules.apply_global(&global.rules),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file (`--config`)
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config (arrays REPLACE defaults)
    /// 3. Explicit config file (arrays UNION with global, `!item` removes)
    /// 4. Environment variables: `TFUNBIND_*` prefix (REPLACES)
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(path) = config_file {
            let path = PathBuf::from(expand_env_vars(&path.to_string_lossy()));
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(&path)?;
            current = current.merge_with(&raw);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply TFUNBIND_* environment variables as explicit overrides.
    ///
    /// Env vars replace values (not merge) - they are explicit user overrides.
    /// Lists are comma separated: `TFUNBIND_RULES__EXCLUDED_DIRS='$tf,obj'`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TFUNBIND")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("rules.excluded_dirs")
                .with_list_parse_key("rules.excluded_extensions")
                .with_list_parse_key("rules.excluded_names")
                .with_list_parse_key("rules.solution_extensions")
                .with_list_parse_key("rules.project_extension_suffixes")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_bool("overwrite_existing") {
            settings.overwrite_existing = val;
        }
        if let Ok(val) = config.get_bool("make_writable") {
            settings.make_writable = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("rules.excluded_dirs") {
            settings.rules.excluded_dirs = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("rules.excluded_extensions") {
            settings.rules.excluded_extensions = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("rules.excluded_names") {
            settings.rules.excluded_names = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("rules.solution_extensions") {
            settings.rules.solution_extensions = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("rules.project_extension_suffixes") {
            settings.rules.project_extension_suffixes = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# tfunbind configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/tfunbind/tfunbind.toml  (defines your baseline)
#   Explicit: tfunbind --config <FILE>          (per-run additions)
#   Env:      TFUNBIND_* environment variables  (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Explicit config UNIONS with global.
#   Use "!item" in an explicit config to REMOVE an inherited item:
#     excluded_dirs = ["obj", "!Release"]  # adds obj, keeps Release output

# Overwrite files already present in the destination
# overwrite_existing = true

# Clear the read-only flag TFVC leaves on files
# make_writable = true

[rules]
# Directory names that are neither copied nor descended into
# excluded_dirs = ["$tf", "Debug", "Release", "StyleCop"]

# File extensions that are not copied
# excluded_extensions = ["vssscc", "vspscc", "user", "pdb"]

# Exact file names that are not copied
# excluded_names = ["vssver2.scc", "mssccprj.scc", ".tfignore"]

# Solution files: VersionControl sections and Scc* lines are stripped
# solution_extensions = ["sln"]

# Project files (extension suffix): <Scc*> elements are stripped
# project_extension_suffixes = ["proj"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
