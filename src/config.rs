//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeguide/treeguide.toml`
//! 3. Local config: `<data_dir>/.treeguide.toml`
//! 4. Environment variables: `TREEGUIDE_*` prefix

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::util::path::{expand_path, normalize_extension};

pub const APP_NAME: &str = "treeguide";
pub const ENV_PREFIX: &str = "TREEGUIDE";

/// Raw settings for intermediate parsing (every field optional to detect
/// "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub guide_extension: Option<String>,
    pub catalog_file: Option<String>,
    pub default_author: Option<String>,
    pub library_extensions: Option<Vec<String>>,
}

/// Unified configuration for treeguide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Library root holding `guides/`, `examples/` and the catalog (default: ~/.treeguide)
    pub data_dir: PathBuf,
    /// Extension used when saving guides (default: ".tsg")
    pub guide_extension: String,
    /// Catalog file name inside `data_dir`
    pub catalog_file: String,
    /// Author recorded on newly created guides
    pub default_author: String,
    /// Extensions listed as guides by the library (default: ["json", "tsg"])
    pub library_extensions: Vec<String>,
    /// Name written into the save envelope
    pub app_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            guide_extension: ".tsg".into(),
            catalog_file: "product_catalog.json".into(),
            default_author: "Unknown".into(),
            library_extensions: vec!["json".into(), "tsg".into()],
            app_name: APP_NAME.into(),
        }
    }
}

/// Get the default data directory (~/.treeguide).
fn default_data_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".treeguide"))
        .unwrap_or_else(|| PathBuf::from("~/.treeguide"))
}

/// Get the XDG config directory for treeguide.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeguide.toml"))
}

/// Get the path to the local config file in a data directory.
pub fn local_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".treeguide.toml")
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

/// Union `overlay` into `base`. Entries written as `!item` remove `item`.
/// Result is sorted and de-duplicated.
pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: BTreeSet<String> = base.iter().cloned().collect();
    for item in overlay {
        match item.strip_prefix('!') {
            Some(negated) => {
                result.remove(negated);
            }
            None => {
                result.insert(item.clone());
            }
        }
    }
    result.into_iter().collect()
}

impl Settings {
    /// Directory of user-authored guides.
    pub fn guides_dir(&self) -> PathBuf {
        self.data_dir.join("guides")
    }

    /// Directory of bundled sample guides.
    pub fn examples_dir(&self) -> PathBuf {
        self.data_dir.join("examples")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    /// Expand shell variables and tilde in `data_dir`, normalize extensions.
    fn expand_paths(&mut self) {
        self.data_dir = expand_path(&self.data_dir);
        self.guide_extension = normalize_extension(&self.guide_extension);
    }

    /// Global config replaces defaults field by field, arrays included.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            data_dir: global.data_dir.clone().unwrap_or_else(|| self.data_dir.clone()),
            guide_extension: global
                .guide_extension
                .clone()
                .unwrap_or_else(|| self.guide_extension.clone()),
            catalog_file: global
                .catalog_file
                .clone()
                .unwrap_or_else(|| self.catalog_file.clone()),
            default_author: global
                .default_author
                .clone()
                .unwrap_or_else(|| self.default_author.clone()),
            library_extensions: global
                .library_extensions
                .clone()
                .unwrap_or_else(|| self.library_extensions.clone()),
            app_name: self.app_name.clone(),
        }
    }

    /// Local config overrides scalars and unions arrays (with `!` removal).
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            library_extensions: overlay
                .library_extensions
                .as_ref()
                .map(|o| merge_array(&self.library_extensions, o))
                .unwrap_or_else(|| self.library_extensions.clone()),
            ..self.apply_global(&RawSettings {
                library_extensions: None,
                ..overlay.clone()
            })
        }
    }

    /// Load settings with layered precedence.
    ///
    /// `data_dir` (typically from the command line) selects the local config
    /// file and wins over every other source for the data directory itself.
    pub fn load(data_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        let local_dir = data_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| expand_path(&current.data_dir));
        let local_path = local_config_path(&local_dir);
        if local_path.exists() {
            debug!("loading local config {}", local_path.display());
            let raw = load_raw_settings(&local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;

        if let Some(dir) = data_dir {
            current.data_dir = dir.to_path_buf();
        }

        current.expand_paths();
        Ok(current)
    }

    /// Apply TREEGUIDE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("library_extensions")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("guide_extension") {
            settings.guide_extension = val;
        }
        if let Ok(val) = config.get_string("catalog_file") {
            settings.catalog_file = val;
        }
        if let Ok(val) = config.get_string("default_author") {
            settings.default_author = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("library_extensions") {
            settings.library_extensions = val;
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
        r#"# treeguide configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treeguide/treeguide.toml
#   Local:  <data_dir>/.treeguide.toml
#   Env:    TREEGUIDE_* environment variables
#
# Local config unions library_extensions with the global list.
# Use "!ext" to drop an inherited entry:
#   library_extensions = ["yaml", "!json"]

# Library root holding guides/, examples/ and the catalog
# data_dir = "~/.treeguide"

# Extension for saved guides
# guide_extension = ".tsg"

# Catalog file inside data_dir
# catalog_file = "product_catalog.json"

# Author recorded on new guides
# default_author = "Unknown"

# Extensions listed by `treeguide library list`
# library_extensions = ["json", "tsg"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
