//! Translator configuration loaded from `pgfilter.toml`.
//!
//! ```toml
//! [translator]
//! loose_bbox = true
//! encode_functions = false
//!
//! [feature_type]
//! name = "parcels"
//!
//! [[feature_type.attributes]]
//! name = "geom"
//! binding = "geometry"
//! storage = "geography"
//! srid = 4326
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FilterError, FilterResult};
use crate::schema::FeatureType;
use crate::transpiler::PostgisDialect;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "pgfilter.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub translator: TranslatorSettings,
    /// Attribute metadata of the filtered table.
    #[serde(default)]
    pub feature_type: Option<FeatureType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatorSettings {
    #[serde(default = "default_loose_bbox")]
    pub loose_bbox: bool,
    #[serde(default)]
    pub encode_functions: bool,
}

fn default_loose_bbox() -> bool {
    true
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            loose_bbox: default_loose_bbox(),
            encode_functions: false,
        }
    }
}

impl TranslatorConfig {
    pub fn from_toml(content: &str) -> FilterResult<Self> {
        toml::from_str(content).map_err(|e| FilterError::Config(e.to_string()))
    }

    /// Read a config file.
    pub fn from_file(path: &Path) -> FilterResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| FilterError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Load from `path` if given (it must exist), else from the first of
    /// `./pgfilter.toml` and the user config file that exists, else defaults.
    pub fn load(path: Option<&Path>) -> FilterResult<Self> {
        if let Some(path) = path {
            debug!(path = %path.display(), "loading config");
            return Self::from_file(path);
        }
        for candidate in Self::search_paths() {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "loading config");
                return Self::from_file(&candidate);
            }
        }
        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        paths.extend(Self::user_config_path());
        paths
    }

    /// `<config dir>/pgfilter/config.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pgfilter").join("config.toml"))
    }

    /// The PostGIS dialect these settings describe.
    pub fn dialect(&self) -> PostgisDialect {
        PostgisDialect::new()
            .with_loose_bbox(self.translator.loose_bbox)
            .with_function_encoding(self.translator.encode_functions)
    }
}
