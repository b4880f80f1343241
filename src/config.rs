//! Optional YAML configuration for a conversion run.
//!
//! ```yaml
//! class_code: 1
//! class_map:
//!   0: 1
//!   3: 2
//! on_malformed: skip-file
//! sort_images: true
//! ```
//!
//! Every key is optional. Values given on the command line win over the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::conversion::{ClassMapping, ConvertOptions, MalformedPolicy};
use crate::error::ConvertError;

/// Raw contents of a config file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub class_code: Option<u32>,
    pub class_map: BTreeMap<usize, u32>,
    pub on_malformed: Option<MalformedPolicy>,
    pub sort_images: Option<bool>,
}

impl ConfigFile {
    /// Resolve the file into conversion options, filling gaps with defaults.
    pub fn into_options(self) -> ConvertOptions {
        let defaults = ConvertOptions::default();
        let mut class_mapping = match self.class_code {
            Some(code) => ClassMapping::constant(code),
            None => defaults.class_mapping,
        };
        for (class_id, code) in self.class_map {
            class_mapping = class_mapping.with_override(class_id, code);
        }

        ConvertOptions {
            class_mapping,
            on_malformed: self.on_malformed.unwrap_or(defaults.on_malformed),
            sort_images: self.sort_images.unwrap_or(defaults.sort_images),
        }
    }
}

/// Load a YAML config file.
pub fn load_config(path: &Path) -> Result<ConfigFile, ConvertError> {
    let data = fs::read_to_string(path).map_err(|source| ConvertError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config_str(&data, path)
}

/// Parse YAML config text. `path` is only used for error messages.
pub fn parse_config_str(data: &str, path: &Path) -> Result<ConfigFile, ConvertError> {
    // An empty file is a valid "all defaults" config.
    if data.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(data).map_err(|source| ConvertError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
