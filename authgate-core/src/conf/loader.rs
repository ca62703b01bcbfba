use crate::conf::error::ConfigError;
use crate::conf::overrides::ConfigOverrides;
use crate::conf::types::{ConfigSpec, RuntimeConfig};
use crate::conf::validation::validate_config;
use std::fs;
use std::path::Path;

/// Read and parse a config file without validating it.
pub fn load_spec(path: &Path) -> Result<ConfigSpec, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    hcl::from_str(&s).map_err(|e| ConfigError::parse(path, e))
}

/// Build the runtime configuration: file (or defaults), then overrides, then validation.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<RuntimeConfig, ConfigError> {
    let mut spec = match path {
        Some(path) => load_spec(path)?,
        None => ConfigSpec::default(),
    };

    overrides.apply(&mut spec);

    validate_config(spec)
}
