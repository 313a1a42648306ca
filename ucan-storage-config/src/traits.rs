use std::{fs, path::Path};

use serde::de::DeserializeOwned;

use crate::ConfigResult;

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// The main configuration trait.
///
/// Loading a configuration always validates it, so a loaded value can be used as is.
pub trait MainConfig: Sized + DeserializeOwned {
    /// Validates the configuration.
    fn validate(&self) -> ConfigResult<()>;

    /// Loads and validates the configuration from a toml file.
    fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let config = fs::read_to_string(path)?;
        Self::from_string(config)
    }

    /// Loads and validates the configuration from a toml string.
    fn from_string(config: impl AsRef<str>) -> ConfigResult<Self> {
        let config: Self = toml::from_str(config.as_ref())?;
        config.validate()?;
        Ok(config)
    }
}
