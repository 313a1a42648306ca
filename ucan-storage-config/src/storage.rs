//! The configuration of a storage service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use structstruck::strike;
use typed_builder::TypedBuilder;
use ucan_storage::{Service, ValidateOptions};

use crate::{ConfigError, ConfigResult, MainConfig};

use super::default::{DEFAULT_TOKEN_VERSION, MAX_TOKEN_LIFETIME};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

strike! {
    #[strikethrough[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, TypedBuilder)]]
    /// The configuration of a storage service.
    #[derive(Default)]
    pub struct StorageConfig {
        /// The identity of the service.
        #[serde(default)]
        #[builder(default)]
        pub service:
            /// The identity of the service.
            #[derive(Default)]
            pub struct ServiceConfig {
                /// The exported private key of the service. A new key is generated when missing.
                #[serde(default, skip_serializing_if = "Option::is_none")]
                #[builder(default, setter(strip_option, into))]
                pub private_key: Option<String>,
            },

        /// The tokens the service issues.
        #[serde(default)]
        #[builder(default)]
        pub token:
            /// The tokens the service issues.
            pub struct TokenConfig {
                /// How long issued tokens are valid for, in seconds.
                #[serde(default = "super::default::default_token_lifetime")]
                #[builder(default = super::default::default_token_lifetime())]
                pub lifetime: u64,

                /// The token version. Only the version this build issues is accepted.
                #[serde(default = "super::default::default_token_version")]
                #[builder(default = super::default::default_token_version())]
                pub version: String,
            },

        /// The checks run on received tokens.
        #[serde(default)]
        #[builder(default)]
        pub validation: ValidateOptions,
    }
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl StorageConfig {
    /// The lifetime of issued tokens.
    pub fn token_lifetime(&self) -> Duration {
        Duration::from_secs(self.token.lifetime)
    }

    /// Creates the service described by the configuration.
    pub fn service(&self) -> ConfigResult<Service> {
        let service = match &self.service.private_key {
            Some(key) => Service::from_private_key(key)?,
            None => Service::create()?,
        };

        Ok(service.with_lifetime(self.token_lifetime()))
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl MainConfig for StorageConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.token.lifetime == 0 {
            return Err(ConfigError::ZeroTokenLifetime);
        }

        if self.token.lifetime > MAX_TOKEN_LIFETIME {
            return Err(ConfigError::TokenLifetimeTooLong(self.token.lifetime));
        }

        if self.token.version != DEFAULT_TOKEN_VERSION {
            return Err(ConfigError::UnsupportedTokenVersion(
                self.token.version.clone(),
            ));
        }

        if self.validation.max_proof_depth == 0 {
            return Err(ConfigError::ZeroProofDepth);
        }

        Ok(())
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
