use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A type alias for a `Result` that uses `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The main error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Issued tokens must live for at least a second.
    #[error("Token lifetime must be greater than zero")]
    ZeroTokenLifetime,

    /// Issued tokens would expire too far in the future.
    #[error("Token lifetime of {0} seconds exceeds the maximum of {max} seconds", max = crate::default::MAX_TOKEN_LIFETIME)]
    TokenLifetimeTooLong(u64),

    /// A proof depth of zero would reject every delegated token.
    #[error("Maximum proof depth must be greater than zero")]
    ZeroProofDepth,

    /// The configured token version is not the one this build issues.
    #[error("Unsupported token version: {0}")]
    UnsupportedTokenVersion(String),

    /// The service key could not be loaded.
    #[error("Ucan error: {0}")]
    UcanError(#[from] ucan_storage::UcanError),

    /// Io error.
    #[error("Io error: {0}")]
    IoError(#[from] std::io::Error),

    /// Toml deserialization error.
    #[error("Toml deserialization error: {0}")]
    TomlError(#[from] toml::de::Error),
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `ConfigResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> ConfigResult<T> {
    Result::Ok(value)
}
