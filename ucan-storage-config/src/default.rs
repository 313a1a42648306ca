//! Default configuration values.

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The default lifetime of issued tokens, in seconds.
pub const DEFAULT_TOKEN_LIFETIME: u64 = 30;

/// The longest lifetime of issued tokens, in seconds. Ten years.
pub const MAX_TOKEN_LIFETIME: u64 = 10 * 365 * 24 * 60 * 60;

/// The token version this build issues and understands.
pub const DEFAULT_TOKEN_VERSION: &str = ucan_storage::VERSION;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

pub(crate) const fn default_token_lifetime() -> u64 {
    DEFAULT_TOKEN_LIFETIME
}

pub(crate) fn default_token_version() -> String {
    DEFAULT_TOKEN_VERSION.to_string()
}
