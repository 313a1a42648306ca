//! Error types of the ucan-storage-did crate.

use thiserror::Error;
use ucan_storage_key::KeyType;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A type alias for a `Result` that uses `DidError` as the error type.
pub type DidResult<T> = Result<T, DidError>;

/// The main error type of the ucan-storage-did crate.
#[derive(Debug, Error)]
pub enum DidError {
    /// Invalid method.
    #[error("Expected the `did:key` method: {0}")]
    InvalidMethod(String),

    /// The multibase prefix is not base58btc.
    #[error("Unsupported multibase encoding, expected base58btc: {0}")]
    UnsupportedEncoding(String),

    /// The multicodec prefix does not name a known public key type.
    #[error("Unsupported key codec: {0:#x?}")]
    UnsupportedCodec(Vec<u8>),

    /// The key type is known but cannot be used for verification.
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(KeyType),

    /// Key error.
    #[error("Key error: {0}")]
    KeyError(#[from] ucan_storage_key::KeyError),

    /// Base encoding or decoding error.
    #[error("Base encoding or decoding error: {0}")]
    BaseError(#[from] multibase::Error),
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `DidResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> DidResult<T> {
    Result::Ok(value)
}
