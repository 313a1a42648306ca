//! Error types of the ucan-storage-key crate.

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A type alias for a `Result` that uses `KeyError` as the error type.
pub type KeyResult<T> = Result<T, KeyError>;

/// The main error type of the ucan-storage-key crate.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Signature creation or verification failed, or key bytes were malformed.
    #[error("Signature error: {0}")]
    SignatureError(#[from] ed25519_dalek::SignatureError),

    /// The JWS algorithm name is not one we know.
    #[error("Unsupported JWS algorithm name: {0}")]
    UnsupportedJwsAlgName(String),

    /// The exported private key is not valid padded base64.
    #[error("Unable to decode exported key: {0}")]
    ExportedKeyDecodeError(#[from] base64::DecodeError),
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `KeyResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> KeyResult<T> {
    Result::Ok(value)
}
