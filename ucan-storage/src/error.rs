//! Error types of the ucan-storage crate.

use std::fmt::Display;

use thiserror::Error;

use crate::CapabilityParseError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result type for UCAN operations.
pub type UcanResult<T> = Result<T, UcanError>;

/// Defines the types of errors that can occur while building, validating and assembling UCANs.
///
/// Every variant here is fatal for the token it concerns and, during assembly, for the whole
/// chain that token belongs to.
#[derive(Debug, Error)]
pub enum UcanError {
    /// The token is not three non-empty dot-separated segments.
    #[error("Can't parse UCAN: {0}: Expected JWT format: 3 dot-separated base64url-encoded values.")]
    MalformedToken(String),

    /// A segment of the token could not be decoded.
    #[error("Can't parse {segment}: {input}: {kind}")]
    DecodeError {
        /// The segment that failed.
        segment: Segment,

        /// The encoded segment.
        input: String,

        /// Which decoding step failed.
        kind: DecodeErrorKind,
    },

    /// The lifetime of a token being built puts its expiration past what the clock can represent.
    #[error("Token lifetime of {0:?} is too long")]
    LifetimeTooLong(std::time::Duration),

    /// The issuer's key type does not match the `alg` of the header.
    #[error("Invalid UCAN: {0}: Issuer key type does not match UCAN's alg property.")]
    AlgorithmMismatch(String),

    /// The signature does not verify against the issuer's key.
    #[error("Invalid UCAN: {0}: Signature invalid.")]
    SignatureInvalid(String),

    /// The token has expired.
    #[error("Invalid UCAN: {0}: Expired.")]
    Expired(String),

    /// The token is not active yet.
    #[error("Invalid UCAN: {0}: Not active yet (too early).")]
    TooEarly(String),

    /// A proof was not delegated to the issuer of the token that embeds it.
    #[error("Invalid UCAN: Audience {audience} doesn't match issuer {issuer}")]
    AudienceMismatch {
        /// The audience of the offending proof.
        audience: String,

        /// The issuer of the token embedding the proof.
        issuer: String,
    },

    /// The proof chain is nested deeper than allowed.
    #[error("Invalid UCAN: Proof chain exceeds the maximum depth of {0}")]
    ProofDepthExceeded(usize),

    /// A token appears among its own proofs.
    #[error("Invalid UCAN: Proof cycle detected: {0}")]
    ProofCycle(String),

    /// A proof reference could not be resolved to a token.
    #[error("Proof not found: {0}")]
    ProofNotFound(String),

    /// The token was not addressed to the service validating it.
    #[error("Invalid UCAN: Audience does not match this service.")]
    ServiceAudienceMismatch,

    /// A capability could not be parsed by the semantics it was checked against.
    #[error("Capability parse error: {0}")]
    CapabilityParseError(#[from] CapabilityParseError),

    /// Did errors
    #[error("Did error: {0}")]
    DidError(#[from] ucan_storage_did::DidError),

    /// Key errors
    #[error("Key error: {0}")]
    KeyError(#[from] ucan_storage_key::KeyError),

    /// Json (de)serialization errors
    #[error("Json serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// The three segments of an encoded token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// The header segment.
    Header,

    /// The payload segment.
    Payload,

    /// The signature segment.
    Signature,
}

/// The decoding step that failed for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Not valid base64url, or the decoded bytes are not UTF-8.
    Base64,

    /// Not valid JSON, or JSON of the wrong shape.
    Json,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates an `Ok` `UcanResult`.
#[allow(non_snake_case)]
pub fn Ok<T>(value: T) -> UcanResult<T> {
    Result::Ok(value)
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Header => write!(f, "header"),
            Segment::Payload => write!(f, "payload"),
            Segment::Signature => write!(f, "signature"),
        }
    }
}

impl Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeErrorKind::Base64 => write!(f, "Can't parse as base64url."),
            DecodeErrorKind::Json => write!(f, "Can't parse base64url encoded JSON inside."),
        }
    }
}
