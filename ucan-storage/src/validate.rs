use std::{str::FromStr, time::SystemTime};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use typed_builder::TypedBuilder;
use ucan_storage_did::{did_key_type, DidError, DidKey};

use crate::{
    encoding, Segment, SignedUcan, UcanError, UcanHeader, UcanPayload, UcanResult, UcanSignature,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The default limit on how deeply proofs may be nested.
pub const DEFAULT_MAX_PROOF_DEPTH: usize = 32;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Controls which checks [`validate`] runs and how deep proof chains may go.
///
/// Every check is enabled by default. When deserialized, missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct ValidateOptions {
    /// Require the issuer's key type to match the header's `alg`.
    #[serde(default = "default_true")]
    #[builder(default = true)]
    pub check_issuer: bool,

    /// Verify the signature with the issuer's key.
    #[serde(default = "default_true")]
    #[builder(default = true)]
    pub check_signature: bool,

    /// Reject tokens whose `exp` has passed.
    #[serde(default = "default_true")]
    #[builder(default = true)]
    pub check_is_expired: bool,

    /// Reject tokens whose `nbf` has not been reached.
    #[serde(default = "default_true")]
    #[builder(default = true)]
    pub check_is_too_early: bool,

    /// The number of proof levels allowed below a token.
    #[serde(default = "default_max_proof_depth")]
    #[builder(default = DEFAULT_MAX_PROOF_DEPTH)]
    pub max_proof_depth: usize,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Validates an encoded token against the current time.
///
/// See [`validate_at`].
pub fn validate(encoded: &str, options: &ValidateOptions) -> UcanResult<SignedUcan> {
    validate_at(encoded, options, SystemTime::now())
}

/// Decodes an encoded token and runs the checks enabled in `options` as of `now`.
///
/// The checks run in this order and the first failure is returned:
/// 1. the issuer's key type matches the header's `alg`,
/// 2. the signature verifies over the received header and payload segments,
/// 3. the token has not expired,
/// 4. the token is already active.
///
/// Proofs are not looked at. Use [`UcanChain::from_token`][crate::UcanChain::from_token] to
/// validate a whole chain.
pub fn validate_at(
    encoded: &str,
    options: &ValidateOptions,
    now: SystemTime,
) -> UcanResult<SignedUcan> {
    let [encoded_header, encoded_payload, encoded_signature] = split_token(encoded)?;

    let header = UcanHeader::from_str(encoded_header)?;
    let payload = UcanPayload::from_str(encoded_payload)?;
    let signature = UcanSignature::from_str(encoded_signature)?;

    if options.check_issuer {
        let key_type = did_key_type(payload.issuer())?;
        if key_type.jws_algorithm().to_string() != header.alg() {
            tracing::warn!(issuer = payload.issuer(), alg = header.alg(), "algorithm mismatch");
            return Err(UcanError::AlgorithmMismatch(encoded.to_string()));
        }
    }

    if options.check_signature {
        let signing_input = format!("{encoded_header}.{encoded_payload}");
        let did = DidKey::from_str(payload.issuer())?;
        did.verify(signing_input.as_bytes(), &signature)
            .map_err(|e| match e {
                DidError::KeyError(_) => {
                    tracing::warn!(issuer = payload.issuer(), "signature invalid");
                    UcanError::SignatureInvalid(encoded.to_string())
                }
                e => e.into(),
            })?;
    }

    if options.check_is_expired && payload.is_expired_at(now) {
        tracing::warn!(issuer = payload.issuer(), "token expired");
        return Err(UcanError::Expired(encoded.to_string()));
    }

    if options.check_is_too_early && payload.is_too_early_at(now) {
        tracing::warn!(issuer = payload.issuer(), "token not active yet");
        return Err(UcanError::TooEarly(encoded.to_string()));
    }

    tracing::debug!(
        issuer = payload.issuer(),
        audience = payload.audience(),
        "validated token"
    );

    Ok(SignedUcan::from_parts(header, payload, signature))
}

/// Returns `true` if `encoded` looks like a UCAN: three segments and a header carrying a `ucv`
/// version string. Nothing else is checked.
pub fn is_ucan(encoded: &str) -> bool {
    let Ok([encoded_header, _, _]) = split_token(encoded) else {
        return false;
    };

    encoding::decode_json::<Value>(Segment::Header, encoded_header)
        .map(|header| header.get("ucv").is_some_and(Value::is_string))
        .unwrap_or(false)
}

/// Splits a token into its three non-empty segments.
pub(crate) fn split_token(encoded: &str) -> UcanResult<[&str; 3]> {
    let mut parts = encoded.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok([header, payload, signature])
        }
        _ => Err(UcanError::MalformedToken(encoded.to_string())),
    }
}

const fn default_true() -> bool {
    true
}

const fn default_max_proof_depth() -> usize {
    DEFAULT_MAX_PROOF_DEPTH
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for ValidateOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
