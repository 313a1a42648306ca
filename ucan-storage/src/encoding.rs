use base64::prelude::{Engine, BASE64_URL_SAFE_NO_PAD};
use serde::{de::DeserializeOwned, Serialize};

use crate::{DecodeErrorKind, Segment, UcanError, UcanResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Serializes a value to JSON and encodes it as unpadded base64url.
pub(crate) fn encode_json<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: Serialize,
{
    let json = serde_json::to_string(value)?;
    Ok(BASE64_URL_SAFE_NO_PAD.encode(json.as_bytes()))
}

/// Decodes an unpadded base64url segment holding UTF-8 JSON.
pub(crate) fn decode_json<T>(segment: Segment, input: &str) -> UcanResult<T>
where
    T: DeserializeOwned,
{
    let json = BASE64_URL_SAFE_NO_PAD
        .decode(input.as_bytes())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| decode_error(segment, input, DecodeErrorKind::Base64))?;

    serde_json::from_str(&json).map_err(|_| decode_error(segment, input, DecodeErrorKind::Json))
}

/// Decodes an unpadded base64url segment into raw bytes.
pub(crate) fn decode_bytes(segment: Segment, input: &str) -> UcanResult<Vec<u8>> {
    BASE64_URL_SAFE_NO_PAD
        .decode(input.as_bytes())
        .map_err(|_| decode_error(segment, input, DecodeErrorKind::Base64))
}

fn decode_error(segment: Segment, input: &str, kind: DecodeErrorKind) -> UcanError {
    UcanError::DecodeError {
        segment,
        input: input.to_string(),
        kind,
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
