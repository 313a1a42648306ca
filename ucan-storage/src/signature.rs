use std::{fmt::Display, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{encoding, Segment, UcanError};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Represents the digital signature of a UCAN token.
///
/// The signature covers exactly the encoded header and payload segments as they were first
/// produced, joined by a `.`. It is never recomputed from decoded values.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct UcanSignature(Vec<u8>);

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl UcanSignature {
    /// Returns the raw bytes of the signature.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Serialize for UcanSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for UcanSignature {
    fn deserialize<D>(deserializer: D) -> Result<UcanSignature, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}

impl Display for UcanSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use base64::prelude::{Engine, BASE64_URL_SAFE_NO_PAD};
        write!(f, "{}", BASE64_URL_SAFE_NO_PAD.encode(&self.0))
    }
}

impl FromStr for UcanSignature {
    type Err = UcanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        encoding::decode_bytes(Segment::Signature, s).map(UcanSignature)
    }
}

impl From<Vec<u8>> for UcanSignature {
    fn from(signature: Vec<u8>) -> Self {
        Self(signature)
    }
}

impl Deref for UcanSignature {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::DecodeErrorKind;

    use super::*;

    #[test_log::test]
    fn test_signature_display() -> anyhow::Result<()> {
        let signature = UcanSignature::from(vec![1, 2, 3, 4, 5]);

        let displayed = signature.to_string();
        tracing::debug!(?displayed);
        assert_eq!(displayed, "AQIDBAU");
        assert_eq!(UcanSignature::from_str(&displayed)?, signature);

        let serialized = serde_json::to_string(&signature)?;
        assert_eq!(serialized, "\"AQIDBAU\"");

        assert!(matches!(
            UcanSignature::from_str("AQ.D"),
            Err(UcanError::DecodeError {
                segment: Segment::Signature,
                kind: DecodeErrorKind::Base64,
                ..
            })
        ));

        Ok(())
    }
}
