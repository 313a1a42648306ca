use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use ucan_storage_key::JwsAlgorithm;

use crate::{encoding, Segment, UcanError};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Defines the type of the token as a JSON Web Token (JWT).
pub const TYPE: &str = "JWT";

/// The UCAN protocol version written into every header this crate creates.
pub const VERSION: &str = "0.8.0";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Represents the header part of a UCAN token.
///
/// `alg` is kept as the raw string found on the wire so that a token declaring an algorithm we
/// do not know fails the issuer check rather than decoding. `typ` and `ucv` are always written
/// by this crate but are optional when decoding.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct UcanHeader {
    /// The algorithm used for signing the token.
    alg: String,

    /// The token type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,

    /// The UCAN version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ucv: Option<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl UcanHeader {
    /// Returns the algorithm name declared by the token.
    pub fn alg(&self) -> &str {
        &self.alg
    }

    /// Returns the token type.
    pub fn typ(&self) -> Option<&str> {
        self.typ.as_deref()
    }

    /// Returns the UCAN version.
    pub fn ucv(&self) -> Option<&str> {
        self.ucv.as_deref()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Display for UcanHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoded = encoding::encode_json(self).map_err(|_| std::fmt::Error)?;
        write!(f, "{}", encoded)
    }
}

impl FromStr for UcanHeader {
    type Err = UcanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        encoding::decode_json(Segment::Header, s)
    }
}

impl Default for UcanHeader {
    fn default() -> Self {
        Self::from(JwsAlgorithm::EdDSA)
    }
}

impl From<JwsAlgorithm> for UcanHeader {
    fn from(alg: JwsAlgorithm) -> Self {
        Self {
            alg: alg.to_string(),
            typ: Some(TYPE.to_string()),
            ucv: Some(VERSION.to_string()),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_header_serde() -> anyhow::Result<()> {
        let header = UcanHeader::default();

        let serialized = serde_json::to_string(&header)?;
        tracing::debug!(?serialized);
        assert_eq!(serialized, r#"{"alg":"EdDSA","typ":"JWT","ucv":"0.8.0"}"#);

        let deserialized: UcanHeader = serde_json::from_str(&serialized)?;
        assert_eq!(deserialized, header);

        let minimal: UcanHeader = serde_json::from_str(r#"{"alg":"RS256"}"#)?;
        assert_eq!(minimal.alg(), "RS256");
        assert_eq!(minimal.typ(), None);
        assert_eq!(minimal.ucv(), None);

        Ok(())
    }

    #[test_log::test]
    fn test_header_display() -> anyhow::Result<()> {
        let header = UcanHeader::default();

        let displayed = header.to_string();
        tracing::debug!(?displayed);
        assert_eq!(
            displayed,
            "eyJhbGciOiJFZERTQSIsInR5cCI6IkpXVCIsInVjdiI6IjAuOC4wIn0"
        );

        let parsed = UcanHeader::from_str(&displayed)?;
        assert_eq!(parsed, header);

        let header = UcanHeader::from(JwsAlgorithm::ES256K);
        let parsed = UcanHeader::from_str(&header.to_string())?;
        assert_eq!(parsed.alg(), "ES256K");

        Ok(())
    }
}
