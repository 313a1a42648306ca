use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use ucan_storage_key::{JwsAlgName, JwsAlgorithm, Sign};

use crate::{UcanBuilder, UcanError, UcanHeader, UcanPayload, UcanResult, UcanSignature};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A representation of a [UCAN (User-Controlled Authorization Network)][ucan] token.
///
/// [ucan]: https://github.com/ucan-wg/spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ucan<H = UcanHeader, S = UcanSignature> {
    /// The header of the UCAN, containing metadata and cryptographic information.
    pub header: H,

    /// The payload of the UCAN, containing the actual authorization data and claims.
    pub payload: UcanPayload,

    /// The signature of the UCAN, proving its authenticity.
    pub signature: S,
}

/// A signed UCAN with header and signature.
pub type SignedUcan = Ucan<UcanHeader, UcanSignature>;

/// Unsigned UCAN with header and payload.
pub type UnsignedUcan<H = ()> = Ucan<H, ()>;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Ucan {
    /// Creates a convenience builder for constructing a new UCAN.
    pub fn builder() -> UcanBuilder {
        UcanBuilder::default()
    }
}

impl<H, S> Ucan<H, S> {
    /// Constructs a UCAN from its individual components.
    pub fn from_parts(header: H, payload: UcanPayload, signature: impl Into<S>) -> Self {
        Self {
            header,
            payload,
            signature: signature.into(),
        }
    }

    /// Updates the UCAN to use a specified JWS algorithm.
    pub fn use_alg(self, alg: JwsAlgorithm) -> Ucan<UcanHeader, S> {
        Ucan {
            header: alg.into(),
            payload: self.payload,
            signature: self.signature,
        }
    }

    /// Returns the payload.
    pub fn payload(&self) -> &UcanPayload {
        &self.payload
    }
}

impl<H> UnsignedUcan<H> {
    /// Signs an unsigned UCAN using the provided keypair.
    ///
    /// The header is replaced with one declaring the keypair's algorithm.
    pub fn sign<K>(self, keypair: &K) -> UcanResult<SignedUcan>
    where
        K: Sign + JwsAlgName,
    {
        let ucan = self.use_alg(keypair.alg());
        let encoded = ucan.to_string();
        let signature = keypair.sign(encoded.as_bytes())?;

        Ok(Ucan {
            payload: ucan.payload,
            header: ucan.header,
            signature: signature.into(),
        })
    }
}

impl SignedUcan {
    /// Returns the header.
    pub fn header(&self) -> &UcanHeader {
        &self.header
    }

    /// Returns the signature.
    pub fn signature(&self) -> &UcanSignature {
        &self.signature
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Display for UnsignedUcan<UcanHeader> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.header, self.payload)
    }
}

impl Display for SignedUcan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.header, self.payload, self.signature)
    }
}

/// Decodes the three segments without validating anything. Use [`validate`][crate::validate] to
/// check a token received from elsewhere.
impl FromStr for SignedUcan {
    type Err = UcanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [header, payload, signature] = crate::validate::split_token(s)?;

        Ok(Self {
            header: header.parse()?,
            payload: payload.parse()?,
            signature: signature.parse()?,
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
