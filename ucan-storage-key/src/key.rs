use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::JwsAlgorithm;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A key pair with a public and private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsymmetricKey<P, S> {
    pub(crate) public: P,
    pub(crate) private: S,
}

/// A public key.
pub type PubKey<P> = AsymmetricKey<P, ()>;

/// Supported key types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// An `ed25519` key
    #[serde(rename = "ed25519")]
    Ed25519,

    /// A `NIST P-256` key
    #[serde(rename = "p256")]
    P256,

    /// A `secp256k1` key
    #[serde(rename = "secp256k1")]
    Secp256k1,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl KeyType {
    /// Returns the JWS algorithm a token signed by this key type must declare in its header.
    pub fn jws_algorithm(&self) -> JwsAlgorithm {
        match self {
            KeyType::Ed25519 => JwsAlgorithm::EdDSA,
            KeyType::P256 => JwsAlgorithm::ES256,
            KeyType::Secp256k1 => JwsAlgorithm::ES256K,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyType::Ed25519 => write!(f, "ed25519"),
            KeyType::P256 => write!(f, "p256"),
            KeyType::Secp256k1 => write!(f, "secp256k1"),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
