use base64::{prelude::BASE64_STANDARD, Engine};
use rand_core::CryptoRngCore;

use crate::{JwsAlgorithm, KeyResult, KeyType};

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// A trait for keys that can verify signatures.
pub trait Verify {
    /// Verifies a signature against data with a verifying key.
    fn verify(&self, data: &[u8], signature: &[u8]) -> KeyResult<()>;
}

/// A trait for keys that can sign data.
pub trait Sign: Verify {
    /// Signs data with a signing key.
    fn sign(&self, data: &[u8]) -> KeyResult<Vec<u8>>;
}

/// A trait for constructing a public key.
pub trait PublicKeyGenerate {
    /// Generates a public key from its bytes.
    fn from_public_key(bytes: &[u8]) -> KeyResult<Self>
    where
        Self: Sized;
}

/// A trait for constructing a key pair.
pub trait KeyPairGenerate {
    /// Generates a key pair from a cryptographically secure random number generator.
    fn generate(rng: &mut impl CryptoRngCore) -> KeyResult<Self>
    where
        Self: Sized;

    /// Constructs a key pair from its private key bytes.
    fn from_private_key(bytes: &[u8]) -> KeyResult<Self>
    where
        Self: Sized;
}

/// A trait for getting the public key bytes.
pub trait PublicKeyBytes {
    /// Returns the public key bytes.
    fn public_key_bytes(&self) -> Vec<u8>;

    /// Returns the public key as a padded base64 string.
    fn public_key_str(&self) -> String {
        BASE64_STANDARD.encode(self.public_key_bytes())
    }
}

/// A trait for getting the key pair bytes.
pub trait KeyPairBytes: PublicKeyBytes {
    /// Returns the private key bytes.
    fn private_key_bytes(&self) -> Vec<u8>;
}

/// A trait for saving a key pair as text and loading it back.
///
/// The exported form is the private key in padded base64. It must be stored securely.
pub trait KeyPairExport: KeyPairBytes + KeyPairGenerate {
    /// Exports the private key as a padded base64 string.
    fn export(&self) -> String {
        BASE64_STANDARD.encode(self.private_key_bytes())
    }

    /// Loads a key pair from a string produced by [`export`][KeyPairExport::export].
    fn from_exported(key: &str) -> KeyResult<Self>
    where
        Self: Sized,
    {
        let bytes = BASE64_STANDARD.decode(key.trim())?;
        Self::from_private_key(&bytes)
    }
}

/// A trait for getting the algorithm name of a JWS key.
pub trait JwsAlgName {
    /// Returns the algorithm name of a JWS key.
    fn alg(&self) -> JwsAlgorithm;
}

/// A trait for getting the type of a key.
pub trait GetKeyType {
    /// Returns the key type.
    fn key_type(&self) -> KeyType;
}
