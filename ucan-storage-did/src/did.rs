use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ucan_storage_key::{
    Ed25519PubKey, GetKeyType, KeyType, PublicKeyBytes, PublicKeyGenerate, Verify,
};

use crate::{did_to_public_key, public_key_to_did, DidError, DidResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A [`did:key`][did-key] identifier.
///
/// It holds the key type and raw public key bytes recovered from the DID string. Any of the known
/// key types can be parsed, but only `ed25519` keys can verify signatures.
///
/// [did-key]: https://w3c-ccg.github.io/did-method-key/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DidKey {
    key_type: KeyType,
    public_key: Vec<u8>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DidKey {
    /// Creates a [`DidKey`] for the public half of a key.
    pub fn from_key<K>(key: &K) -> Self
    where
        K: PublicKeyBytes + GetKeyType,
    {
        Self {
            key_type: key.key_type(),
            public_key: key.public_key_bytes(),
        }
    }

    /// Creates a [`DidKey`] from a key type and raw public key bytes.
    pub fn from_public_key(key_type: KeyType, public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            key_type,
            public_key: public_key.into(),
        }
    }

    /// Returns the key type.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Returns the raw public key bytes.
    pub fn public_key_bytes(&self) -> &[u8] {
        &self.public_key
    }

    /// Verifies `signature` over `data` with the public key this DID carries.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> DidResult<()> {
        match self.key_type {
            KeyType::Ed25519 => {
                let key = Ed25519PubKey::from_public_key(&self.public_key)?;
                key.verify(data, signature)?;
                Ok(())
            }
            key_type => Err(DidError::UnsupportedKeyType(key_type)),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Display for DidKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", public_key_to_did(self.key_type, &self.public_key))
    }
}

impl FromStr for DidKey {
    type Err = DidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key_type, public_key) = did_to_public_key(s)?;
        Ok(Self {
            key_type,
            public_key,
        })
    }
}

impl Serialize for DidKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DidKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DidKey::from_str(&s).map_err(serde::de::Error::custom)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use anyhow::Ok;
    use ucan_storage_key::{Ed25519KeyPair, KeyPairGenerate, Sign};

    use super::*;

    #[test_log::test]
    fn test_did_key_from_key_and_parse() -> anyhow::Result<()> {
        let mut rng = rand::thread_rng();
        let key_pair = Ed25519KeyPair::generate(&mut rng)?;

        let did = DidKey::from_key(&key_pair);
        let encoded = did.to_string();
        tracing::debug!(%encoded);

        let parsed = DidKey::from_str(&encoded)?;
        assert_eq!(parsed, did);
        assert_eq!(parsed.key_type(), KeyType::Ed25519);
        assert_eq!(parsed.public_key_bytes(), key_pair.public_key_bytes());

        Ok(())
    }

    #[test]
    fn test_did_key_verify() -> anyhow::Result<()> {
        let mut rng = rand::thread_rng();
        let key_pair = Ed25519KeyPair::generate(&mut rng)?;
        let did = DidKey::from_key(&key_pair);

        let signature = key_pair.sign(b"hello")?;
        did.verify(b"hello", &signature)?;
        assert!(did.verify(b"hellO", &signature).is_err());

        let p256 = DidKey::from_str("did:key:zDnaerDaTF5BXEavCrfRZEk316dpbLsfPDZ3WJ5hRTPFU2169")?;
        assert!(matches!(
            p256.verify(b"hello", &signature),
            Err(DidError::UnsupportedKeyType(KeyType::P256))
        ));

        Ok(())
    }

    #[test]
    fn test_did_key_serde() -> anyhow::Result<()> {
        let did = DidKey::from_str("did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp")?;

        let serialized = serde_json::to_string(&did)?;
        assert_eq!(
            serialized,
            "\"did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp\""
        );
        assert_eq!(serde_json::from_str::<DidKey>(&serialized)?, did);

        Ok(())
    }
}
