use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand_core::CryptoRngCore;

use crate::{
    AsymmetricKey, GetKeyType, JwsAlgName, JwsAlgorithm, KeyPairBytes, KeyPairExport,
    KeyPairGenerate, KeyResult, KeyType, PubKey, PublicKeyBytes, PublicKeyGenerate, Sign, Verify,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An [`ed25519`][ref] verifying key.
///
/// [ref]: https://en.wikipedia.org/wiki/EdDSA
pub type Ed25519PubKey = PubKey<VerifyingKey>;

/// An [`ed25519`][ref] key pair with a signing key.
///
/// [ref]: https://en.wikipedia.org/wiki/EdDSA
pub type Ed25519KeyPair = Ed25519Key<SigningKey>;

pub(crate) type Ed25519Key<S> = AsymmetricKey<VerifyingKey, S>;

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl<S> Verify for Ed25519Key<S> {
    fn verify(&self, data: &[u8], signature: &[u8]) -> KeyResult<()> {
        self.public
            .verify_strict(data, &Signature::try_from(signature)?)
            .map_err(Into::into)
    }
}

impl Sign for Ed25519KeyPair {
    fn sign(&self, data: &[u8]) -> KeyResult<Vec<u8>> {
        let signature = self.private.try_sign(data)?;
        Ok(signature.to_vec())
    }
}

impl PublicKeyGenerate for Ed25519PubKey {
    fn from_public_key(bytes: &[u8]) -> KeyResult<Self> {
        Ok(Self {
            public: VerifyingKey::try_from(bytes)?,
            private: (),
        })
    }
}

impl KeyPairGenerate for Ed25519KeyPair {
    fn generate(rng: &mut impl CryptoRngCore) -> KeyResult<Self> {
        let signing_key = SigningKey::generate(rng);
        Ok(Self {
            public: signing_key.verifying_key(),
            private: signing_key,
        })
    }

    fn from_private_key(bytes: &[u8]) -> KeyResult<Self> {
        let signing_key = SigningKey::try_from(bytes)?;
        Ok(Self {
            public: signing_key.verifying_key(),
            private: signing_key,
        })
    }
}

impl KeyPairExport for Ed25519KeyPair {}

impl<S> PublicKeyBytes for Ed25519Key<S> {
    fn public_key_bytes(&self) -> Vec<u8> {
        self.public.to_bytes().to_vec()
    }
}

impl KeyPairBytes for Ed25519KeyPair {
    fn private_key_bytes(&self) -> Vec<u8> {
        self.private.to_bytes().to_vec()
    }
}

impl<S> JwsAlgName for Ed25519Key<S> {
    fn alg(&self) -> JwsAlgorithm {
        JwsAlgorithm::EdDSA
    }
}

impl<S> GetKeyType for Ed25519Key<S> {
    fn key_type(&self) -> KeyType {
        KeyType::Ed25519
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use anyhow::Ok;
    use base64::{prelude::BASE64_STANDARD, Engine};

    use crate::KeyError;

    use super::*;

    const DATA: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8, 9];

    #[test]
    fn test_ed25519_generate() -> anyhow::Result<()> {
        let mut rng = rand::thread_rng();
        let key_pair = Ed25519KeyPair::generate(&mut rng)?;

        assert_eq!(key_pair.public_key_bytes().len(), 32);
        assert_eq!(key_pair.private_key_bytes().len(), 32);

        let public_key = Ed25519PubKey::from_public_key(&key_pair.public_key_bytes())?;
        assert_eq!(public_key.public_key_bytes(), key_pair.public_key_bytes());
        assert!(Ed25519PubKey::from_public_key(&[0; 31]).is_err());

        let restored = Ed25519KeyPair::from_private_key(&key_pair.private_key_bytes())?;
        assert_eq!(key_pair, restored);

        Ok(())
    }

    #[test_log::test]
    fn test_ed25519_sign_and_verify() -> anyhow::Result<()> {
        let mut rng = rand::thread_rng();
        let key_pair = Ed25519KeyPair::generate(&mut rng)?;

        let signature = key_pair.sign(DATA)?;
        tracing::debug!(len = signature.len(), "signed");
        key_pair.verify(DATA, &signature)?;

        let public_key = Ed25519PubKey::from_public_key(&key_pair.public_key_bytes())?;
        public_key.verify(DATA, &signature)?;

        assert!(key_pair.verify(&DATA[1..], &signature).is_err());

        let other = Ed25519KeyPair::generate(&mut rng)?;
        assert!(other.verify(DATA, &signature).is_err());

        Ok(())
    }

    #[test]
    fn test_ed25519_export_and_import() -> anyhow::Result<()> {
        let mut rng = rand::thread_rng();
        let key_pair = Ed25519KeyPair::generate(&mut rng)?;

        let exported = key_pair.export();
        assert!(exported.ends_with('='));

        let imported = Ed25519KeyPair::from_exported(&exported)?;
        assert_eq!(key_pair, imported);
        assert_eq!(key_pair.public_key_str(), imported.public_key_str());
        assert_eq!(
            BASE64_STANDARD.decode(key_pair.public_key_str())?,
            key_pair.public_key_bytes()
        );

        assert!(matches!(
            Ed25519KeyPair::from_exported("not base64!"),
            Err(KeyError::ExportedKeyDecodeError(_))
        ));
        assert!(matches!(
            Ed25519KeyPair::from_exported("AAAA"),
            Err(KeyError::SignatureError(_))
        ));

        Ok(())
    }
}
