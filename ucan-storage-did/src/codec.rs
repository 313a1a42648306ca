use multibase::Base;
use ucan_storage_key::KeyType;

use crate::{DidError, DidResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The prefix every `did:key` starts with.
pub const DID_KEY_PREFIX: &str = "did:key:";

/// `ed25519-pub` varint multicodec prefix.
const ED25519_PUB_KEY_CODE: [u8; 2] = [0xed, 0x01];

/// `p256-pub` varint multicodec prefix.
const P256_PUB_KEY_CODE: [u8; 2] = [0x80, 0x24];

/// `secp256k1-pub` varint multicodec prefix.
const SECP256K1_PUB_KEY_CODE: [u8; 2] = [0xe7, 0x01];

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Encodes public key bytes of the given type as a `did:key` string.
///
/// The key bytes are prefixed with their [multicodec][multicodec] code and encoded with
/// base58btc [multibase][multibase], giving the familiar `did:key:z...` form.
///
/// [multicodec]: https://github.com/multiformats/multicodec
/// [multibase]: https://github.com/multiformats/multibase
pub fn public_key_to_did(key_type: KeyType, public_key: &[u8]) -> String {
    let mut multicodec_enc = multicodec_prefix(key_type).to_vec();
    multicodec_enc.extend_from_slice(public_key);

    format!(
        "{DID_KEY_PREFIX}{}",
        multibase::encode(Base::Base58Btc, multicodec_enc)
    )
}

/// Decodes a `did:key` string into its key type and raw public key bytes.
pub fn did_to_public_key(did: &str) -> DidResult<(KeyType, Vec<u8>)> {
    let encoded = did
        .strip_prefix(DID_KEY_PREFIX)
        .ok_or_else(|| DidError::InvalidMethod(did.to_string()))?;

    if !encoded.starts_with(Base::Base58Btc.code()) {
        return Err(DidError::UnsupportedEncoding(did.to_string()));
    }

    let (_, multicodec_enc) = multibase::decode(encoded)?;
    if multicodec_enc.len() < 2 {
        return Err(DidError::UnsupportedCodec(multicodec_enc));
    }

    let key_type = match [multicodec_enc[0], multicodec_enc[1]] {
        ED25519_PUB_KEY_CODE => KeyType::Ed25519,
        P256_PUB_KEY_CODE => KeyType::P256,
        SECP256K1_PUB_KEY_CODE => KeyType::Secp256k1,
        code => return Err(DidError::UnsupportedCodec(code.to_vec())),
    };

    Ok((key_type, multicodec_enc[2..].to_vec()))
}

/// Returns the key type encoded in a `did:key` string.
pub fn did_key_type(did: &str) -> DidResult<KeyType> {
    did_to_public_key(did).map(|(key_type, _)| key_type)
}

fn multicodec_prefix(key_type: KeyType) -> [u8; 2] {
    match key_type {
        KeyType::Ed25519 => ED25519_PUB_KEY_CODE,
        KeyType::P256 => P256_PUB_KEY_CODE,
        KeyType::Secp256k1 => SECP256K1_PUB_KEY_CODE,
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use anyhow::Ok;
    use ucan_storage_key::{Ed25519KeyPair, KeyPairGenerate, PublicKeyBytes};

    use super::*;

    #[test]
    fn test_ed25519_encode_and_decode() -> anyhow::Result<()> {
        let mut rng = rand::thread_rng();
        let key_pair = Ed25519KeyPair::generate(&mut rng)?;

        let did = public_key_to_did(KeyType::Ed25519, &key_pair.public_key_bytes());
        assert!(did.starts_with("did:key:z6Mk"));

        let (key_type, bytes) = did_to_public_key(&did)?;
        assert_eq!(key_type, KeyType::Ed25519);
        assert_eq!(bytes, key_pair.public_key_bytes());
        assert_eq!(did_key_type(&did)?, KeyType::Ed25519);

        Ok(())
    }

    #[test]
    fn test_known_did_key_types() -> anyhow::Result<()> {
        assert_eq!(
            did_key_type("did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp")?,
            KeyType::Ed25519
        );
        assert_eq!(
            did_key_type("did:key:zDnaerDaTF5BXEavCrfRZEk316dpbLsfPDZ3WJ5hRTPFU2169")?,
            KeyType::P256
        );
        assert_eq!(
            did_key_type("did:key:zQ3shokFTS3brHcDQrn82RUDfCZESWL1ZdCEJwekUDPQiYBme")?,
            KeyType::Secp256k1
        );

        Ok(())
    }

    #[test]
    fn test_did_decode_failures() {
        assert!(matches!(
            did_to_public_key("did:web:example.com"),
            Err(DidError::InvalidMethod(_))
        ));
        assert!(matches!(
            did_to_public_key("did:key:mAAAA"),
            Err(DidError::UnsupportedEncoding(_))
        ));
        assert!(matches!(
            did_to_public_key("did:key:z0OIl"),
            Err(DidError::BaseError(_))
        ));

        let did = format!(
            "{DID_KEY_PREFIX}{}",
            multibase::encode(Base::Base58Btc, [0x12, 0x20, 0x01])
        );
        assert!(matches!(
            did_to_public_key(&did),
            Err(DidError::UnsupportedCodec(code)) if code == vec![0x12, 0x20]
        ));
    }
}
