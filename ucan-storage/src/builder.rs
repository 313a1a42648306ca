use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};
use ucan_storage_did::DidKey;
use ucan_storage_key::{GetKeyType, JwsAlgName, PublicKeyBytes, Sign};

use crate::{
    RawCapability, SignedUcan, Ucan, UcanError, UcanFacts, UcanPayload, UcanResult, UnsignedUcan,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The lifetime of a token when no explicit expiration is given.
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(30);

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A builder for creating UCAN (User-Controlled Authorization Network) tokens.
///
/// The audience must be set before a token can be built. The issuer is normally derived from the
/// signing key; setting it explicitly produces a token whose issuer need not match its signer.
pub struct UcanBuilder<I = (), A = ()> {
    issuer: I,
    audience: A,
    lifetime: Duration,
    expiration: Option<SystemTime>,
    not_before: Option<SystemTime>,
    nonce: Option<String>,
    facts: Option<UcanFacts>,
    pub(crate) capabilities: Vec<RawCapability>,
    proofs: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl<I, A> UcanBuilder<I, A> {
    /// Sets the issuer of the UCAN instead of deriving it from the signing key.
    pub fn issuer(self, issuer: impl Into<String>) -> UcanBuilder<String, A> {
        UcanBuilder {
            issuer: issuer.into(),
            audience: self.audience,
            lifetime: self.lifetime,
            expiration: self.expiration,
            not_before: self.not_before,
            nonce: self.nonce,
            facts: self.facts,
            capabilities: self.capabilities,
            proofs: self.proofs,
        }
    }

    /// Sets the audience (recipient) of the UCAN.
    pub fn audience(self, audience: impl Into<String>) -> UcanBuilder<I, String> {
        UcanBuilder {
            issuer: self.issuer,
            audience: audience.into(),
            lifetime: self.lifetime,
            expiration: self.expiration,
            not_before: self.not_before,
            nonce: self.nonce,
            facts: self.facts,
            capabilities: self.capabilities,
            proofs: self.proofs,
        }
    }

    /// Sets how long the UCAN is valid for, counted from when it is built.
    ///
    /// Ignored if an explicit expiration is set.
    pub fn lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Sets the expiration time of the UCAN.
    pub fn expiration(mut self, expiration: impl Into<SystemTime>) -> Self {
        self.expiration = Some(expiration.into());
        self
    }

    /// Sets the time before which the UCAN is not valid.
    pub fn not_before(mut self, not_before: impl Into<SystemTime>) -> Self {
        self.not_before = Some(not_before.into());
        self
    }

    /// Sets a nonce to prevent replay attacks.
    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Adds facts to the UCAN.
    pub fn facts(mut self, facts: impl IntoIterator<Item = Map<String, Value>>) -> Self {
        self.facts = Some(facts.into_iter().collect());
        self
    }

    /// Sets the capabilities granted by the UCAN.
    pub fn capabilities(mut self, capabilities: impl IntoIterator<Item = RawCapability>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    /// Appends one capability.
    pub fn capability(mut self, capability: RawCapability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Sets the encoded proofs of the UCAN.
    pub fn proofs<T>(mut self, proofs: impl IntoIterator<Item = T>) -> Self
    where
        T: Into<String>,
    {
        self.proofs = proofs.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one encoded proof.
    pub fn proof(mut self, proof: impl Into<String>) -> Self {
        self.proofs.push(proof.into());
        self
    }

    fn into_payload(self, issuer: String, audience: String) -> UcanResult<UcanPayload> {
        let expiration = match self.expiration {
            Some(expiration) => expiration,
            None => SystemTime::now()
                .checked_add(self.lifetime)
                .ok_or(UcanError::LifetimeTooLong(self.lifetime))?,
        };

        Ok(UcanPayload {
            issuer,
            audience,
            expiration: Some(whole_seconds(expiration)),
            not_before: self.not_before.map(whole_seconds),
            nonce: self.nonce,
            facts: self.facts,
            attenuations: self.capabilities,
            proofs: self.proofs,
        })
    }
}

impl UcanBuilder<String, String> {
    /// Builds an unsigned UCAN from the specified components.
    ///
    /// Fails when no expiration is set and the lifetime reaches past what the system clock can
    /// represent.
    pub fn build(self) -> UcanResult<UnsignedUcan> {
        let (issuer, audience) = (self.issuer.clone(), self.audience.clone());
        Ok(Ucan::from_parts((), self.into_payload(issuer, audience)?, ()))
    }

    /// Signs the built UCAN with a given keypair, keeping the issuer that was set explicitly.
    pub fn sign<K>(self, keypair: &K) -> UcanResult<SignedUcan>
    where
        K: Sign + JwsAlgName,
    {
        self.build()?.sign(keypair)
    }
}

impl UcanBuilder<(), String> {
    /// Signs the built UCAN with a given keypair. The issuer is the `did:key` of the keypair.
    pub fn sign<K>(self, keypair: &K) -> UcanResult<SignedUcan>
    where
        K: Sign + JwsAlgName + PublicKeyBytes + GetKeyType,
    {
        let issuer = DidKey::from_key(keypair).to_string();
        self.issuer(issuer).sign(keypair)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Drops the sub-second part, which the encoded payload cannot carry.
fn whole_seconds(time: SystemTime) -> SystemTime {
    let seconds = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    UNIX_EPOCH + Duration::from_secs(seconds)
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for UcanBuilder {
    fn default() -> Self {
        UcanBuilder {
            issuer: (),
            audience: (),
            lifetime: DEFAULT_LIFETIME,
            expiration: None,
            not_before: None,
            nonce: None,
            facts: None,
            capabilities: Vec::new(),
            proofs: Vec::new(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use anyhow::Ok;
    use ucan_storage_key::{Ed25519KeyPair, KeyPairGenerate};

    use super::*;

    #[test]
    fn test_ucan_builder() -> anyhow::Result<()> {
        let now = UNIX_EPOCH + Duration::from_secs(1_700_000_000);

        let ucan = UcanBuilder::default()
            .issuer("did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp")
            .audience("did:key:z6MkpTHR8VNsBxYAAWHut2Geadd9jSwuBV8xRoAnwWsdvktH")
            .expiration(now + Duration::from_secs(360_000))
            .not_before(now)
            .nonce("1100263a4012")
            .facts(vec![Map::new()])
            .capability(RawCapability::new("storage://x", "upload/*"))
            .proof("a.b.c")
            .build()?;

        let payload = ucan.payload();
        assert_eq!(
            payload.issuer(),
            "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp"
        );
        assert_eq!(
            payload.audience(),
            "did:key:z6MkpTHR8VNsBxYAAWHut2Geadd9jSwuBV8xRoAnwWsdvktH"
        );
        assert_eq!(
            payload.expiration(),
            Some(now + Duration::from_secs(360_000))
        );
        assert_eq!(payload.not_before(), Some(now));
        assert_eq!(payload.nonce(), Some("1100263a4012"));
        assert_eq!(payload.facts(), Some(&vec![Map::new()]));
        assert_eq!(
            payload.attenuations(),
            &[RawCapability::new("storage://x", "upload/*")]
        );
        assert_eq!(payload.proofs(), &["a.b.c".to_string()]);

        Ok(())
    }

    #[test]
    fn test_ucan_builder_default_lifetime() -> anyhow::Result<()> {
        let before = SystemTime::now();
        let ucan = UcanBuilder::default()
            .issuer("did:key:a")
            .audience("did:key:b")
            .build()?;

        let expiration = ucan
            .payload()
            .expiration()
            .ok_or_else(|| anyhow::anyhow!("missing expiration"))?;
        // Sub-second precision is dropped.
        assert!(expiration + Duration::from_secs(1) > before + DEFAULT_LIFETIME);
        assert!(expiration <= SystemTime::now() + DEFAULT_LIFETIME);
        assert_eq!(whole_seconds(expiration), expiration);

        let ucan = UcanBuilder::default()
            .issuer("did:key:a")
            .audience("did:key:b")
            .lifetime(Duration::from_secs(3600))
            .expiration(UNIX_EPOCH + Duration::from_secs(10))
            .build()?;
        assert_eq!(
            ucan.payload().expiration(),
            Some(UNIX_EPOCH + Duration::from_secs(10))
        );

        Ok(())
    }

    #[test]
    fn test_ucan_builder_rejects_unrepresentable_lifetime() -> anyhow::Result<()> {
        let lifetime = Duration::from_secs(i64::MAX as u64);
        let result = UcanBuilder::default()
            .issuer("did:key:a")
            .audience("did:key:b")
            .lifetime(lifetime)
            .build();
        assert!(matches!(result, Err(UcanError::LifetimeTooLong(l)) if l == lifetime));

        let mut rng = rand::thread_rng();
        let keypair = Ed25519KeyPair::generate(&mut rng)?;
        let result = UcanBuilder::default()
            .audience("did:key:b")
            .lifetime(Duration::MAX)
            .sign(&keypair);
        assert!(matches!(result, Err(UcanError::LifetimeTooLong(_))));

        // An explicit expiration takes precedence over the lifetime.
        let ucan = UcanBuilder::default()
            .issuer("did:key:a")
            .audience("did:key:b")
            .lifetime(Duration::MAX)
            .expiration(UNIX_EPOCH + Duration::from_secs(10))
            .build()?;
        assert_eq!(
            ucan.payload().expiration(),
            Some(UNIX_EPOCH + Duration::from_secs(10))
        );

        Ok(())
    }

    #[test]
    fn test_ucan_builder_derives_issuer_from_key() -> anyhow::Result<()> {
        let mut rng = rand::thread_rng();
        let keypair = Ed25519KeyPair::generate(&mut rng)?;

        let signed = UcanBuilder::default()
            .audience("did:key:z6MkpTHR8VNsBxYAAWHut2Geadd9jSwuBV8xRoAnwWsdvktH")
            .sign(&keypair)?;

        assert_eq!(
            signed.payload().issuer(),
            DidKey::from_key(&keypair).to_string()
        );
        assert_eq!(signed.header().alg(), "EdDSA");

        Ok(())
    }
}
