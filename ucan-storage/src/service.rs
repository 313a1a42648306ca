use std::time::Duration;

use ucan_storage_did::DidKey;
use ucan_storage_key::{Ed25519KeyPair, KeyPairExport, KeyPairGenerate};

use crate::{
    RawCapability, StorageSemantics, Ucan, UcanChain, UcanError, UcanResult, ValidateOptions,
    DEFAULT_LIFETIME, STORAGE_PREFIX,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A storage service that accepts tokens addressed to it and issues root storage tokens.
#[derive(Debug, Clone)]
pub struct Service {
    keypair: Ed25519KeyPair,
    did: String,
    lifetime: Duration,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Service {
    /// Creates a service identified by `keypair`.
    pub fn new(keypair: Ed25519KeyPair) -> Self {
        let did = DidKey::from_key(&keypair).to_string();
        Self {
            keypair,
            did,
            lifetime: DEFAULT_LIFETIME,
        }
    }

    /// Creates a service with a freshly generated key pair.
    pub fn create() -> UcanResult<Self> {
        let keypair = Ed25519KeyPair::generate(&mut rand::thread_rng())?;
        Ok(Self::new(keypair))
    }

    /// Creates a service from an exported private key.
    pub fn from_private_key(exported: &str) -> UcanResult<Self> {
        Ok(Self::new(Ed25519KeyPair::from_exported(exported)?))
    }

    /// Sets the lifetime of the tokens the service issues.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// The DID of the service.
    pub fn did(&self) -> &str {
        &self.did
    }

    /// The key pair of the service.
    pub fn keypair(&self) -> &Ed25519KeyPair {
        &self.keypair
    }

    /// Assembles the chain of `encoded` and checks that the token is addressed to this service.
    pub async fn validate(&self, encoded: &str, options: &ValidateOptions) -> UcanResult<UcanChain> {
        let chain = UcanChain::from_token(encoded, options).await?;
        if chain.audience() != self.did {
            tracing::warn!(audience = chain.audience(), service = %self.did, "token not addressed to service");
            return Err(UcanError::ServiceAudienceMismatch);
        }

        Ok(chain)
    }

    /// Issues a token granting `did` every upload ability on `storage://<did>`.
    pub fn ucan(&self, did: &str) -> UcanResult<String> {
        let builder = Ucan::builder()
            .audience(did)
            .lifetime(self.lifetime)
            .capability(RawCapability::new(
                format!("{STORAGE_PREFIX}{did}"),
                "upload/*",
            ));

        StorageSemantics.build(builder, &self.keypair)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ucan_storage_key::PublicKeyBytes;

    use crate::{StorageAbility, StorageCapability};

    use super::*;

    #[test]
    fn test_service_from_private_key() -> anyhow::Result<()> {
        let service = Service::create()?;
        let restored = Service::from_private_key(&service.keypair().export())?;

        assert_eq!(restored.did(), service.did());
        assert_eq!(
            restored.keypair().public_key_bytes(),
            service.keypair().public_key_bytes()
        );
        assert!(service.did().starts_with("did:key:z6Mk"));

        assert!(Service::from_private_key("not base64!").is_err());

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_service_issues_and_validates_storage_token() -> anyhow::Result<()> {
        let service = Service::create()?;
        let user = Service::create()?;

        let token = service.ucan(user.did())?;
        let chain = UcanChain::from_token(&token, &ValidateOptions::default()).await?;

        assert_eq!(chain.issuer(), service.did());
        assert_eq!(chain.audience(), user.did());

        // The user delegates back to the service, which is the audience it expects.
        let delegated = Ucan::builder()
            .audience(service.did())
            .capability(RawCapability::new(
                format!("storage://{}/public", user.did()),
                "upload/IMPORT",
            ))
            .proof(&token)
            .sign(user.keypair())?
            .to_string();

        let chain = service.validate(&delegated, &ValidateOptions::default()).await?;
        let root = chain.claim(
            &RawCapability::from(&StorageCapability::new(
                format!("storage://{}/public", user.did()),
                StorageAbility::UploadImport,
            )),
            &StorageSemantics,
        )?;
        assert_eq!(root.issuer(), service.did());

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_service_rejects_foreign_audience() -> anyhow::Result<()> {
        let service = Service::create()?;
        let user = Service::create()?;

        let token = service.ucan(user.did())?;
        let err = service
            .validate(&token, &ValidateOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, UcanError::ServiceAudienceMismatch));
        assert_eq!(
            err.to_string(),
            "Invalid UCAN: Audience does not match this service."
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_service_token_lifetime() -> anyhow::Result<()> {
        let service = Service::create()?.with_lifetime(Duration::from_secs(3600));
        let token = service.ucan(service.did())?;

        let chain = UcanChain::from_token(&token, &ValidateOptions::default()).await?;
        let expiration = chain
            .payload()
            .expiration()
            .ok_or_else(|| anyhow::anyhow!("missing expiration"))?;
        assert!(expiration > std::time::SystemTime::now() + Duration::from_secs(3000));

        Ok(())
    }

    #[test]
    fn test_service_rejects_unrepresentable_lifetime() -> anyhow::Result<()> {
        let service = Service::create()?.with_lifetime(Duration::from_secs(i64::MAX as u64));

        assert!(matches!(
            service.ucan(service.did()),
            Err(UcanError::LifetimeTooLong(_))
        ));

        Ok(())
    }
}
