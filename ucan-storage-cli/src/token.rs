//! The `ucan` command.

use std::{io::Write, time::SystemTime};

use chrono::{DateTime, Utc};
use clap::Args;
use ucan_storage::{RawCapability, StorageSemantics, Ucan, UcanChain, STORAGE_PREFIX};
use ucan_storage_config::storage::StorageConfig;
use ucan_storage_did::DidKey;
use ucan_storage_key::{Ed25519KeyPair, KeyPairExport};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Arguments of the `ucan` command.
#[derive(Args, Debug)]
pub struct UcanArgs {
    /// The exported private key of the issuer.
    #[arg(long)]
    pub issuer: String,

    /// The DID the token is issued to.
    #[arg(long)]
    pub audience: String,

    /// When the token expires, as an RFC 3339 date. Defaults to the configured lifetime.
    #[arg(long)]
    pub expiration: Option<DateTime<Utc>>,

    /// The resource of the capability. Defaults to `storage://<issuer did>`.
    #[arg(long)]
    pub with: Option<String>,

    /// The ability of the capability.
    #[arg(long, default_value = "upload/*")]
    pub can: String,

    /// An encoded proof token. May be repeated.
    #[arg(long)]
    pub proof: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Issues a storage token, checks it like a receiver would and prints its payload and encoding.
pub async fn run_ucan(
    args: &UcanArgs,
    config: &StorageConfig,
    out: &mut impl Write,
) -> anyhow::Result<String> {
    let keypair = Ed25519KeyPair::from_exported(&args.issuer)?;
    let with = match &args.with {
        Some(with) => with.clone(),
        None => format!("{STORAGE_PREFIX}{}", DidKey::from_key(&keypair)),
    };

    let mut builder = Ucan::builder()
        .audience(&args.audience)
        .lifetime(config.token_lifetime())
        .capability(RawCapability::new(with, &args.can))
        .proofs(&args.proof);

    if let Some(expiration) = args.expiration {
        builder = builder.expiration(SystemTime::from(expiration));
    }

    let token = StorageSemantics.build(builder, &keypair)?;
    let chain = UcanChain::from_token(&token, &config.validation).await?;
    tracing::info!(issuer = chain.issuer(), audience = chain.audience(), "issued token");

    writeln!(out, "{}", serde_json::to_string_pretty(chain.ucan().payload())?)?;
    writeln!(out, "UCAN:\n{token}")?;

    Ok(token)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ucan_storage::Service;

    use super::*;

    fn args(issuer: &Service, audience: &Service) -> UcanArgs {
        UcanArgs {
            issuer: issuer.keypair().export(),
            audience: audience.did().to_string(),
            expiration: None,
            with: None,
            can: "upload/*".to_string(),
            proof: Vec::new(),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_ucan_defaults_to_issuer_storage() -> anyhow::Result<()> {
        let issuer = Service::create()?;
        let audience = Service::create()?;

        let mut out = Vec::new();
        let token = run_ucan(&args(&issuer, &audience), &StorageConfig::default(), &mut out).await?;
        let out = String::from_utf8(out)?;

        assert!(out.ends_with(&format!("UCAN:\n{token}\n")));
        assert!(out.contains(&format!("\"with\": \"storage://{}\"", issuer.did())));
        assert!(out.contains("\"can\": \"upload/*\""));

        let chain = UcanChain::from_token(&token, &Default::default()).await?;
        assert_eq!(chain.issuer(), issuer.did());
        assert_eq!(chain.audience(), audience.did());

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_ucan_with_proof_and_expiration() -> anyhow::Result<()> {
        let root = Service::create()?;
        let user = Service::create()?;
        let friend = Service::create()?;

        let proof = root.ucan(user.did())?;
        let expiration = Utc::now() + chrono::Duration::hours(1);

        let args = UcanArgs {
            with: Some(format!("storage://{}/shared", user.did())),
            can: "upload/IMPORT".to_string(),
            proof: vec![proof],
            expiration: Some(expiration),
            ..args(&user, &friend)
        };

        let token = run_ucan(&args, &StorageConfig::default(), &mut Vec::new()).await?;
        let chain = UcanChain::from_token(&token, &Default::default()).await?;

        assert_eq!(chain.proofs()[0].issuer(), root.did());
        assert_eq!(
            chain.payload().expiration().map(DateTime::<Utc>::from).map(|t| t.timestamp()),
            Some(expiration.timestamp())
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_ucan_rejects_unsupported_capability() -> anyhow::Result<()> {
        let issuer = Service::create()?;

        let args = UcanArgs {
            can: "upload/DELETE".to_string(),
            ..args(&issuer, &issuer)
        };

        let err = run_ucan(&args, &StorageConfig::default(), &mut Vec::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Ability upload/DELETE is not supported."));

        Ok(())
    }
}
