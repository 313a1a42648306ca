//! The `validate`, `claim` and `caps` commands.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use ucan_storage::{RawCapability, StorageSemantics, UcanChain};
use ucan_storage_config::storage::StorageConfig;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Arguments of the `validate` and `caps` commands.
#[derive(Args, Debug)]
pub struct TokenArgs {
    /// The encoded token.
    pub token: String,
}

/// Arguments of the `claim` command.
#[derive(Args, Debug)]
pub struct ClaimArgs {
    /// The encoded token.
    pub token: String,

    /// The resource to claim.
    #[arg(long)]
    pub with: String,

    /// The ability to claim.
    #[arg(long, default_value = "upload/*")]
    pub can: String,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Validates a token with its proofs and prints a summary.
pub async fn run_validate(
    args: &TokenArgs,
    config: &StorageConfig,
    out: &mut impl Write,
) -> anyhow::Result<UcanChain> {
    let chain = UcanChain::from_token(&args.token, &config.validation).await?;
    let payload = chain.payload();

    let expires = payload.expiration().map_or_else(
        || "never".to_string(),
        |exp| DateTime::<Utc>::from(exp).to_rfc3339_opts(SecondsFormat::Secs, true),
    );

    writeln!(out, "Issuer: {}", chain.issuer())?;
    writeln!(out, "Audience: {}", chain.audience())?;
    writeln!(out, "Expires: {expires}")?;
    writeln!(
        out,
        "Capabilities: {}",
        serde_json::to_string_pretty(chain.capabilities())?
    )?;
    writeln!(out, "Proofs:")?;
    for proof in chain.proofs() {
        writeln!(out, "  {} -> {}", proof.issuer(), proof.audience())?;
    }

    Ok(chain)
}

/// Finds the token at the root of the delegation of a storage capability.
pub async fn run_claim(
    args: &ClaimArgs,
    config: &StorageConfig,
    out: &mut impl Write,
) -> anyhow::Result<String> {
    let chain = UcanChain::from_token(&args.token, &config.validation).await?;
    let root = chain.claim(&RawCapability::new(&args.with, &args.can), &StorageSemantics)?;

    writeln!(out, "Root Issuer: {}", root.issuer())?;
    writeln!(out, "Root Audience: {}", root.audience())?;

    Ok(root.issuer().to_string())
}

/// Lists every storage capability of a token that can be traced to a root.
pub async fn run_caps(
    args: &TokenArgs,
    config: &StorageConfig,
    out: &mut impl Write,
) -> anyhow::Result<usize> {
    let chain = UcanChain::from_token(&args.token, &config.validation).await?;
    let claimable = chain.find_all_claimable(&StorageSemantics);

    for claim in claimable.iter() {
        writeln!(
            out,
            "{} {} (root: {})",
            claim.capability.with,
            claim.capability.can,
            claim.root.issuer()
        )?;
    }

    Ok(claimable.len())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
