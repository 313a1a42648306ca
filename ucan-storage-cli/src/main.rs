use std::{io, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ucan_storage_cli::{
    inspect::{run_caps, run_claim, run_validate, ClaimArgs, TokenArgs},
    keypair::{run_keypair, KeypairArgs},
    styles,
    token::{run_ucan, UcanArgs},
};
use ucan_storage_config::{storage::StorageConfig, MainConfig};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Issue, validate and inspect UCAN storage tokens.
#[derive(Parser, Debug)]
#[command(name = "ucan-storage", version, about, styles = styles::styles())]
struct Cli {
    /// Show debug logs. Repeat for trace logs.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a key pair, or show the one behind an exported private key.
    Keypair(KeypairArgs),

    /// Issue a storage token.
    Ucan(UcanArgs),

    /// Validate a token and its proofs.
    Validate(TokenArgs),

    /// Find the root of the delegation of a capability.
    Claim(ClaimArgs),

    /// List every capability a token can claim.
    Caps(TokenArgs),
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => StorageConfig::from_file(path)?,
        None => StorageConfig::default(),
    };

    let out = &mut io::stdout().lock();
    match cli.command {
        Commands::Keypair(args) => run_keypair(&args, out)?,
        Commands::Ucan(args) => {
            run_ucan(&args, &config, out).await?;
        }
        Commands::Validate(args) => {
            run_validate(&args, &config, out).await?;
        }
        Commands::Claim(args) => {
            run_claim(&args, &config, out).await?;
        }
        Commands::Caps(args) => {
            run_caps(&args, &config, out).await?;
        }
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_ucan_command() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "ucan-storage",
            "-v",
            "ucan",
            "--issuer",
            "key",
            "--audience",
            "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp",
            "--expiration",
            "2030-01-01T00:00:00Z",
            "--proof",
            "a.b.c",
            "--proof",
            "d.e.f",
        ])?;

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Ucan(args) => {
                assert_eq!(args.can, "upload/*");
                assert_eq!(args.proof, vec!["a.b.c", "d.e.f"]);
                assert_eq!(
                    args.expiration.map(|t| t.timestamp()),
                    Some(1_893_456_000)
                );
            }
            other => anyhow::bail!("unexpected command: {other:?}"),
        }

        Ok(())
    }

    #[test]
    fn test_cli_parses_claim_command() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "ucan-storage",
            "claim",
            "a.b.c",
            "--with",
            "storage://user1",
            "--config",
            "storage.toml",
        ])?;

        assert_eq!(cli.config, Some(PathBuf::from("storage.toml")));
        assert!(matches!(
            cli.command,
            Commands::Claim(ClaimArgs { ref token, ref with, .. })
                if token == "a.b.c" && with == "storage://user1"
        ));

        Ok(())
    }
}
