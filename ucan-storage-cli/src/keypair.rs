//! The `keypair` command.

use std::io::Write;

use clap::Args;
use ucan_storage_did::DidKey;
use ucan_storage_key::{Ed25519KeyPair, KeyPairExport, KeyPairGenerate, PublicKeyBytes};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Arguments of the `keypair` command.
#[derive(Args, Debug)]
pub struct KeypairArgs {
    /// An exported private key to inspect instead of generating a new one.
    #[arg(long)]
    pub from: Option<String>,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Prints the DID, public key and exported private key of a key pair.
pub fn run_keypair(args: &KeypairArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let keypair = match &args.from {
        Some(exported) => Ed25519KeyPair::from_exported(exported)?,
        None => Ed25519KeyPair::generate(&mut rand::thread_rng())?,
    };

    writeln!(out, "DID: {}", DidKey::from_key(&keypair))?;
    writeln!(out, "Public Key: {}", keypair.public_key_str())?;
    writeln!(out, "Private Key: {}", keypair.export())?;

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
