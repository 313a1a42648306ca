//! # UCAN Storage CLI
//!
//! Commands behind the `ucan-storage` binary:
//!
//! - `keypair` generates or inspects an Ed25519 key pair.
//! - `ucan` issues a storage token.
//! - `validate` checks a token and its proofs.
//! - `claim` finds the root of the delegation of a capability.
//! - `caps` lists every capability a token can claim.

#![warn(missing_docs)]

pub mod inspect;
pub mod keypair;
pub mod styles;
pub mod token;
