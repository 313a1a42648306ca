//! A module for encoding and decoding `did:key` identifiers.
//!
//! A `did:key` carries the public key of its controller, so a token issuer's identity and the key
//! that verifies its signature are the same string.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod codec;
mod did;
mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use codec::*;
pub use did::*;
pub use error::*;
