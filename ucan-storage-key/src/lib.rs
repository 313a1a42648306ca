//! Key material for signing and verifying UCANs.
//!
//! Only `ed25519` key pairs can sign and verify. `p256` and `secp256k1` are known as key types so
//! that DIDs and JWS algorithm names can be mapped, but no key implementation is provided for them.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod ed25519;
mod error;
mod jws;
mod key;
mod traits;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use ed25519::*;
pub use error::*;
pub use jws::*;
pub use key::*;
pub use traits::*;
