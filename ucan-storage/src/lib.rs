//! # UCAN Storage
//!
//! Validation and delegation of UCAN tokens for storage services.
//!
//! Tokens are JWT-encoded and signed by a `did:key` issuer. A token may embed other tokens as
//! proofs; [`UcanChain`] validates a token together with all of its proofs and checks that every
//! proof was delegated to the issuer that uses it. Capabilities are interpreted through a
//! [`CapabilitySemantics`], and [`UcanChain::claim`] finds the token at the root of the
//! delegation of a capability.
//!
//! This crate currently only supports the following DID methods:
//! - `did:key`

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

mod macros;

mod builder;
mod capability;
mod chain;
mod encoding;
mod error;
mod header;
mod payload;
mod resolution;
mod semantics;
mod service;
mod signature;
mod ucan;
mod validate;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use builder::*;
pub use capability::*;
pub use chain::*;
pub use error::*;
pub use header::*;
pub use payload::*;
pub use resolution::*;
pub use semantics::*;
pub use service::*;
pub use signature::*;
pub use ucan::*;
pub use validate::*;

#[doc(hidden)]
pub use serde_json;
